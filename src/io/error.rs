//! Error types for denoising operations
//!
//! Configuration errors are raised eagerly, before any optimizer state is
//! allocated. Reaching the sweep cap is not an error; it is reported through
//! [`crate::algorithm::convergence::Termination::IterationCap`].

use std::fmt;
use std::path::PathBuf;

/// Main error type for all denoising operations
#[derive(Debug)]
pub enum DenoiseError {
    /// Two grids that must share dimensions do not
    ShapeMismatch {
        /// Operation that compared the grids
        operation: &'static str,
        /// Dimensions of the reference grid (rows, cols)
        expected: (usize, usize),
        /// Dimensions of the offending grid (rows, cols)
        found: (usize, usize),
    },

    /// A cell holds something other than `+1` or `-1`
    InvalidLabel {
        /// The rejected value
        value: i8,
        /// Grid position (row, col) of the value
        position: (usize, usize),
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Traversal order name not recognised
    UnknownTraversalOrder {
        /// The unrecognised name
        value: String,
    },

    /// Input data doesn't meet requirements
    InvalidSourceData {
        /// Description of what's wrong with the data
        reason: String,
    },

    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl DenoiseError {
    /// Whether this error is a malformed-input (configuration) error
    ///
    /// Configuration errors are detected before an optimization starts and
    /// never leave partially applied state behind.
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ShapeMismatch { .. }
                | Self::InvalidLabel { .. }
                | Self::InvalidParameter { .. }
                | Self::UnknownTraversalOrder { .. }
        )
    }
}

impl fmt::Display for DenoiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                operation,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Shape mismatch in {operation}: expected {}x{}, found {}x{}",
                    expected.0, expected.1, found.0, found.1
                )
            }
            Self::InvalidLabel { value, position } => {
                write!(
                    f,
                    "Invalid label {value} at ({}, {}): labels must be +1 or -1",
                    position.0, position.1
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::UnknownTraversalOrder { value } => {
                write!(
                    f,
                    "Unknown traversal order '{value}' (expected row-major, column-major, diagonal or random)"
                )
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for DenoiseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for denoising results
pub type Result<T> = std::result::Result<T, DenoiseError>;

impl From<image::ImageError> for DenoiseError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for DenoiseError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> DenoiseError {
    DenoiseError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a shape mismatch error from two grid dimensions
pub const fn shape_mismatch(
    operation: &'static str,
    expected: (usize, usize),
    found: (usize, usize),
) -> DenoiseError {
    DenoiseError::ShapeMismatch {
        operation,
        expected,
        found,
    }
}

/// Create a generic I/O error for path handling in the CLI
pub fn io_error(msg: &str) -> DenoiseError {
    DenoiseError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}

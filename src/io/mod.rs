/// Command-line interface and batch file processing
pub mod cli;
/// Default parameters and display constants
pub mod configuration;
/// Error types for lattice, model and I/O failures
pub mod error;
/// PNG conversion between images and label grids
pub mod image;
/// Terminal progress bars
pub mod progress;
/// Sweep-by-sweep GIF capture
pub mod visualization;

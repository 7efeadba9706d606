//! PNG conversion between images and label grids

use std::path::Path;

use image::{Rgba, RgbaImage};
use ndarray::Array2;

use crate::io::configuration::{
    BACKGROUND_COLOR, FOREGROUND_COLOR, MAX_GRID_DIMENSION, MIN_OPAQUE_ALPHA,
};
use crate::io::error::{DenoiseError, Result};
use crate::lattice::grid::{Coord, LabelGrid, NEGATIVE, POSITIVE};

/// Binarize an RGBA image: opaque pixels darker than `threshold` become `+1`
///
/// # Errors
///
/// Returns an error if the image is empty or exceeds the maximum dimension
pub fn label_grid_from_image(img: &RgbaImage, threshold: u8) -> Result<LabelGrid> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    if width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
        return Err(DenoiseError::InvalidSourceData {
            reason: format!(
                "Image {width}x{height} exceeds the maximum dimension {MAX_GRID_DIMENSION}"
            ),
        });
    }

    let cells = Array2::from_shape_fn((height, width), |(row, col)| {
        let pixel = img.get_pixel(col as u32, row as u32);
        if is_foreground(*pixel, threshold) {
            POSITIVE
        } else {
            NEGATIVE
        }
    });
    LabelGrid::from_array(cells)
}

fn is_foreground(pixel: Rgba<u8>, threshold: u8) -> bool {
    let [r, g, b, a] = pixel.0;
    if a < MIN_OPAQUE_ALPHA {
        return false;
    }
    // Rec. 601 luma in integer arithmetic
    let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
    luma < u32::from(threshold)
}

/// Render a grid as black foreground on white background
pub fn label_grid_to_image(grid: &LabelGrid) -> RgbaImage {
    RgbaImage::from_fn(grid.cols() as u32, grid.rows() as u32, |x, y| {
        let coord = Coord::new(y as usize, x as usize);
        if grid.get(coord) == Some(POSITIVE) {
            Rgba(FOREGROUND_COLOR)
        } else {
            Rgba(BACKGROUND_COLOR)
        }
    })
}

/// Load a PNG as a label grid
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or decoded
/// - The image is empty or exceeds the maximum dimension
pub fn load_label_grid<P: AsRef<Path>>(path: P, threshold: u8) -> Result<LabelGrid> {
    let path_buf = path.as_ref().to_path_buf();
    let img = image::open(&path_buf).map_err(|e| DenoiseError::ImageLoad {
        path: path_buf,
        source: e,
    })?;
    label_grid_from_image(&img.to_rgba8(), threshold)
}

/// Save a label grid as a PNG
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_label_grid<P: AsRef<Path>>(grid: &LabelGrid, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DenoiseError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    label_grid_to_image(grid)
        .save(output_path)
        .map_err(|e| DenoiseError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}

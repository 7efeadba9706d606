//! Bit-flip noise for building synthetic observations

use bitvec::prelude::*;
use rand::Rng;
use rand::seq::index::sample;

use crate::io::error::{Result, invalid_parameter};
use crate::lattice::grid::{LabelGrid, Shape};

/// Choose exactly `floor(frequency * pixels)` distinct pixels to corrupt
///
/// The mask is row-major; `true` marks a pixel to flip.
///
/// # Errors
///
/// Returns an error if `frequency` is not finite or outside `[0, 1]`
pub fn flip_mask<R: Rng + ?Sized>(shape: Shape, frequency: f64, rng: &mut R) -> Result<BitVec> {
    if !frequency.is_finite() || !(0.0..=1.0).contains(&frequency) {
        return Err(invalid_parameter(
            "frequency",
            &frequency,
            &"must lie within [0, 1]",
        ));
    }

    let pixels = shape.len();
    let flips = ((frequency * pixels as f64).floor() as usize).min(pixels);

    let mut mask = bitvec![0; pixels];
    for index in sample(rng, pixels, flips) {
        mask.set(index, true);
    }
    Ok(mask)
}

/// Flip every pixel selected by a row-major mask
///
/// # Errors
///
/// Returns an error if the mask length differs from the pixel count
pub fn apply_mask(grid: &LabelGrid, mask: &BitSlice) -> Result<LabelGrid> {
    if mask.len() != grid.len() {
        return Err(invalid_parameter(
            "mask",
            &mask.len(),
            &format!("expected {} bits", grid.len()),
        ));
    }

    let shape = grid.shape();
    let mut noisy = grid.clone();
    for index in mask.iter_ones() {
        noisy.flip(shape.coord_of(index));
    }
    Ok(noisy)
}

/// Corrupt a grid by flipping a fixed fraction of its pixels
///
/// # Errors
///
/// Returns an error if `frequency` is not finite or outside `[0, 1]`
pub fn add_noise<R: Rng + ?Sized>(
    grid: &LabelGrid,
    frequency: f64,
    rng: &mut R,
) -> Result<LabelGrid> {
    let mask = flip_mask(grid.shape(), frequency, rng)?;
    apply_mask(grid, &mask)
}

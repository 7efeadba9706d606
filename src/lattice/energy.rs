//! Ising-style local energy and the zero-temperature flip rule
//!
//! The local energy of label `x` at pixel `i` with observation `o_i` is
//! `E(x) = x * (a - c * o_i) - b * x * sum_j x_j` over the in-bounds
//! orthogonal neighbours `j`. A pixel flips only when the flipped label has
//! strictly lower energy.

use crate::io::configuration::{DEFAULT_BIAS, DEFAULT_COUPLING, DEFAULT_FIDELITY};
use crate::io::error::{Result, invalid_parameter};
use crate::lattice::grid::{Coord, LabelGrid, ensure_same_shape};

/// Energy weights `(a, b, c)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyParams {
    /// Per-pixel bias `a`
    pub bias: f64,
    /// Smoothness coupling `b` between neighbouring labels
    pub coupling: f64,
    /// Fidelity weight `c` between a label and its observation
    pub fidelity: f64,
}

impl EnergyParams {
    /// Create parameters from `(a, b, c)`
    pub const fn new(bias: f64, coupling: f64, fidelity: f64) -> Self {
        Self {
            bias,
            coupling,
            fidelity,
        }
    }

    /// Check that every weight is finite
    ///
    /// # Errors
    ///
    /// Returns an error naming the first non-finite weight
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("a", self.bias),
            ("b", self.coupling),
            ("c", self.fidelity),
        ] {
            if !value.is_finite() {
                return Err(invalid_parameter(parameter, &value, &"must be finite"));
            }
        }
        Ok(())
    }

    /// Observation-dependent term `a - c * o`
    pub fn external_field(&self, observed: i8) -> f64 {
        self.fidelity.mul_add(-f64::from(observed), self.bias)
    }
}

impl Default for EnergyParams {
    fn default() -> Self {
        Self::new(DEFAULT_BIAS, DEFAULT_COUPLING, DEFAULT_FIDELITY)
    }
}

impl From<(f64, f64, f64)> for EnergyParams {
    fn from((a, b, c): (f64, f64, f64)) -> Self {
        Self::new(a, b, c)
    }
}

/// Energy of a pixel's current and flipped label
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalEnergy {
    /// Energy with the current label
    pub current: f64,
    /// Energy with the label negated
    pub flipped: f64,
}

impl LocalEnergy {
    /// Compute both energies from precomputed terms
    ///
    /// Every optimizer path funnels through here so their decisions agree bit
    /// for bit.
    #[inline]
    pub fn from_terms(label: i8, field: f64, coupling: f64, neighbour_sum: i32) -> Self {
        Self {
            current: label_energy(label, field, coupling, neighbour_sum),
            flipped: label_energy(-label, field, coupling, neighbour_sum),
        }
    }

    /// Strict improvement test; ties keep the current label
    #[inline]
    pub fn prefers_flip(&self) -> bool {
        self.flipped < self.current
    }

    /// `E(flipped) - E(current)`
    pub fn delta(&self) -> f64 {
        self.flipped - self.current
    }
}

/// `E(x)` for a single label given its field and neighbour sum
#[inline]
pub fn label_energy(label: i8, field: f64, coupling: f64, neighbour_sum: i32) -> f64 {
    let x = f64::from(label);
    (-coupling * x).mul_add(f64::from(neighbour_sum), x * field)
}

/// Evaluate the local energy at one pixel
///
/// # Errors
///
/// Returns an error if the grids differ in shape or `coord` is out of bounds
pub fn evaluate(
    guess: &LabelGrid,
    observed: &LabelGrid,
    params: &EnergyParams,
    coord: Coord,
) -> Result<LocalEnergy> {
    ensure_same_shape("evaluate", observed, guess)?;
    if !guess.shape().contains(coord) {
        return Err(invalid_parameter(
            "coord",
            &format!("({}, {})", coord.row, coord.col),
            &format!("outside {}x{} grid", guess.rows(), guess.cols()),
        ));
    }
    Ok(evaluate_unchecked(guess, observed, params, coord))
}

/// Local energy for grids already validated to share a shape containing `coord`
#[inline]
pub(crate) fn evaluate_unchecked(
    guess: &LabelGrid,
    observed: &LabelGrid,
    params: &EnergyParams,
    coord: Coord,
) -> LocalEnergy {
    LocalEnergy::from_terms(
        guess.label(coord),
        params.external_field(observed.label(coord)),
        params.coupling,
        guess.neighbour_sum(coord),
    )
}

/// Total lattice energy `sum_i x_i (a - c o_i) - b sum_<ij> x_i x_j`
///
/// Each neighbouring pair is counted once. Flipping pixel `i` changes this by
/// [`LocalEnergy::delta`] at `i`, up to rounding.
///
/// # Errors
///
/// Returns an error if the grids differ in shape
pub fn lattice_energy(
    guess: &LabelGrid,
    observed: &LabelGrid,
    params: &EnergyParams,
) -> Result<f64> {
    ensure_same_shape("lattice_energy", observed, guess)?;
    let shape = guess.shape();

    let mut unary = 0.0;
    let mut pairwise = 0_i64;
    for index in 0..shape.len() {
        let coord = shape.coord_of(index);
        let x = guess.label(coord);
        unary += f64::from(x) * params.external_field(observed.label(coord));

        // Right and down neighbours only, so every pair is visited once
        for neighbour in [
            Coord::new(coord.row, coord.col + 1),
            Coord::new(coord.row + 1, coord.col),
        ] {
            if let Some(y) = guess.get(neighbour) {
                pairwise += i64::from(x) * i64::from(y);
            }
        }
    }

    Ok(params.coupling.mul_add(-(pairwise as f64), unary))
}

//! Grid search over coupling and fidelity weights
//!
//! Each `(b, c)` pair is an independent denoising run and the grid is
//! evaluated in parallel. The bias `a` stays fixed.

use indicatif::ProgressBar;
use ndarray::Array2;
use rayon::prelude::*;

use crate::algorithm::executor::{DenoiseConfig, denoise};
use crate::analysis::scoring::score;
use crate::io::configuration::{DEFAULT_BIAS, TUNING_MAX, TUNING_MIN, TUNING_STEP};
use crate::io::error::{Result, invalid_parameter};
use crate::lattice::energy::EnergyParams;
use crate::lattice::grid::{LabelGrid, ensure_same_shape};

/// Parameter values to try
#[derive(Clone, Debug, PartialEq)]
pub struct TuningGrid {
    /// Fixed bias `a`
    pub bias: f64,
    /// Coupling values `b` (columns of the report)
    pub couplings: Vec<f64>,
    /// Fidelity values `c` (rows of the report)
    pub fidelities: Vec<f64>,
}

impl Default for TuningGrid {
    fn default() -> Self {
        let values = evenly_spaced(TUNING_MIN, TUNING_MAX, TUNING_STEP);
        Self {
            bias: DEFAULT_BIAS,
            couplings: values.clone(),
            fidelities: values,
        }
    }
}

impl TuningGrid {
    /// Number of runs the grid requires
    pub const fn len(&self) -> usize {
        self.couplings.len() * self.fidelities.len()
    }

    /// Whether the grid has no cells
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Energy parameters of a cell
    pub fn params_at(&self, fidelity_index: usize, coupling_index: usize) -> Option<EnergyParams> {
        let coupling = self.couplings.get(coupling_index)?;
        let fidelity = self.fidelities.get(fidelity_index)?;
        Some(EnergyParams::new(self.bias, *coupling, *fidelity))
    }

    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(invalid_parameter(
                "tuning grid",
                &format!("{}x{}", self.fidelities.len(), self.couplings.len()),
                &"needs at least one coupling and one fidelity value",
            ));
        }
        for &coupling in &self.couplings {
            EnergyParams::new(self.bias, coupling, 0.0).validate()?;
        }
        for &fidelity in &self.fidelities {
            EnergyParams::new(self.bias, 0.0, fidelity).validate()?;
        }
        Ok(())
    }
}

/// `min, min + step, ...` up to and including `max` (within rounding)
pub fn evenly_spaced(min: f64, max: f64, step: f64) -> Vec<f64> {
    if step.is_nan() || step <= 0.0 || max < min {
        return vec![min];
    }
    let count = ((max - min) / step + 1e-9).floor() as usize + 1;
    (0..count).map(|i| step.mul_add(i as f64, min)).collect()
}

/// Best-scoring cell of a tuning run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TuningBest {
    /// Parameters of the best cell
    pub params: EnergyParams,
    /// F1 achieved
    pub f1: f64,
}

/// F1 for every cell of a tuning grid
#[derive(Clone, Debug, PartialEq)]
pub struct TuningReport {
    /// Grid that was evaluated
    pub grid: TuningGrid,
    /// F1 indexed by `(fidelity, coupling)`
    pub f1: Array2<f64>,
}

impl TuningReport {
    /// Highest-F1 cell; the first one in row-major order wins ties
    pub fn best(&self) -> Option<TuningBest> {
        let mut best: Option<TuningBest> = None;
        for ((row, col), &f1) in self.f1.indexed_iter() {
            if best.is_none_or(|b| f1 > b.f1) {
                if let Some(params) = self.grid.params_at(row, col) {
                    best = Some(TuningBest { params, f1 });
                }
            }
        }
        best
    }
}

/// Denoise `observed` for every grid cell and score against `ground_truth`
///
/// Strategy, order, start, cap and seed come from `base`; only the energy
/// weights vary.
///
/// # Errors
///
/// Returns an error if the grids differ in shape, the tuning grid is empty or
/// non-finite, or `base` is otherwise invalid
pub fn tune(
    ground_truth: &LabelGrid,
    observed: &LabelGrid,
    grid: &TuningGrid,
    base: &DenoiseConfig,
    progress: Option<&ProgressBar>,
) -> Result<TuningReport> {
    ensure_same_shape("tune", ground_truth, observed)?;
    grid.validate()?;

    let rows = grid.fidelities.len();
    let cols = grid.couplings.len();
    let cells: Vec<EnergyParams> = (0..rows * cols)
        .filter_map(|index| grid.params_at(index / cols, index % cols))
        .collect();

    if let Some(bar) = progress {
        bar.set_length(cells.len() as u64);
        bar.set_position(0);
    }

    let scores = cells
        .par_iter()
        .map(|params| {
            let result = denoise(observed, &base.with_params(*params))?;
            if let Some(bar) = progress {
                bar.inc(1);
            }
            Ok(score(ground_truth, &result.grid)?.f1)
        })
        .collect::<Result<Vec<f64>>>()?;

    let f1 = Array2::from_shape_vec((rows, cols), scores).map_err(|e| {
        invalid_parameter("tuning grid", &format!("{rows}x{cols}"), &e.to_string())
    })?;

    Ok(TuningReport {
        grid: grid.clone(),
        f1,
    })
}

//! Optimizer selection and orchestration

use std::fmt;

use clap::ValueEnum;

use crate::algorithm::convergence::{LatticeOptimiser, Optimisation, validate_max_sweeps};
use crate::algorithm::packed::PackedIcm;
use crate::algorithm::sequential::{SequentialConfig, SequentialIcm};
use crate::algorithm::synchronous::{SynchronousConfig, SynchronousIsing};
use crate::io::configuration::{DEFAULT_MAX_SWEEPS, DEFAULT_SEED};
use crate::io::error::Result;
use crate::lattice::energy::EnergyParams;
use crate::lattice::grid::{Coord, LabelGrid};
use crate::lattice::traversal::TraversalOrder;

/// Update discipline used to minimise the lattice energy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Sequential ICM on the flat-buffer fast path
    #[default]
    Sequential,
    /// Sequential ICM on the reference grid path
    SequentialReference,
    /// All pixels decide from the previous state and flip together
    Synchronous,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sequential => "sequential",
            Self::SequentialReference => "sequential-reference",
            Self::Synchronous => "synchronous",
        })
    }
}

/// Complete description of one denoising run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DenoiseConfig {
    /// Update discipline
    pub strategy: Strategy,
    /// Energy weights `(a, b, c)`
    pub params: EnergyParams,
    /// Visit order for sequential strategies
    pub order: TraversalOrder,
    /// First pixel of every sequential sweep
    pub start: Coord,
    /// Sweep cap shared by every strategy
    pub max_sweeps: usize,
    /// Seed for random traversal
    pub seed: u64,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            params: EnergyParams::default(),
            order: TraversalOrder::default(),
            start: Coord::default(),
            max_sweeps: DEFAULT_MAX_SWEEPS,
            seed: DEFAULT_SEED,
        }
    }
}

impl DenoiseConfig {
    /// Sequential settings derived from this configuration
    pub const fn sequential(&self) -> SequentialConfig {
        SequentialConfig {
            order: self.order,
            start: self.start,
            max_sweeps: self.max_sweeps,
            seed: self.seed,
        }
    }

    /// Synchronous settings derived from this configuration
    pub const fn synchronous(&self) -> SynchronousConfig {
        SynchronousConfig {
            max_iterations: self.max_sweeps,
        }
    }

    /// Check the configuration against a grid without running anything
    ///
    /// The start pixel only matters to sequential strategies.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the weights are non-finite, the cap is
    /// zero, or a sequential start lies outside `observed`
    pub fn validate_for(&self, observed: &LabelGrid) -> Result<()> {
        self.params.validate()?;
        match self.strategy {
            Strategy::Sequential | Strategy::SequentialReference => {
                self.sequential().plan_for(observed).map(drop)
            }
            Strategy::Synchronous => validate_max_sweeps(self.max_sweeps),
        }
    }

    /// Copy with different energy weights
    #[must_use]
    pub const fn with_params(mut self, params: EnergyParams) -> Self {
        self.params = params;
        self
    }
}

/// Denoise an observation with the configured strategy
///
/// # Errors
///
/// Returns a configuration error if the parameters or settings are invalid
pub fn denoise(observed: &LabelGrid, config: &DenoiseConfig) -> Result<Optimisation> {
    Ok(match config.strategy {
        Strategy::Sequential => PackedIcm::new(observed, config.params, &config.sequential())?.run(),
        Strategy::SequentialReference => {
            SequentialIcm::new(observed, config.params, &config.sequential())?.run()
        }
        Strategy::Synchronous => {
            SynchronousIsing::new(observed, config.params, &config.synchronous())?.run()
        }
    })
}

/// Denoise while handing `(sweep, state)` to `observer` after every sweep
///
/// The packed fast path materializes a grid for every call, so prefer
/// [`denoise`] when no per-sweep state is needed.
///
/// # Errors
///
/// Returns a configuration error if the parameters or settings are invalid
pub fn denoise_observed<F>(
    observed: &LabelGrid,
    config: &DenoiseConfig,
    mut observer: F,
) -> Result<Optimisation>
where
    F: FnMut(usize, &LabelGrid),
{
    Ok(match config.strategy {
        Strategy::Sequential => PackedIcm::new(observed, config.params, &config.sequential())?
            .run_observed(|o| observer(o.sweeps(), &o.snapshot())),
        Strategy::SequentialReference => {
            SequentialIcm::new(observed, config.params, &config.sequential())?
                .run_observed(|o| observer(o.sweeps(), o.guess()))
        }
        Strategy::Synchronous => {
            SynchronousIsing::new(observed, config.params, &config.synchronous())?
                .run_observed(|o| observer(o.sweeps(), o.guess()))
        }
    })
}

//! Synchronous (parallel-update) optimizer
//!
//! Every pixel decides from the state frozen at the start of the iteration.
//! Decisions are computed in parallel with rayon and committed together, so
//! no pixel observes another pixel's decision from the same iteration. This
//! update is prone to period-2 oscillation (e.g. checkerboards), which the
//! shared tracker detects.

use log::debug;
use rayon::prelude::*;

use crate::algorithm::convergence::{
    ConvergenceTracker, LatticeOptimiser, Optimisation, Termination,
};
use crate::algorithm::sequential::report_termination;
use crate::io::configuration::DEFAULT_MAX_SWEEPS;
use crate::io::error::Result;
use crate::lattice::energy::{EnergyParams, evaluate_unchecked};
use crate::lattice::grid::{LabelGrid, ensure_same_shape};

/// Limits for a synchronous run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynchronousConfig {
    /// Iteration cap bounding runtime when no fixed point or cycle appears
    pub max_iterations: usize,
}

impl Default for SynchronousConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_SWEEPS,
        }
    }
}

/// Synchronous run owning its guess and history
pub struct SynchronousIsing<'a> {
    observed: &'a LabelGrid,
    params: EnergyParams,
    guess: LabelGrid,
    tracker: ConvergenceTracker,
    flips: usize,
}

impl<'a> SynchronousIsing<'a> {
    /// Prepare a run starting from a copy of the observation
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are non-finite or the cap is zero
    pub fn new(
        observed: &'a LabelGrid,
        params: EnergyParams,
        config: &SynchronousConfig,
    ) -> Result<Self> {
        Self::with_initial_guess(observed, observed.clone(), params, config)
    }

    /// Prepare a run starting from an explicit initial guess
    ///
    /// # Errors
    ///
    /// Returns an error if the guess and observation differ in shape, the
    /// parameters are non-finite, or the cap is zero
    pub fn with_initial_guess(
        observed: &'a LabelGrid,
        guess: LabelGrid,
        params: EnergyParams,
        config: &SynchronousConfig,
    ) -> Result<Self> {
        ensure_same_shape("optimise_synchronous", observed, &guess)?;
        params.validate()?;
        let tracker = ConvergenceTracker::new(&guess, config.max_iterations)?;

        Ok(Self {
            observed,
            params,
            guess,
            tracker,
            flips: 0,
        })
    }

    /// Current guess
    pub const fn guess(&self) -> &LabelGrid {
        &self.guess
    }

    /// Row-major indices of every pixel whose flip lowers its local energy
    ///
    /// Reads only the current state; nothing is mutated.
    pub fn flip_decisions(&self) -> Vec<usize> {
        let (guess, observed, params) = (&self.guess, self.observed, &self.params);
        let shape = guess.shape();
        (0..shape.len())
            .into_par_iter()
            .filter(|&index| {
                evaluate_unchecked(guess, observed, params, shape.coord_of(index)).prefers_flip()
            })
            .collect()
    }
}

impl LatticeOptimiser for SynchronousIsing<'_> {
    fn sweep(&mut self) -> Option<Termination> {
        let decisions = self.flip_decisions();

        // Commit after every decision has been made
        let shape = self.guess.shape();
        for &index in &decisions {
            self.guess.flip(shape.coord_of(index));
        }

        self.flips += decisions.len();
        debug!(
            "synchronous iteration {}: {} flips",
            self.tracker.sweeps() + 1,
            decisions.len()
        );
        self.tracker.record(&self.guess, !decisions.is_empty())
    }

    fn sweeps(&self) -> usize {
        self.tracker.sweeps()
    }

    fn snapshot(&self) -> LabelGrid {
        self.guess.clone()
    }

    fn finish(self, termination: Termination) -> Optimisation {
        report_termination("synchronous", termination, self.tracker.sweeps());
        Optimisation {
            grid: self.guess,
            sweeps: self.tracker.sweeps(),
            flips: self.flips,
            termination,
        }
    }
}

/// Denoise with synchronous updates, starting from the observation
///
/// # Errors
///
/// Returns an error if the parameters are non-finite or the cap is zero
pub fn optimise_synchronous(
    observed: &LabelGrid,
    params: EnergyParams,
    config: &SynchronousConfig,
) -> Result<Optimisation> {
    Ok(SynchronousIsing::new(observed, params, config)?.run())
}

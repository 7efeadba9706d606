//! Reference sequential Iterated Conditional Modes
//!
//! Pixels are visited in plan order and flipped in place, so a later pixel in
//! the same sweep sees every earlier flip.

use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};

use crate::algorithm::convergence::{
    ConvergenceTracker, LatticeOptimiser, Optimisation, Termination, validate_max_sweeps,
};
use crate::io::configuration::{DEFAULT_MAX_SWEEPS, DEFAULT_SEED};
use crate::io::error::Result;
use crate::lattice::energy::{EnergyParams, evaluate_unchecked};
use crate::lattice::grid::{Coord, LabelGrid, ensure_same_shape};
use crate::lattice::traversal::{TraversalOrder, TraversalPlan};

/// Sweep order and limits for a sequential run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequentialConfig {
    /// Visit order within a sweep
    pub order: TraversalOrder,
    /// Pixel visited first in every sweep
    pub start: Coord,
    /// Sweep cap
    pub max_sweeps: usize,
    /// Seed of the run-scoped generator used by [`TraversalOrder::Random`]
    pub seed: u64,
}

impl Default for SequentialConfig {
    fn default() -> Self {
        Self {
            order: TraversalOrder::RowMajor,
            start: Coord::default(),
            max_sweeps: DEFAULT_MAX_SWEEPS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SequentialConfig {
    /// Validate the configuration against a grid and build its sweep plan
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep cap is zero or the start is out of bounds
    pub fn plan_for(&self, observed: &LabelGrid) -> Result<TraversalPlan> {
        validate_max_sweeps(self.max_sweeps)?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        TraversalPlan::new(observed.shape(), self.order, self.start, &mut rng)
    }
}

/// Sequential ICM run owning its guess and history
pub struct SequentialIcm<'a> {
    observed: &'a LabelGrid,
    params: EnergyParams,
    plan: TraversalPlan,
    guess: LabelGrid,
    tracker: ConvergenceTracker,
    flips: usize,
}

impl<'a> SequentialIcm<'a> {
    /// Prepare a run starting from a copy of the observation
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters or configuration are invalid
    pub fn new(
        observed: &'a LabelGrid,
        params: EnergyParams,
        config: &SequentialConfig,
    ) -> Result<Self> {
        Self::with_initial_guess(observed, observed.clone(), params, config)
    }

    /// Prepare a run starting from an explicit initial guess
    ///
    /// # Errors
    ///
    /// Returns an error if the guess and observation differ in shape or the
    /// parameters or configuration are invalid
    pub fn with_initial_guess(
        observed: &'a LabelGrid,
        guess: LabelGrid,
        params: EnergyParams,
        config: &SequentialConfig,
    ) -> Result<Self> {
        ensure_same_shape("optimise_sequential", observed, &guess)?;
        params.validate()?;
        let plan = config.plan_for(observed)?;
        let tracker = ConvergenceTracker::new(&guess, config.max_sweeps)?;

        Ok(Self {
            observed,
            params,
            plan,
            guess,
            tracker,
            flips: 0,
        })
    }

    /// Current guess
    pub const fn guess(&self) -> &LabelGrid {
        &self.guess
    }

    /// Sweep order in use
    pub const fn plan(&self) -> &TraversalPlan {
        &self.plan
    }

    fn sweep_once(&mut self) -> usize {
        let shape = self.plan.shape();
        let mut flips = 0;
        for &index in self.plan.indices() {
            let coord = shape.coord_of(index);
            if evaluate_unchecked(&self.guess, self.observed, &self.params, coord).prefers_flip() {
                self.guess.flip(coord);
                flips += 1;
            }
        }
        flips
    }
}

impl LatticeOptimiser for SequentialIcm<'_> {
    fn sweep(&mut self) -> Option<Termination> {
        let flips = self.sweep_once();
        self.flips += flips;
        debug!("sequential sweep {}: {flips} flips", self.tracker.sweeps() + 1);
        self.tracker.record(&self.guess, flips > 0)
    }

    fn sweeps(&self) -> usize {
        self.tracker.sweeps()
    }

    fn snapshot(&self) -> LabelGrid {
        self.guess.clone()
    }

    fn finish(self, termination: Termination) -> Optimisation {
        report_termination("sequential", termination, self.tracker.sweeps());
        Optimisation {
            grid: self.guess,
            sweeps: self.tracker.sweeps(),
            flips: self.flips,
            termination,
        }
    }
}

/// Denoise with sequential ICM, starting from the observation
///
/// # Errors
///
/// Returns an error if the parameters are non-finite, the sweep cap is zero,
/// or the start coordinate lies outside the grid
pub fn optimise_sequential(
    observed: &LabelGrid,
    params: EnergyParams,
    config: &SequentialConfig,
) -> Result<Optimisation> {
    Ok(SequentialIcm::new(observed, params, config)?.run())
}

pub(crate) fn report_termination(optimiser: &str, termination: Termination, sweeps: usize) {
    match termination {
        Termination::FixedPoint => info!("{optimiser}: fixed point after {sweeps} sweeps"),
        Termination::Cycle { period } => {
            info!("{optimiser}: period-{period} cycle detected after {sweeps} sweeps");
        }
        Termination::IterationCap => {
            warn!("{optimiser}: sweep cap of {sweeps} reached without convergence");
        }
    }
}

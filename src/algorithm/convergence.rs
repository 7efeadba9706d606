//! Sweep bookkeeping shared by every optimizer
//!
//! The tracker remembers each distinct grid state of a run, keyed by its
//! packed bit representation, together with the sweep at which it first
//! appeared. A run ends when a sweep changes nothing, when the new state
//! repeats an earlier one, or when the sweep cap is reached.

use std::collections::HashMap;

use bitvec::prelude::*;

use crate::io::error::{Result, invalid_parameter};
use crate::lattice::grid::LabelGrid;

/// Why an optimization run stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The last sweep flipped no pixel
    FixedPoint,
    /// The last sweep reproduced a state first seen `period` sweeps earlier
    Cycle {
        /// Sweeps between the two occurrences
        period: usize,
    },
    /// The sweep cap was reached first; the result may not be a fixed point
    IterationCap,
}

impl Termination {
    /// False only when the sweep cap cut the run short
    pub const fn converged(self) -> bool {
        !matches!(self, Self::IterationCap)
    }
}

/// Result of one optimization run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Optimisation {
    /// Final guess
    pub grid: LabelGrid,
    /// Completed sweeps, including the terminating one
    pub sweeps: usize,
    /// Total accepted flips over the run
    pub flips: usize,
    /// Reason the run stopped
    pub termination: Termination,
}

impl Optimisation {
    /// Whether a fixed point or cycle was detected before the cap
    pub const fn converged(&self) -> bool {
        self.termination.converged()
    }
}

/// History of visited states for a single run
#[derive(Clone, Debug)]
pub struct ConvergenceTracker {
    first_seen: HashMap<BitVec, usize>,
    sweeps: usize,
    max_sweeps: usize,
}

impl ConvergenceTracker {
    /// Start tracking from the initial guess (recorded as sweep 0)
    ///
    /// # Errors
    ///
    /// Returns an error if `max_sweeps` is zero
    pub fn new(initial: &LabelGrid, max_sweeps: usize) -> Result<Self> {
        validate_max_sweeps(max_sweeps)?;

        let mut first_seen = HashMap::with_capacity(max_sweeps.min(1024) + 1);
        first_seen.insert(initial.state_key(), 0);

        Ok(Self {
            first_seen,
            sweeps: 0,
            max_sweeps,
        })
    }

    /// Record the state reached by one more sweep
    ///
    /// Returns `Some` once the run should stop.
    pub fn record(&mut self, state: &LabelGrid, changed: bool) -> Option<Termination> {
        self.record_with(changed, || state.state_key())
    }

    /// Like [`Self::record`], building the packed state only when needed
    ///
    /// `key` must return the row-major bit state described by
    /// [`LabelGrid::state_key`].
    pub fn record_with<F>(&mut self, changed: bool, key: F) -> Option<Termination>
    where
        F: FnOnce() -> BitVec,
    {
        self.sweeps += 1;

        if !changed {
            return Some(Termination::FixedPoint);
        }

        let key = key();
        if let Some(&first) = self.first_seen.get(&key) {
            return Some(Termination::Cycle {
                period: self.sweeps - first,
            });
        }
        self.first_seen.insert(key, self.sweeps);

        (self.sweeps >= self.max_sweeps).then_some(Termination::IterationCap)
    }

    /// Sweeps recorded so far
    pub const fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Sweep cap for this run
    pub const fn max_sweeps(&self) -> usize {
        self.max_sweeps
    }

    /// Number of distinct states seen, including the initial one
    pub fn distinct_states(&self) -> usize {
        self.first_seen.len()
    }
}

/// Reject a zero sweep cap
///
/// # Errors
///
/// Returns an error if `max_sweeps` is zero
pub fn validate_max_sweeps(max_sweeps: usize) -> Result<()> {
    if max_sweeps == 0 {
        return Err(invalid_parameter(
            "max_sweeps",
            &max_sweeps,
            &"at least one sweep is required",
        ));
    }
    Ok(())
}

/// Step-wise interface implemented by every optimizer
pub trait LatticeOptimiser {
    /// Run one sweep; returns `Some` when the run has terminated
    ///
    /// Calling again after termination is allowed and behaves as a fresh
    /// sweep over the current state.
    fn sweep(&mut self) -> Option<Termination>;

    /// Completed sweeps
    fn sweeps(&self) -> usize;

    /// Copy of the current guess
    fn snapshot(&self) -> LabelGrid;

    /// Consume the optimizer into its result
    fn finish(self, termination: Termination) -> Optimisation;

    /// Sweep until termination, calling `observer` after every sweep
    fn run_observed<F>(mut self, mut observer: F) -> Optimisation
    where
        Self: Sized,
        F: FnMut(&Self),
    {
        loop {
            let outcome = self.sweep();
            observer(&self);
            if let Some(termination) = outcome {
                return self.finish(termination);
            }
        }
    }

    /// Sweep until termination
    fn run(self) -> Optimisation
    where
        Self: Sized,
    {
        self.run_observed(|_| {})
    }
}

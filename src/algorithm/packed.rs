//! Flat-buffer fast path for sequential ICM
//!
//! Labels live in a contiguous row-major `Vec<i8>`, neighbours are resolved
//! through a precomputed table and the external field `a - c * o` is computed
//! once per pixel. Decisions go through the same [`LocalEnergy::from_terms`]
//! as the reference path, so both produce identical grids.

use bitvec::prelude::*;
use log::debug;

use crate::algorithm::convergence::{
    ConvergenceTracker, LatticeOptimiser, Optimisation, Termination,
};
use crate::algorithm::sequential::{SequentialConfig, report_termination};
use crate::io::error::Result;
use crate::lattice::energy::{EnergyParams, LocalEnergy};
use crate::lattice::grid::{LabelGrid, POSITIVE, Shape, ensure_same_shape};

/// Marks a missing neighbour at the grid edge
const NO_NEIGHBOUR: u32 = u32::MAX;

/// Precomputed orthogonal neighbour indices, [`NO_NEIGHBOUR`] at edges
fn neighbour_table(shape: Shape) -> Vec<[u32; 4]> {
    (0..shape.len())
        .map(|index| {
            let mut slots = [NO_NEIGHBOUR; 4];
            for (slot, neighbour) in slots.iter_mut().zip(shape.neighbours(shape.coord_of(index)))
            {
                *slot = shape.index_of(neighbour) as u32;
            }
            slots
        })
        .collect()
}

fn packed_state_key(labels: &[i8]) -> BitVec {
    labels.iter().map(|&label| label == POSITIVE).collect()
}

/// Sequential ICM over flat buffers
pub struct PackedIcm {
    shape: Shape,
    coupling: f64,
    fields: Vec<f64>,
    neighbours: Vec<[u32; 4]>,
    visit_order: Vec<usize>,
    labels: Vec<i8>,
    tracker: ConvergenceTracker,
    flips: usize,
}

impl PackedIcm {
    /// Prepare a run starting from a copy of the observation
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters or configuration are invalid
    pub fn new(
        observed: &LabelGrid,
        params: EnergyParams,
        config: &SequentialConfig,
    ) -> Result<Self> {
        Self::with_initial_guess(observed, observed, params, config)
    }

    /// Prepare a run starting from an explicit initial guess
    ///
    /// # Errors
    ///
    /// Returns an error if the guess and observation differ in shape or the
    /// parameters or configuration are invalid
    pub fn with_initial_guess(
        observed: &LabelGrid,
        guess: &LabelGrid,
        params: EnergyParams,
        config: &SequentialConfig,
    ) -> Result<Self> {
        ensure_same_shape("optimise_sequential_packed", observed, guess)?;
        params.validate()?;
        let plan = config.plan_for(observed)?;
        let tracker = ConvergenceTracker::new(guess, config.max_sweeps)?;

        let shape = observed.shape();
        Ok(Self {
            shape,
            coupling: params.coupling,
            fields: observed
                .values()
                .map(|o| params.external_field(o))
                .collect(),
            neighbours: neighbour_table(shape),
            visit_order: plan.indices().to_vec(),
            labels: guess.values().collect(),
            tracker,
            flips: 0,
        })
    }

    fn neighbour_sum(&self, index: usize) -> i32 {
        self.neighbours.get(index).map_or(0, |slots| {
            slots
                .iter()
                .take_while(|&&n| n != NO_NEIGHBOUR)
                .filter_map(|&n| self.labels.get(n as usize))
                .map(|&label| i32::from(label))
                .sum()
        })
    }

    fn sweep_once(&mut self) -> usize {
        let mut flips = 0;
        for position in 0..self.visit_order.len() {
            let Some(&index) = self.visit_order.get(position) else {
                continue;
            };
            let (Some(&label), Some(&field)) = (self.labels.get(index), self.fields.get(index))
            else {
                continue;
            };

            let energy =
                LocalEnergy::from_terms(label, field, self.coupling, self.neighbour_sum(index));
            if energy.prefers_flip() {
                if let Some(cell) = self.labels.get_mut(index) {
                    *cell = -label;
                    flips += 1;
                }
            }
        }
        flips
    }

    fn to_grid(&self) -> LabelGrid {
        LabelGrid::from_trusted(self.shape, &self.labels)
    }
}

impl LatticeOptimiser for PackedIcm {
    fn sweep(&mut self) -> Option<Termination> {
        let flips = self.sweep_once();
        self.flips += flips;
        debug!("packed sweep {}: {flips} flips", self.tracker.sweeps() + 1);
        self.tracker
            .record_with(flips > 0, || packed_state_key(&self.labels))
    }

    fn sweeps(&self) -> usize {
        self.tracker.sweeps()
    }

    fn snapshot(&self) -> LabelGrid {
        self.to_grid()
    }

    fn finish(self, termination: Termination) -> Optimisation {
        report_termination("packed", termination, self.tracker.sweeps());
        Optimisation {
            grid: self.to_grid(),
            sweeps: self.tracker.sweeps(),
            flips: self.flips,
            termination,
        }
    }
}

/// Denoise with the packed sequential ICM, starting from the observation
///
/// Output matches [`crate::algorithm::sequential::optimise_sequential`] for
/// the same inputs.
///
/// # Errors
///
/// Returns an error if the parameters are non-finite, the sweep cap is zero,
/// or the start coordinate lies outside the grid
pub fn optimise_sequential_packed(
    observed: &LabelGrid,
    params: EnergyParams,
    config: &SequentialConfig,
) -> Result<Optimisation> {
    Ok(PackedIcm::new(observed, params, config)?.run())
}

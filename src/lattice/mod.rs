//! Lattice data structures and the local energy model
//!
//! This module contains the pure, stateless parts of the model:
//! - Label grids and the row-major index convention
//! - Local and total Ising energies
//! - Sweep order planning
//! - Synthetic bit-flip noise

/// Local energy and flip decision rule
pub mod energy;
/// Label grids, shapes and coordinates
pub mod grid;
/// Bit-flip noise injection
pub mod noise;
/// Sweep order planning
pub mod traversal;

pub use energy::EnergyParams;
pub use grid::{Coord, LabelGrid, Shape};
pub use traversal::{TraversalOrder, TraversalPlan};

//! Binary image denoising with Iterated Conditional Modes over an Ising-style Markov random field
//!
//! A noisy two-label image is treated as an observation of a hidden clean image.
//! Each pixel's label is chosen to minimise a local energy combining a bias, agreement
//! with the observation, and agreement with its four neighbours. Sweeps repeat until
//! the guess stops changing, revisits an earlier state, or reaches a sweep cap.

#![forbid(unsafe_code)]

/// Optimizers, termination detection and strategy selection
pub mod algorithm;
/// Scoring against ground truth and hyperparameter search
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Label grids, local energy, traversal orders and noise
pub mod lattice;

pub use io::error::{DenoiseError, Result};

/// Sweep history, termination detection and the optimizer trait
pub mod convergence;
/// Strategy selection and run orchestration
pub mod executor;
/// Flat-buffer fast path of sequential ICM
pub mod packed;
/// Reference sequential Iterated Conditional Modes
pub mod sequential;
/// Synchronous parallel-update optimizer
pub mod synchronous;

pub use convergence::{LatticeOptimiser, Optimisation, Termination};
pub use executor::{DenoiseConfig, Strategy, denoise};
pub use sequential::optimise_sequential;
pub use synchronous::optimise_synchronous;

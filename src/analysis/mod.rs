//! Evaluation of denoised grids against ground truth

/// Confusion counts and precision/recall/F1
pub mod scoring;
/// Hyperparameter grid search scored by F1
pub mod tuning;

pub use scoring::{Confusion, Score, confusion_counts, score};

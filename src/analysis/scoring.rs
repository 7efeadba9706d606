//! Precision, recall and F1 of a denoised grid against ground truth
//!
//! Label `+1` is the positive class. Every ratio whose denominator is zero is
//! reported as `0.0`, never NaN.

use std::fmt;

use crate::io::error::Result;
use crate::lattice::grid::{LabelGrid, POSITIVE, ensure_same_shape};

/// 2x2 confusion counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Confusion {
    /// Positive in truth and candidate
    pub true_positives: usize,
    /// Negative in truth and candidate
    pub true_negatives: usize,
    /// Negative in truth, positive in candidate
    pub false_positives: usize,
    /// Positive in truth, negative in candidate
    pub false_negatives: usize,
}

impl Confusion {
    /// Total number of compared pixels
    pub const fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Fraction of pixels labelled correctly
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }
}

/// Precision, recall and F1
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Score {
    /// `tp / (tp + fp)`
    pub precision: f64,
    /// `tp / (tp + fn)`
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1: f64,
}

impl Score {
    /// Derive the score from confusion counts
    pub fn from_confusion(confusion: &Confusion) -> Self {
        let precision = ratio(
            confusion.true_positives,
            confusion.true_positives + confusion.false_positives,
        );
        let recall = ratio(
            confusion.true_positives,
            confusion.true_positives + confusion.false_negatives,
        );
        let sum = precision + recall;
        let f1 = if sum > 0.0 {
            2.0 * precision * recall / sum
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
        }
    }

    /// `(precision, recall, f1)`
    pub const fn as_tuple(&self) -> (f64, f64, f64) {
        (self.precision, self.recall, self.f1)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "precision {:.4}, recall {:.4}, F1 {:.4}",
            self.precision, self.recall, self.f1
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Count agreements and disagreements between truth and candidate
///
/// # Errors
///
/// Returns an error if the grids differ in shape
pub fn confusion_counts(ground_truth: &LabelGrid, candidate: &LabelGrid) -> Result<Confusion> {
    ensure_same_shape("confusion_counts", ground_truth, candidate)?;

    let mut confusion = Confusion::default();
    for (truth, guess) in ground_truth.values().zip(candidate.values()) {
        match (truth == POSITIVE, guess == POSITIVE) {
            (true, true) => confusion.true_positives += 1,
            (false, false) => confusion.true_negatives += 1,
            (false, true) => confusion.false_positives += 1,
            (true, false) => confusion.false_negatives += 1,
        }
    }
    Ok(confusion)
}

/// Precision, recall and F1 of a candidate against ground truth
///
/// # Errors
///
/// Returns an error if the grids differ in shape
pub fn score(ground_truth: &LabelGrid, candidate: &LabelGrid) -> Result<Score> {
    confusion_counts(ground_truth, candidate).map(|c| Score::from_confusion(&c))
}

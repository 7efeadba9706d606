//! Tests for confusion counts and precision/recall/F1

#[cfg(test)]
mod tests {
    use mrfdenoise::analysis::scoring::{Confusion, Score, confusion_counts, score};
    use mrfdenoise::lattice::grid::LabelGrid;

    // Tests confusion cells for a small worked example
    // Verified by swapping false positives and false negatives
    #[test]
    fn test_confusion_counts() {
        let truth = LabelGrid::from_rows(&[[1, 1], [-1, -1]]).expect("valid grid");
        let candidate = LabelGrid::from_rows(&[[1, -1], [-1, -1]]).expect("valid grid");

        let confusion = confusion_counts(&truth, &candidate).expect("same shape");

        assert_eq!(
            confusion,
            Confusion {
                true_positives: 1,
                true_negatives: 2,
                false_positives: 0,
                false_negatives: 1,
            }
        );
        assert_eq!(confusion.total(), 4);
        assert!((confusion.accuracy() - 0.75).abs() < f64::EPSILON);
    }

    // Tests precision, recall and F1 for the same example
    // Verified by using the arithmetic mean for F1
    #[test]
    fn test_score_values() {
        let truth = LabelGrid::from_rows(&[[1, 1], [-1, -1]]).expect("valid grid");
        let candidate = LabelGrid::from_rows(&[[1, -1], [-1, -1]]).expect("valid grid");

        let (precision, recall, f1) = score(&truth, &candidate).expect("same shape").as_tuple();

        assert!((precision - 1.0).abs() < f64::EPSILON);
        assert!((recall - 0.5).abs() < f64::EPSILON);
        assert!((f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    // Tests zero denominators give zero instead of NaN
    // Verified by dividing unconditionally
    #[test]
    fn test_degenerate_scores_are_zero() {
        let negatives = LabelGrid::filled(2, 2, -1).expect("valid grid");

        let s = score(&negatives, &negatives).expect("same shape");
        assert_eq!(s, Score::default());
        assert!(!s.f1.is_nan());

        let positives = LabelGrid::filled(2, 2, 1).expect("valid grid");
        let s = score(&positives, &negatives).expect("same shape");
        assert!(s.precision.abs() < f64::EPSILON);
        assert!(s.recall.abs() < f64::EPSILON);
        assert!(s.f1.abs() < f64::EPSILON);
    }

    // Tests a perfect candidate scores one everywhere
    // Verified by counting true negatives as positives
    #[test]
    fn test_perfect_score() {
        let truth = LabelGrid::from_rows(&[[1, -1, 1]]).expect("valid grid");
        let s = score(&truth, &truth).expect("same shape");

        assert!((s.f1 - 1.0).abs() < f64::EPSILON);
        assert!(s.to_string().contains("F1 1.0000"));
    }

    // Tests mismatched shapes are rejected
    // Verified by zipping to the shorter grid
    #[test]
    fn test_shape_mismatch() {
        let a = LabelGrid::filled(2, 2, 1).expect("valid grid");
        let b = LabelGrid::filled(4, 1, 1).expect("valid grid");

        assert!(score(&a, &b).is_err());
    }
}

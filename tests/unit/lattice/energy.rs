//! Tests for local energies, the strict flip rule and total lattice energy

#[cfg(test)]
mod tests {
    use mrfdenoise::lattice::energy::{
        EnergyParams, LocalEnergy, evaluate, label_energy, lattice_energy,
    };
    use mrfdenoise::lattice::grid::{Coord, LabelGrid};

    // Tests the external field combines bias and fidelity
    // Verified by adding the fidelity term instead of subtracting
    #[test]
    fn test_external_field() {
        let params = EnergyParams::new(0.5, 1.0, 2.0);

        assert!((params.external_field(1) - (-1.5)).abs() < f64::EPSILON);
        assert!((params.external_field(-1) - 2.5).abs() < f64::EPSILON);
    }

    // Tests label energy against the closed form
    // Verified by dropping the coupling term
    #[test]
    fn test_label_energy_closed_form() {
        // x = 1, field = a - c*o = 1 - 1 = 0, neighbours sum 2, b = 1
        assert!((label_energy(1, 0.0, 1.0, 2) - (-2.0)).abs() < f64::EPSILON);
        assert!((label_energy(-1, 0.0, 1.0, 2) - 2.0).abs() < f64::EPSILON);
        assert!((label_energy(-1, 3.0, 0.5, -4) - (-5.0)).abs() < f64::EPSILON);
    }

    // Tests ties keep the current label
    // Verified by using <= in prefers_flip
    #[test]
    fn test_ties_do_not_flip() {
        let energy = LocalEnergy::from_terms(1, 0.0, 0.0, 0);

        assert!((energy.current - energy.flipped).abs() < f64::EPSILON);
        assert!(!energy.prefers_flip());
    }

    // Tests a pixel disagreeing with every neighbour prefers to flip
    // Verified by inverting the comparison
    #[test]
    fn test_isolated_pixel_prefers_flip() {
        let observed = LabelGrid::from_rows(&[[-1, -1, -1], [-1, 1, -1], [-1, -1, -1]])
            .expect("valid grid");
        let params = EnergyParams::new(0.0, 1.0, 1.0);

        let energy = evaluate(&observed, &observed, &params, Coord::new(1, 1)).expect("in bounds");

        assert!(energy.prefers_flip());
        assert!((energy.delta() - (-6.0)).abs() < 1e-12);
    }

    // Tests evaluate rejects out-of-bounds coordinates and mismatched shapes
    // Verified by removing the bounds check
    #[test]
    fn test_evaluate_validation() {
        let grid = LabelGrid::filled(2, 2, 1).expect("valid grid");
        let other = LabelGrid::filled(2, 3, 1).expect("valid grid");
        let params = EnergyParams::default();

        assert!(evaluate(&grid, &grid, &params, Coord::new(2, 0)).is_err());
        assert!(evaluate(&grid, &other, &params, Coord::new(0, 0)).is_err());
    }

    // Tests non-finite weights are rejected by name
    // Verified by skipping the fidelity check
    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(EnergyParams::new(1.0, 1.0, 1.0).validate().is_ok());

        let error = EnergyParams::new(1.0, 1.0, f64::NAN)
            .validate()
            .expect_err("NaN fidelity");
        assert!(error.to_string().contains("'c'"));

        assert!(EnergyParams::new(f64::INFINITY, 1.0, 1.0).validate().is_err());
    }

    // Tests lattice energy counts each neighbouring pair once
    // Verified by visiting all four neighbours per pixel
    #[test]
    fn test_lattice_energy_pairs_counted_once() {
        let grid = LabelGrid::filled(2, 2, 1).expect("valid grid");
        let params = EnergyParams::new(0.0, 1.0, 0.0);

        let energy = lattice_energy(&grid, &grid, &params).expect("same shape");

        // Four edges in a 2x2 lattice
        assert!((energy - (-4.0)).abs() < f64::EPSILON);
    }

    // Tests a single flip changes lattice energy by the local delta
    // Verified by halving the pairwise term
    #[test]
    fn test_lattice_energy_matches_local_delta() {
        let observed = LabelGrid::from_rows(&[[1, -1, 1], [1, 1, -1], [-1, 1, 1]])
            .expect("valid grid");
        let guess = LabelGrid::from_rows(&[[1, 1, -1], [-1, 1, -1], [1, 1, -1]])
            .expect("valid grid");
        let params = EnergyParams::new(0.3, 0.7, 1.1);

        for row in 0..3 {
            for col in 0..3 {
                let coord = Coord::new(row, col);
                let local = evaluate(&guess, &observed, &params, coord).expect("in bounds");
                let before = lattice_energy(&guess, &observed, &params).expect("same shape");

                let mut flipped = guess.clone();
                flipped.flip(coord);
                let after = lattice_energy(&flipped, &observed, &params).expect("same shape");

                assert!((after - before - local.delta()).abs() < 1e-9);
            }
        }
    }

    // Tests tuple conversion keeps the (a, b, c) order
    // Verified by swapping coupling and fidelity
    #[test]
    fn test_from_tuple() {
        let params = EnergyParams::from((0.1, 0.2, 0.3));
        assert_eq!(params, EnergyParams::new(0.1, 0.2, 0.3));
    }
}

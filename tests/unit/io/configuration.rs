//! Tests for default parameters and display constants

#[cfg(test)]
mod tests {
    use mrfdenoise::io::configuration::{
        BACKGROUND_COLOR, DEFAULT_BIAS, DEFAULT_COUPLING, DEFAULT_FIDELITY, DEFAULT_MAX_SWEEPS,
        DEFAULT_SEED, FOREGROUND_COLOR, GIF_FRAME_DELAY_MS, MAX_GRID_DIMENSION, NOISY_SUFFIX,
        OUTPUT_SUFFIX, TUNING_MAX, TUNING_MIN, TUNING_STEP, VIEWER_MIN_FRAME_DELAY_MS,
        VISUALIZATION_SUFFIX,
    };

    // Tests default energy weights are all one
    // Verified by changing a default weight
    #[test]
    fn test_default_weights() {
        assert!((DEFAULT_BIAS - 1.0).abs() < f64::EPSILON);
        assert!((DEFAULT_COUPLING - 1.0).abs() < f64::EPSILON);
        assert!((DEFAULT_FIDELITY - 1.0).abs() < f64::EPSILON);
    }

    // Tests run limits and seed
    // Verified by changing constant values
    #[test]
    fn test_run_limits() {
        assert_eq!(DEFAULT_MAX_SWEEPS, 100);
        assert_eq!(DEFAULT_SEED, 42);
        assert_eq!(MAX_GRID_DIMENSION, 10_000);
    }

    // Tests the tuning range divides evenly into steps
    // Verified by changing the step to a non-divisor
    #[test]
    fn test_tuning_range() {
        let steps = (TUNING_MAX - TUNING_MIN) / TUNING_STEP;
        assert!((steps - 16.0).abs() < 1e-12);
    }

    // Tests rendering colours are distinct and opaque
    // Verified by making both colours equal
    #[test]
    fn test_colors() {
        assert_ne!(FOREGROUND_COLOR, BACKGROUND_COLOR);
        assert_eq!(FOREGROUND_COLOR[3], 255);
        assert_eq!(BACKGROUND_COLOR[3], 255);
    }

    // Tests output suffixes differ so outputs never overwrite each other
    // Verified by reusing the output suffix for noisy files
    #[test]
    fn test_suffixes_distinct() {
        assert_ne!(OUTPUT_SUFFIX, NOISY_SUFFIX);
        assert_ne!(OUTPUT_SUFFIX, VISUALIZATION_SUFFIX);
        assert_ne!(NOISY_SUFFIX, VISUALIZATION_SUFFIX);
    }

    // Tests GIF frame timing values
    // Verified by changing the frame delay
    #[test]
    fn test_gif_timing() {
        assert_eq!(GIF_FRAME_DELAY_MS, 200);
        assert_eq!(VIEWER_MIN_FRAME_DELAY_MS, 50);
    }
}

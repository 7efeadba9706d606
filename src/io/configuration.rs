//! Algorithm constants and runtime configuration defaults

// Default energy parameters (a, b, c)
/// Per-pixel bias `a`
pub const DEFAULT_BIAS: f64 = 1.0;
/// Pairwise smoothness coupling `b`
pub const DEFAULT_COUPLING: f64 = 1.0;
/// Fidelity weight `c` tying the guess to the observation
pub const DEFAULT_FIDELITY: f64 = 1.0;

// Bounds worst-case runtime for both optimizers
/// Maximum number of sweeps before an optimization gives up
pub const DEFAULT_MAX_SWEEPS: usize = 100;

/// Fixed seed for reproducible random traversal and noise
pub const DEFAULT_SEED: u64 = 42;

// Image conversion
/// Luma below this value is read as foreground (`+1`)
pub const DEFAULT_THRESHOLD: u8 = 128;
/// Alpha below this value is read as background regardless of colour
pub const MIN_OPAQUE_ALPHA: u8 = 128;
/// Colour written for `+1` pixels
pub const FOREGROUND_COLOR: [u8; 4] = [0, 0, 0, 255];
/// Colour written for `-1` pixels
pub const BACKGROUND_COLOR: [u8; 4] = [255, 255, 255, 255];

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

// Hyperparameter tuning grid
/// Lowest coupling and fidelity value tried by `--tune`
pub const TUNING_MIN: f64 = 0.0;
/// Highest coupling and fidelity value tried by `--tune`
pub const TUNING_MAX: f64 = 4.0;
/// Step between tuning values
pub const TUNING_STEP: f64 = 0.25;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;

// Output settings
/// Suffix added to denoised output filenames
pub const OUTPUT_SUFFIX: &str = "_denoised";
/// Suffix added to the corrupted input written when `--noise` is given
pub const NOISY_SUFFIX: &str = "_noisy";
/// Suffix added to sweep visualization filenames
pub const VISUALIZATION_SUFFIX: &str = "_sweeps";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 200;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
/// Multiplier applied to the final frame delay
pub const FINAL_FRAME_HOLD: u32 = 5;

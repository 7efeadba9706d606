//! Command-line interface for batch denoising of PNG files

use crate::algorithm::convergence::Optimisation;
use crate::algorithm::executor::{DenoiseConfig, Strategy, denoise_observed};
use crate::analysis::scoring::{Score, score};
use crate::analysis::tuning::{TuningBest, TuningGrid, tune};
use crate::io::configuration::{
    DEFAULT_BIAS, DEFAULT_COUPLING, DEFAULT_FIDELITY, DEFAULT_MAX_SWEEPS, DEFAULT_SEED,
    DEFAULT_THRESHOLD, GIF_FRAME_DELAY_MS, NOISY_SUFFIX, OUTPUT_SUFFIX, VISUALIZATION_SUFFIX,
};
use crate::io::error::{Result, io_error};
use crate::io::image::{export_label_grid, load_label_grid};
use crate::io::progress::ProgressManager;
use crate::io::visualization::SweepCapture;
use crate::lattice::energy::EnergyParams;
use crate::lattice::grid::{Coord, LabelGrid};
use crate::lattice::noise::add_noise;
use crate::lattice::traversal::TraversalOrder;
use clap::Parser;
use log::info;
use rand::{SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "mrfdenoise")]
#[command(
    author,
    version,
    about = "Denoise binary images with Iterated Conditional Modes over an Ising MRF"
)]
/// Command-line arguments for the denoising tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for random traversal and noise injection
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Maximum sweeps before stopping
    #[arg(short = 'i', long, default_value_t = DEFAULT_MAX_SWEEPS)]
    pub max_sweeps: usize,

    /// Per-pixel bias a
    #[arg(short = 'a', long, default_value_t = DEFAULT_BIAS, allow_negative_numbers = true)]
    pub bias: f64,

    /// Smoothness coupling b
    #[arg(short = 'b', long, default_value_t = DEFAULT_COUPLING, allow_negative_numbers = true)]
    pub coupling: f64,

    /// Fidelity weight c
    #[arg(short = 'c', long, default_value_t = DEFAULT_FIDELITY, allow_negative_numbers = true)]
    pub fidelity: f64,

    /// Optimizer update discipline
    #[arg(short = 'm', long, value_enum, default_value_t = Strategy::Sequential)]
    pub method: Strategy,

    /// Sweep order for sequential methods (row-major, column-major, diagonal, random)
    #[arg(short = 'o', long, default_value_t = TraversalOrder::RowMajor)]
    pub order: TraversalOrder,

    /// Row of the first pixel visited in each sweep
    #[arg(long, default_value_t = 0)]
    pub start_row: usize,

    /// Column of the first pixel visited in each sweep
    #[arg(long, default_value_t = 0)]
    pub start_col: usize,

    /// Treat input as ground truth, flip this fraction of pixels, and score the result
    #[arg(short = 'f', long)]
    pub noise: Option<f64>,

    /// Grid-search b and c for the best F1 (requires --noise)
    #[arg(short, long, requires = "noise")]
    pub tune: bool,

    /// Luma below which an opaque pixel is foreground
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u8,

    /// Write an animated GIF of every sweep
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Denoising configuration described by the arguments
    pub const fn denoise_config(&self) -> DenoiseConfig {
        DenoiseConfig {
            strategy: self.method,
            params: EnergyParams::new(self.bias, self.coupling, self.fidelity),
            order: self.order,
            start: Coord::new(self.start_row, self.start_col),
            max_sweeps: self.max_sweeps,
            seed: self.seed,
        }
    }
}

/// Summary of one processed file
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Input path
    pub input: PathBuf,
    /// Sweeps run and termination reason
    pub sweeps: usize,
    /// Whether a fixed point or cycle was reached before the cap
    pub converged: bool,
    /// Score against the clean input when `--noise` was given
    pub score: Option<Score>,
    /// Best grid cell when `--tune` was given
    pub best: Option<TuningBest>,
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, image I/O, or configuration
    /// validation fails
    pub fn process(&mut self) -> Result<Vec<FileReport>> {
        let config = self.cli.denoise_config();
        config.params.validate()?;

        let files = self.collect_files()?;
        if files.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let mut reports = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            let report = self.process_file(file, index, &config)?;
            self.print_report(&report);
            reports.push(report);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(reports)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_png(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(io_error("Target file must be a PNG image"))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if is_png(&path) && !is_generated(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(io_error("Target must be a PNG file or directory"))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        input_path: &Path,
        index: usize,
        config: &DenoiseConfig,
    ) -> Result<FileReport> {
        let start_time = Instant::now();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, config.max_sweeps);
        }

        let input = load_label_grid(input_path, self.cli.threshold)?;
        config.validate_for(&input)?;

        let (observed, ground_truth) = match self.cli.noise {
            Some(frequency) => {
                let mut rng = StdRng::seed_from_u64(self.cli.seed);
                let noisy = add_noise(&input, frequency, &mut rng)?;
                export_label_grid(&noisy, Self::get_noisy_path(input_path))?;
                (noisy, Some(input))
            }
            None => (input, None),
        };

        let optimisation = self.run_optimisation(&observed, index, config, input_path)?;
        export_label_grid(&optimisation.grid, Self::get_output_path(input_path))?;

        let score = ground_truth
            .as_ref()
            .map(|truth| score(truth, &optimisation.grid))
            .transpose()?;

        let best = match (&ground_truth, self.cli.tune) {
            (Some(truth), true) => {
                let bar = self.progress_manager.as_ref().map(ProgressManager::tuning_bar);
                let mut grid = TuningGrid::default();
                grid.bias = config.params.bias;
                let report = tune(truth, &observed, &grid, config, bar.as_ref())?;
                if let Some(bar) = bar {
                    bar.finish_and_clear();
                }
                report.best()
            }
            _ => None,
        };

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, optimisation.sweeps, start_time.elapsed());
        }

        info!(
            "{}: {:?} after {} sweeps ({} flips) in {:.2?}",
            input_path.display(),
            optimisation.termination,
            optimisation.sweeps,
            optimisation.flips,
            start_time.elapsed()
        );

        Ok(FileReport {
            input: input_path.to_path_buf(),
            sweeps: optimisation.sweeps,
            converged: optimisation.converged(),
            score,
            best,
        })
    }

    fn run_optimisation(
        &mut self,
        observed: &LabelGrid,
        index: usize,
        config: &DenoiseConfig,
        input_path: &Path,
    ) -> Result<Optimisation> {
        let mut capture = self
            .cli
            .visualize
            .then(|| SweepCapture::new(observed, config.max_sweeps));
        let mut capture_result = Ok(());
        let progress = &mut self.progress_manager;

        let optimisation = denoise_observed(observed, config, |sweep, state| {
            if let Some(pm) = progress.as_mut() {
                pm.update_sweep(index, sweep);
            }
            if let Some(capture) = capture.as_mut() {
                if capture_result.is_ok() {
                    capture_result = capture.record_sweep(state);
                }
            }
        })?;
        capture_result?;

        if let Some(capture) = capture {
            capture.export_gif(
                Self::get_visualization_path(input_path),
                GIF_FRAME_DELAY_MS,
            )?;
        }

        Ok(optimisation)
    }

    // Allow print for reporting results to the user
    #[allow(clippy::print_stdout)]
    fn print_report(&self, report: &FileReport) {
        if self.cli.quiet {
            return;
        }
        let status = if report.converged {
            "converged"
        } else {
            "sweep cap reached"
        };
        println!(
            "{}: {status} after {} sweeps",
            report.input.display(),
            report.sweeps
        );
        if let Some(score) = report.score {
            println!("  {score}");
        }
        if let Some(best) = report.best {
            println!(
                "  best F1 {:.4} at a = {}, b = {}, c = {}",
                best.f1, best.params.bias, best.params.coupling, best.params.fidelity
            );
        }
    }

    fn get_output_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, OUTPUT_SUFFIX, "png")
    }

    fn get_noisy_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, NOISY_SUFFIX, "png")
    }

    fn get_visualization_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, VISUALIZATION_SUFFIX, "gif")
    }

    fn sibling_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(name)
        } else {
            PathBuf::from(name)
        }
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

// Our own outputs in a directory are never treated as inputs
fn is_generated(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX) || stem.ends_with(NOISY_SUFFIX))
}

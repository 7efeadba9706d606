//! Progress display for batch denoising and parameter tuning

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Coordinates progress bars for a batch of files
///
/// Small batches get one sweep bar per file; larger batches add a file
/// counter and reuse the most recent bars in a rolling window.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    /// Stores (`filename`, `sweep`, `max_sweeps`) per file
    file_states: Vec<(String, usize, usize)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static SWEEP_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{prefix}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

static TUNING_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Tuning: [{bar:40.green/blue}] {pos}/{len} runs")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_states: Vec::new(),
        }
    }

    /// Create bars for a batch of `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        // Batch counter for large sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let pb = ProgressBar::new(0);
            pb.set_style(SWEEP_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Configure the display for a new file
    pub fn start_file(&mut self, index: usize, path: &Path, max_sweeps: usize) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states.resize(index + 1, (String::new(), 0, 0));
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = (display_name, 0, max_sweeps);
        }
        self.update_bars();
    }

    /// Report the number of completed sweeps
    pub fn update_sweep(&mut self, index: usize, sweep: usize) {
        if let Some(state) = self.file_states.get_mut(index) {
            state.1 = sweep;
        }
        self.update_bars();
    }

    /// Mark a file as completed after `sweeps` sweeps
    pub fn complete_file(&mut self, index: usize, sweeps: usize, _elapsed: Duration) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.file_states.get_mut(index) {
            state.0 = format!("✓ {}", state.0);
            state.1 = sweeps;
            state.2 = sweeps.max(1);
        }
        self.update_bars();
    }

    /// Add a bar counting tuning runs
    pub fn tuning_bar(&self) -> ProgressBar {
        let bar = ProgressBar::new(0);
        bar.set_style(TUNING_STYLE.clone());
        self.multi_progress.add(bar)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Show the most recent files in the available bars
    fn update_bars(&self) {
        let active: Vec<&(String, usize, usize)> = self
            .file_states
            .iter()
            .filter(|(name, _, _)| !name.is_empty())
            .collect();

        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar_idx, bar) in self.file_bars.iter().enumerate() {
            if let Some((name, current, max)) = visible.get(bar_idx).copied() {
                bar.set_length(*max as u64);
                bar.set_position(*current as u64);
                let max_width = max.to_string().len();
                bar.set_message(format!("{current:>max_width$}/{max}"));
                bar.set_prefix(name.clone());
            } else {
                bar.set_length(0);
                bar.set_position(0);
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }
}

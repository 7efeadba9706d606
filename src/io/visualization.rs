//! Frame capture and GIF generation for sweep-by-sweep visualization

use std::path::Path;

use image::{Delay, Frame};

use crate::io::configuration::{FINAL_FRAME_HOLD, VIEWER_MIN_FRAME_DELAY_MS};
use crate::io::error::{DenoiseError, Result};
use crate::io::image::label_grid_to_image;
use crate::lattice::grid::LabelGrid;

/// Captures the guess after each sweep of a run
///
/// The first frame is the observation; frames are only rendered on export.
pub struct SweepCapture {
    frames: Vec<LabelGrid>,
}

impl SweepCapture {
    /// Start a capture from the initial state
    pub fn new(initial: &LabelGrid, max_sweeps: usize) -> Self {
        let mut frames = Vec::with_capacity(max_sweeps.min(1024) + 1);
        frames.push(initial.clone());
        Self { frames }
    }

    /// Record the state reached by a sweep
    ///
    /// # Errors
    ///
    /// Returns an error if the state's shape differs from the initial frame
    pub fn record_sweep(&mut self, state: &LabelGrid) -> Result<()> {
        if let Some(first) = self.frames.first() {
            crate::lattice::grid::ensure_same_shape("record_sweep", first, state)?;
        }
        self.frames.push(state.clone());
        Ok(())
    }

    /// Number of captured frames, including the initial one
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Captured states in order
    pub fn frames(&self) -> &[LabelGrid] {
        &self.frames
    }

    /// Export the captured sweeps as a GIF
    ///
    /// Delays shorter than viewers support are raised to the minimum and every
    /// `n`th frame kept, so the apparent speed is preserved. The final frame is
    /// held longer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Only the initial frame was captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif<P: AsRef<Path>>(&self, output_path: P, frame_delay_ms: u32) -> Result<()> {
        let output_path = output_path.as_ref();
        if self.frames.len() < 2 {
            return Err(DenoiseError::InvalidSourceData {
                reason: "No sweeps captured for visualization".to_string(),
            });
        }

        let frame_delay_ms = frame_delay_ms.max(1);
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms) as usize
        } else {
            1
        };

        let frames = self.render_frames(effective_delay_ms, skip_factor);

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DenoiseError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| DenoiseError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| DenoiseError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn render_frames(&self, delay_ms: u32, skip_factor: usize) -> Vec<Frame> {
        let last = self.frames.len() - 1;
        self.frames
            .iter()
            .enumerate()
            .filter(|(index, _)| index % skip_factor == 0 || *index == last)
            .map(|(index, grid)| {
                let delay = if index == last {
                    delay_ms * FINAL_FRAME_HOLD
                } else {
                    delay_ms
                };
                Frame::from_parts(
                    label_grid_to_image(grid),
                    0,
                    0,
                    Delay::from_numer_denom_ms(delay, 1),
                )
            })
            .collect()
    }
}

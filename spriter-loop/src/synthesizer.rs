//! Preview loop synthesis from a sprite sheet

use crate::blank_detector::BlankThresholds;
use crate::frame_slicer::{slice_sheet, Frame};
use crate::gif_writer::write_gif;
use crate::sequence::LoopSequence;
use crate::{Error, Result};
use image::{ImageFormat, RgbaImage};
use spriter_core::{frame_delay_ms, FrameSize, Grid};
use std::path::{Path, PathBuf};

/// Result of a synthesis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// An animation was written
    Written {
        /// Location of the animation
        path: PathBuf,
        /// Frames in the animation, including the closing copy
        frame_count: usize,
        /// Frames of the sheet that were dropped as blank
        discarded: usize,
    },
    /// Every cell was blank; nothing was written
    NoUsableFrames,
}

/// Turns a sprite sheet into a seamlessly looping animation
#[derive(Debug, Clone, Default)]
pub struct LoopSynthesizer {
    thresholds: BlankThresholds,
}

impl LoopSynthesizer {
    /// Returns a synthesizer if this build can read sheets and write GIFs
    pub fn detect() -> Option<Self> {
        let available = ImageFormat::Png.reading_enabled() && ImageFormat::Gif.writing_enabled();
        if !available {
            log::warn!("image codecs for PNG input or GIF output are missing; previews disabled");
            return None;
        }
        Some(Self::default())
    }

    /// Uses custom blank-frame thresholds
    pub fn with_thresholds(mut self, thresholds: BlankThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Slices `sheet` and keeps the frames that are not blank, in row-major order
    pub fn retained_frames(&self, sheet: &RgbaImage, grid: Grid) -> Result<(Vec<Frame>, usize)> {
        let frames = slice_sheet(sheet, grid)?;
        let total = frames.len();

        let retained: Vec<Frame> = frames
            .into_iter()
            .filter(|frame| {
                if !frame.is_blank(&self.thresholds) {
                    return true;
                }
                let c = self.thresholds.classify(&frame.image);
                log::debug!(
                    "dropping blank frame at row {} col {} (black ratio {:.2}, brightness {:.1})",
                    frame.row,
                    frame.col,
                    c.black_ratio,
                    c.brightness
                );
                false
            })
            .collect();

        let discarded = total - retained.len();
        Ok((retained, discarded))
    }

    /// Builds the loop sequence for an in-memory sheet
    pub fn build_sequence(
        &self,
        sheet: &RgbaImage,
        grid: Grid,
        target: Option<FrameSize>,
    ) -> Result<LoopSequence> {
        let (retained, _) = self.retained_frames(sheet, grid)?;
        Ok(LoopSequence::new(retained, target))
    }

    /// Reads the sheet at `sheet_path` and writes its preview loop to `output`.
    ///
    /// Frames are shown for `round(1000 / frame_rate)` ms each. When `target`
    /// is given every frame is resized to it. If no frame survives blank
    /// filtering nothing is written and [`LoopOutcome::NoUsableFrames`] is
    /// returned.
    pub fn synthesize(
        &self,
        sheet_path: &Path,
        output: &Path,
        grid: Grid,
        frame_rate: f64,
        target: Option<FrameSize>,
    ) -> Result<LoopOutcome> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(spriter_core::Error::InvalidFrameRate(frame_rate).into());
        }

        let sheet = image::open(sheet_path)
            .map_err(|e| Error::ImageLoad(format!("{}: {e}", sheet_path.display())))?
            .to_rgba8();

        let (retained, discarded) = self.retained_frames(&sheet, grid)?;
        let sequence = LoopSequence::new(retained, target);

        if sequence.is_empty() {
            log::info!("no usable frames in {}", sheet_path.display());
            return Ok(LoopOutcome::NoUsableFrames);
        }

        write_gif(output, sequence.frames(), frame_delay_ms(frame_rate))?;
        log::info!(
            "wrote preview loop {} ({} frames, {} blank dropped)",
            output.display(),
            sequence.len(),
            discarded
        );

        Ok(LoopOutcome::Written {
            path: output.to_path_buf(),
            frame_count: sequence.len(),
            discarded,
        })
    }
}

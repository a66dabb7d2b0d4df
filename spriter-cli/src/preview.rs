//! Optional preview loop support
//!
//! The loop synthesizer is compiled in through the `preview` feature and its
//! codecs are checked once at startup. The result is passed to the batch
//! driver so callers can ask whether previews are possible before requesting
//! one.

use spriter_core::{FrameSize, Grid};
use std::path::{Path, PathBuf};

#[cfg(feature = "preview")]
use spriter_loop::{LoopOutcome, LoopSynthesizer};

/// Outcome of a preview request for one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// A looping animation was written
    Written { path: PathBuf, frame_count: usize },
    /// Every cell of the sheet was blank
    NoUsableFrames,
    /// This build cannot synthesize previews
    Unavailable,
    /// Synthesis failed; the sheet is kept
    Failed(String),
}

/// Whether preview loops can be produced, detected once per run
pub enum PreviewSupport {
    #[cfg(feature = "preview")]
    Available(LoopSynthesizer),
    Unavailable,
}

impl PreviewSupport {
    /// Checks the optional image capability
    pub fn detect() -> Self {
        #[cfg(feature = "preview")]
        {
            if let Some(synth) = LoopSynthesizer::detect() {
                return PreviewSupport::Available(synth);
            }
        }
        PreviewSupport::Unavailable
    }

    /// Returns true if previews can be produced
    pub fn is_available(&self) -> bool {
        !matches!(self, PreviewSupport::Unavailable)
    }

    /// Builds the preview loop for `sheet`, writing it to `output`
    #[cfg_attr(not(feature = "preview"), allow(unused_variables))]
    pub fn synthesize(
        &self,
        sheet: &Path,
        output: &Path,
        grid: Grid,
        frame_rate: f64,
        target: Option<FrameSize>,
    ) -> PreviewOutcome {
        match self {
            #[cfg(feature = "preview")]
            PreviewSupport::Available(synth) => {
                match synth.synthesize(sheet, output, grid, frame_rate, target) {
                    Ok(LoopOutcome::Written {
                        path, frame_count, ..
                    }) => PreviewOutcome::Written { path, frame_count },
                    Ok(LoopOutcome::NoUsableFrames) => PreviewOutcome::NoUsableFrames,
                    Err(e) => PreviewOutcome::Failed(e.to_string()),
                }
            }
            PreviewSupport::Unavailable => PreviewOutcome::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_support() {
        let support = PreviewSupport::Unavailable;
        assert!(!support.is_available());
        let outcome = support.synthesize(
            Path::new("sheet.png"),
            Path::new("sheet.gif"),
            Grid::new(2, 2).unwrap(),
            10.0,
            None,
        );
        assert_eq!(outcome, PreviewOutcome::Unavailable);
    }

    #[cfg(feature = "preview")]
    #[test]
    fn test_detected_support() {
        assert!(PreviewSupport::detect().is_available());
    }

    #[cfg(feature = "preview")]
    #[test]
    fn test_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = PreviewSupport::detect().synthesize(
            &dir.path().join("missing.png"),
            &dir.path().join("missing.gif"),
            Grid::new(2, 2).unwrap(),
            10.0,
            None,
        );
        assert!(matches!(outcome, PreviewOutcome::Failed(_)));
    }
}

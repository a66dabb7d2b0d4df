//! Spriter Loop Library
//!
//! This library turns a sprite sheet back into an animated preview: the sheet
//! is sliced into frames, blank frames are dropped, the first frame is repeated
//! at the end to close the loop, and the result is encoded as a looping GIF.

pub mod blank_detector;
pub mod frame_slicer;
pub mod gif_writer;
pub mod sequence;
pub mod synthesizer;

pub use blank_detector::BlankThresholds;
pub use frame_slicer::Frame;
pub use sequence::LoopSequence;
pub use synthesizer::{LoopOutcome, LoopSynthesizer};

/// Result type for spriter-loop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for spriter-loop operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Spriter core error: {0}")]
    Core(#[from] spriter_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not load sprite sheet: {0}")]
    ImageLoad(String),

    #[error("Could not encode preview animation: {0}")]
    ImageEncode(String),
}

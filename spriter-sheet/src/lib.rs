//! Spriter Sheet Library
//!
//! This library turns a video into a sprite sheet by driving the external
//! `ffmpeg` tool: frames are sampled at a fixed rate, scaled to a fixed size
//! and tiled row-major into a grid, producing a single image.

pub mod builder;
pub mod ffmpeg;
pub mod probe;
pub mod progress_tracker;
pub mod runner;

pub use builder::{BuiltSheet, SheetBuilder};
pub use probe::{estimate_coverage, FrameCoverage, VideoInfo};
pub use progress_tracker::ProgressTracker;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

use std::path::{Path, PathBuf};

/// Result type for spriter-sheet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for spriter-sheet operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Spriter core error: {0}")]
    Core(#[from] spriter_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} is not installed or not in PATH ({reason})")]
    ToolUnavailable { tool: &'static str, reason: String },

    #[error(
        "Unsupported file format '{0}'. Supported formats: .mov, .mp4, .mpg"
    )]
    UnsupportedFormat(String),

    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Error running {tool} (exit status {status:?}): {stderr}")]
    ExternalToolFailure {
        tool: &'static str,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{} reported success but wrote no output", .0.display())]
    MissingOutput(PathBuf),

    #[error("Invalid path (not valid UTF-8): {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Invalid ffprobe output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No video stream found")]
    NoVideoStream,
}

/// Converts a path into a command-line argument
pub(crate) fn path_arg(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))
}

//! Spriter Core Library
//!
//! This library provides the data model shared by the sheet builder, the loop
//! synthesizer and the command-line tool: sampling configuration and presets,
//! sprite sheet geometry, input discovery and output naming.

pub mod config;
pub mod layout;
pub mod media;
pub mod naming;

pub use config::{frame_delay_ms, FrameSize, Grid, Preset, SamplingConfig};
pub use layout::{CellRect, SheetLayout};
pub use media::{discover_videos, is_supported_video, video_extension, SUPPORTED_EXTENSIONS};

use std::path::PathBuf;

/// Result type for spriter-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for spriter-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid frame rate: {0} (must be a positive number)")]
    InvalidFrameRate(f64),

    #[error("Unknown preset: {0} (expected game, web or hires)")]
    UnknownPreset(String),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

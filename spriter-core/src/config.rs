//! Sampling configuration and presets

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Size of a single sprite frame in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameSize {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl FrameSize {
    /// Creates a new frame size, rejecting zero dimensions
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "{width}x{height} (dimensions must be positive)"
            )));
        }
        Ok(Self { width, height })
    }
}

impl FromStr for FrameSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (width, height) = parse_pair(s)?;
        Self::new(width, height)
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Grid layout of a sprite sheet (columns x rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    /// Number of columns
    pub columns: u32,
    /// Number of rows
    pub rows: u32,
}

impl Grid {
    /// Creates a new grid, rejecting empty layouts
    pub fn new(columns: u32, rows: u32) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(Error::InvalidDimensions(format!(
                "{columns}x{rows} (grid must have at least one column and one row)"
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Number of cells in the grid
    pub fn capacity(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (columns, rows) = parse_pair(s)?;
        Self::new(columns, rows)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Parses `AxB` (case-insensitive separator) into a pair of integers
fn parse_pair(s: &str) -> Result<(u32, u32)> {
    let trimmed = s.trim();
    let (a, b) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| Error::InvalidDimensions(format!("'{s}' (expected format AxB)")))?;

    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidDimensions(format!("'{s}' (expected format AxB)")))
    };

    Ok((parse(a)?, parse(b)?))
}

/// Parameters controlling how frames are sampled from a video and laid out
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplingConfig {
    /// Frames per second of source video to extract
    pub frame_rate: f64,
    /// Size every sampled frame is scaled to (aspect ratio is not preserved)
    pub frame_size: FrameSize,
    /// Grid the sampled frames are tiled into, row-major
    pub grid: Grid,
}

impl SamplingConfig {
    /// Creates a new sampling configuration
    pub fn new(frame_rate: f64, frame_size: FrameSize, grid: Grid) -> Result<Self> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(Error::InvalidFrameRate(frame_rate));
        }
        let fits = frame_size.width.checked_mul(grid.columns).is_some()
            && frame_size.height.checked_mul(grid.rows).is_some();
        if !fits {
            return Err(Error::InvalidDimensions(format!(
                "{grid} grid of {frame_size} frames is too large for one image"
            )));
        }
        Ok(Self {
            frame_rate,
            frame_size,
            grid,
        })
    }

    /// Pixel dimensions of a sheet produced with this configuration
    pub fn sheet_dimensions(&self) -> (u32, u32) {
        (
            self.frame_size.width.saturating_mul(self.grid.columns),
            self.frame_size.height.saturating_mul(self.grid.rows),
        )
    }

    /// ffmpeg filter chain: sample, scale, then tile
    pub fn filter_expression(&self) -> String {
        format!(
            "fps={},scale={},tile={}",
            self.frame_rate, self.frame_size, self.grid
        )
    }

    /// Per-frame display duration of a preview loop, in milliseconds
    pub fn frame_delay_ms(&self) -> u32 {
        frame_delay_ms(self.frame_rate)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Preset::Game.config()
    }
}

/// Rounds `1000 / frame_rate` to whole milliseconds
pub fn frame_delay_ms(frame_rate: f64) -> u32 {
    (1000.0 / frame_rate).round() as u32
}

/// Named bundle of sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Preset {
    /// 10 fps, 64x64 frames, 6x6 grid
    Game,
    /// 8 fps, 32x32 frames, 4x4 grid
    Web,
    /// 12 fps, 128x128 frames, 8x8 grid
    Hires,
}

impl Preset {
    /// All presets in declaration order
    pub const ALL: [Preset; 3] = [Preset::Game, Preset::Web, Preset::Hires];

    /// Lowercase preset name, as used on the command line and in file names
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Game => "game",
            Preset::Web => "web",
            Preset::Hires => "hires",
        }
    }

    /// Sampling parameters for this preset
    pub fn config(&self) -> SamplingConfig {
        let (frame_rate, side, cells) = match self {
            Preset::Game => (10.0, 64, 6),
            Preset::Web => (8.0, 32, 4),
            Preset::Hires => (12.0, 128, 8),
        };
        SamplingConfig {
            frame_rate,
            frame_size: FrameSize {
                width: side,
                height: side,
            },
            grid: Grid {
                columns: cells,
                rows: cells,
            },
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

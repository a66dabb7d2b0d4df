//! Source video metadata via `ffprobe`, and frame coverage estimation

use crate::ffmpeg::check_status;
use crate::runner::CommandRunner;
use crate::{path_arg, Error, Result};
use serde::Deserialize;
use spriter_core::{FrameSize, SamplingConfig};
use std::path::Path;

/// Program name looked up on `PATH`
pub const FFPROBE: &str = "ffprobe";

/// Metadata of the first video stream of a file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Native frame rate, if reported
    pub fps: Option<f64>,
    /// Container duration in seconds, if reported
    pub duration_secs: Option<f64>,
    /// Number of frames in the stream, if reported
    pub frame_count: Option<u64>,
}

impl VideoInfo {
    /// Source resolution, if both dimensions are known
    pub fn resolution(&self) -> Option<FrameSize> {
        FrameSize::new(self.width, self.height).ok()
    }

    /// Duration from the container, or derived from frame count and rate
    pub fn effective_duration(&self) -> Option<f64> {
        match (self.duration_secs, self.frame_count, self.fps) {
            (Some(d), _, _) if d > 0.0 => Some(d),
            (_, Some(n), Some(fps)) if fps > 0.0 => Some(n as f64 / fps),
            _ => None,
        }
    }
}

/// How many sampled frames a video yields compared to the grid capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCoverage {
    /// Frames the sampler is expected to produce
    pub expected: u64,
    /// Cells in the grid
    pub needed: u64,
}

impl FrameCoverage {
    /// Returns true if the sheet will have empty trailing cells
    pub fn is_short(&self) -> bool {
        self.expected < self.needed
    }

    /// Cells that will stay empty
    pub fn missing(&self) -> u64 {
        self.needed.saturating_sub(self.expected)
    }
}

/// Estimates how much of the grid a video fills at the configured rate
pub fn estimate_coverage(info: &VideoInfo, config: &SamplingConfig) -> Option<FrameCoverage> {
    let duration = info.effective_duration()?;
    let expected = ((duration * config.frame_rate).floor() as u64).max(1);
    Some(FrameCoverage {
        expected,
        needed: config.grid.capacity(),
    })
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Parses ffprobe's `num/den` rational, rejecting zero denominators
fn parse_rate(text: &str) -> Option<f64> {
    let (num, den) = match text.split_once('/') {
        Some((n, d)) => (n.trim().parse::<f64>().ok()?, d.trim().parse::<f64>().ok()?),
        None => (text.trim().parse::<f64>().ok()?, 1.0),
    };
    if den == 0.0 || num <= 0.0 {
        return None;
    }
    Some(num / den)
}

/// Parses the JSON printed by `ffprobe -of json`
pub fn parse_probe_json(json: &str) -> Result<VideoInfo> {
    let probe: ProbeOutput = serde_json::from_str(json)?;

    let stream = probe
        .streams
        .into_iter()
        .next()
        .ok_or(Error::NoVideoStream)?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(Error::NoVideoStream),
    };

    Ok(VideoInfo {
        width,
        height,
        fps: stream.r_frame_rate.as_deref().and_then(parse_rate),
        duration_secs: probe
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.trim().parse().ok()),
        frame_count: stream.nb_frames.and_then(|n| n.trim().parse().ok()),
    })
}

/// Thin wrapper around the `ffprobe` command line
pub struct Ffprobe<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Ffprobe<R> {
    /// Creates a wrapper that spawns ffprobe through `runner`
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Reads resolution, frame rate, duration and frame count of `input`
    pub fn probe(&self, input: &Path) -> Result<VideoInfo> {
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_entries".to_string(),
            "format=duration:stream=width,height,r_frame_rate,nb_frames".to_string(),
            "-of".to_string(),
            "json".to_string(),
            path_arg(input)?,
        ];

        let output = self
            .runner
            .run(FFPROBE, &args)
            .map_err(|e| Error::ToolUnavailable {
                tool: FFPROBE,
                reason: e.to_string(),
            })?;
        let stdout = output.stdout_text();
        check_status(FFPROBE, output)?;

        let info = parse_probe_json(&stdout)?;
        log::info!(
            "probe: {}x{} @ {:?} fps, {:?} s, {:?} frames - {}",
            info.width,
            info.height,
            info.fps,
            info.duration_secs,
            info.frame_count,
            input.display()
        );
        Ok(info)
    }
}

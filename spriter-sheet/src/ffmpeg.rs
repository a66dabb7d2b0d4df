//! ffmpeg invocation: availability check and sample/scale/tile extraction

use crate::runner::{CommandOutput, CommandRunner};
use crate::{path_arg, Error, Result};
use spriter_core::SamplingConfig;
use std::path::Path;

/// Program name looked up on `PATH`
pub const FFMPEG: &str = "ffmpeg";

// Only the tail of ffmpeg's stderr is worth showing; the head is the banner.
const STDERR_TAIL_LINES: usize = 20;

/// Thin wrapper around the `ffmpeg` command line
pub struct Ffmpeg<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Ffmpeg<R> {
    /// Creates a wrapper that spawns ffmpeg through `runner`
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Runs `ffmpeg -version` and returns the first banner line
    pub fn check_available(&self) -> Result<String> {
        let output = self
            .runner
            .run(FFMPEG, &["-version".to_string()])
            .map_err(|e| Error::ToolUnavailable {
                tool: FFMPEG,
                reason: e.to_string(),
            })?;

        if !output.success {
            return Err(Error::ToolUnavailable {
                tool: FFMPEG,
                reason: format!("`ffmpeg -version` exited with {:?}", output.status),
            });
        }

        let version = output
            .stdout_text()
            .lines()
            .next()
            .unwrap_or(FFMPEG)
            .trim()
            .to_string();
        log::debug!("found {version}");
        Ok(version)
    }

    /// Samples, scales and tiles `input` into one image written to `output`
    pub fn extract_sheet(
        &self,
        input: &Path,
        output: &Path,
        config: &SamplingConfig,
    ) -> Result<()> {
        let args = sheet_args(input, output, config)?;
        log::debug!("ffmpeg {}", args.join(" "));

        let result = self
            .runner
            .run(FFMPEG, &args)
            .map_err(|e| Error::ToolUnavailable {
                tool: FFMPEG,
                reason: e.to_string(),
            })?;

        check_status(FFMPEG, result)
    }
}

/// Arguments that sample `input` into a single tiled image at `output`
pub fn sheet_args(input: &Path, output: &Path, config: &SamplingConfig) -> Result<Vec<String>> {
    Ok(vec![
        "-i".to_string(),
        path_arg(input)?,
        "-vf".to_string(),
        config.filter_expression(),
        "-frames:v".to_string(),
        "1".to_string(),
        // overwrite any existing output
        "-y".to_string(),
        path_arg(output)?,
    ])
}

/// Converts a nonzero exit into [`Error::ExternalToolFailure`]
pub(crate) fn check_status(tool: &'static str, output: CommandOutput) -> Result<()> {
    if output.success {
        return Ok(());
    }

    Err(Error::ExternalToolFailure {
        tool,
        status: output.status,
        stderr: stderr_tail(&output.stderr_text(), STDERR_TAIL_LINES),
    })
}

/// Keeps the last `lines` non-empty lines of a diagnostic dump
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let kept: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join("\n")
}

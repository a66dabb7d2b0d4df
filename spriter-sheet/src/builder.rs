//! Sprite sheet construction

use crate::ffmpeg::Ffmpeg;
use crate::probe::{estimate_coverage, FrameCoverage, Ffprobe, VideoInfo};
use crate::runner::CommandRunner;
use crate::{Error, Result};
use spriter_core::{is_supported_video, SamplingConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// A sprite sheet written to disk
#[derive(Debug, Clone)]
pub struct BuiltSheet {
    /// Location of the sheet image
    pub path: PathBuf,
    /// Size of the sheet file in bytes
    pub file_size: u64,
    /// Pixel dimensions read back from the image header
    pub dimensions: Option<(u32, u32)>,
    /// Source metadata, when the pre-check ran and succeeded
    pub source: Option<VideoInfo>,
    /// Expected vs needed frame count, when known
    pub coverage: Option<FrameCoverage>,
}

/// Builds sprite sheets from videos with ffmpeg.
///
/// The optional pre-check probes the source with ffprobe and warns when the
/// video is too short to fill the grid; it never blocks the build.
pub struct SheetBuilder<R: CommandRunner + Copy> {
    runner: R,
    precheck: bool,
}

impl<R: CommandRunner + Copy> SheetBuilder<R> {
    /// Creates a builder with the duration pre-check enabled
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            precheck: true,
        }
    }

    /// Enables or disables the ffprobe pre-check
    pub fn with_precheck(mut self, precheck: bool) -> Self {
        self.precheck = precheck;
        self
    }

    /// Checks that ffmpeg can be invoked, returning its version line
    pub fn check_tool(&self) -> Result<String> {
        Ffmpeg::new(self.runner).check_available()
    }

    /// Rejects inputs whose extension is not an accepted video format
    pub fn validate_input(input: &Path) -> Result<()> {
        if !is_supported_video(input) {
            let ext = input
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            return Err(Error::UnsupportedFormat(ext));
        }
        if !input.is_file() {
            return Err(Error::InputNotFound(input.to_path_buf()));
        }
        Ok(())
    }

    /// Probes `input` and estimates grid coverage.
    ///
    /// Probe failures are logged and reported as `None`.
    pub fn precheck(&self, input: &Path, config: &SamplingConfig) -> Option<(VideoInfo, Option<FrameCoverage>)> {
        let info = match Ffprobe::new(self.runner).probe(input) {
            Ok(info) => info,
            Err(e) => {
                log::debug!("skipping frame count pre-check for {}: {e}", input.display());
                return None;
            }
        };

        let coverage = estimate_coverage(&info, config);
        if let Some(coverage) = coverage.filter(FrameCoverage::is_short) {
            log::warn!(
                "{} yields about {} frame(s) at {} fps but the {} grid has {} cells; {} cell(s) will be blank",
                input.display(),
                coverage.expected,
                config.frame_rate,
                config.grid,
                coverage.needed,
                coverage.missing()
            );
        }
        Some((info, coverage))
    }

    /// Samples `input` into a sprite sheet written to `output`.
    ///
    /// Any existing file at `output` is overwritten.
    pub fn build_sheet(
        &self,
        input: &Path,
        output: &Path,
        config: &SamplingConfig,
    ) -> Result<BuiltSheet> {
        Self::validate_input(input)?;

        let (source, coverage) = if self.precheck {
            match self.precheck(input, config) {
                Some((info, coverage)) => (Some(info), coverage),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        Ffmpeg::new(self.runner).extract_sheet(input, output, config)?;

        if !output.is_file() {
            return Err(Error::MissingOutput(output.to_path_buf()));
        }

        let file_size = fs::metadata(output)?.len();
        let dimensions = image::image_dimensions(output).ok();
        if let Some(actual) = dimensions {
            let expected = config.sheet_dimensions();
            if actual != expected {
                log::warn!(
                    "{} is {}x{}, expected {}x{}",
                    output.display(),
                    actual.0,
                    actual.1,
                    expected.0,
                    expected.1
                );
            }
        }

        log::info!(
            "wrote sprite sheet {} ({} bytes)",
            output.display(),
            file_size
        );

        Ok(BuiltSheet {
            path: output.to_path_buf(),
            file_size,
            dimensions,
            source,
            coverage,
        })
    }
}

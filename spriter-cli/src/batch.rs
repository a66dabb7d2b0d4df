//! Per-file processing and batch policy

use crate::preview::{PreviewOutcome, PreviewSupport};
use spriter_core::naming::{params_label, preview_path, sheet_path, sheet_paths};
use spriter_core::{FrameSize, Preset, SamplingConfig};
use spriter_sheet::{BuiltSheet, CommandRunner, SheetBuilder};
use std::path::{Path, PathBuf};

/// Which preview, if any, to produce after each sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    /// Sheet only
    Off,
    /// Preview frames keep the sprite cell size
    CellSize,
    /// Loop-safe preview, frames resized to the source video resolution
    SourceResolution,
}

/// Where sheets are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Derived name next to each input
    Beside,
    /// Exact path (single file)
    File(PathBuf),
    /// Derived name inside a directory (batch)
    Directory(PathBuf),
}

/// Everything needed to process one video, fixed for the whole run
#[derive(Debug, Clone)]
pub struct Job {
    pub config: SamplingConfig,
    pub preset: Option<Preset>,
    pub output: OutputTarget,
    pub preview: PreviewMode,
}

impl Job {
    /// Sheet path for `input`
    pub fn sheet_path_for(&self, input: &Path) -> PathBuf {
        let label = params_label(self.preset, &self.config);
        match &self.output {
            OutputTarget::Beside => sheet_path(input, None, &label),
            OutputTarget::File(path) => path.clone(),
            OutputTarget::Directory(dir) => sheet_path(input, Some(dir), &label),
        }
    }

    /// Sheet paths for a batch, one per input, never two alike
    pub fn sheet_paths_for(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let label = params_label(self.preset, &self.config);
        match &self.output {
            OutputTarget::Beside => sheet_paths(inputs, None, &label),
            OutputTarget::Directory(dir) => sheet_paths(inputs, Some(dir), &label),
            OutputTarget::File(_) => inputs.iter().map(|i| self.sheet_path_for(i)).collect(),
        }
    }
}

/// Result of processing one input file
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub sheet: Result<BuiltSheet, spriter_sheet::Error>,
    pub preview: Option<PreviewOutcome>,
}

impl FileReport {
    /// Returns true if the sheet was written
    pub fn succeeded(&self) -> bool {
        self.sheet.is_ok()
    }
}

/// Builds the sheet for `input` at `output` and, if requested, its preview loop.
///
/// A preview failure is recorded in the report and never removes the sheet.
pub fn process_file<R: CommandRunner + Copy>(
    builder: &SheetBuilder<R>,
    preview: &PreviewSupport,
    input: &Path,
    output: &Path,
    job: &Job,
) -> FileReport {
    let sheet = builder.build_sheet(input, output, &job.config);

    let preview = match (&sheet, job.preview) {
        (Ok(_), PreviewMode::Off) | (Err(_), _) => None,
        (Ok(built), mode) => {
            let target = match mode {
                PreviewMode::SourceResolution => source_resolution(built),
                _ => None,
            };
            Some(preview.synthesize(
                &built.path,
                &preview_path(&built.path),
                job.config.grid,
                job.config.frame_rate,
                target,
            ))
        }
    };

    FileReport {
        input: input.to_path_buf(),
        sheet,
        preview,
    }
}

fn source_resolution(built: &BuiltSheet) -> Option<FrameSize> {
    let resolution = built.source.as_ref().and_then(|info| info.resolution());
    if resolution.is_none() {
        log::warn!(
            "source resolution of {} unknown; preview keeps the cell size",
            built.path.display()
        );
    }
    resolution
}

/// Runs `convert` over every input in order with its sheet path, tallying
/// results. Failures never stop the batch.
pub fn run_batch<F>(inputs: &[PathBuf], job: &Job, mut convert: F) -> BatchSummary
where
    F: FnMut(usize, &Path, &Path) -> FileReport,
{
    let outputs = job.sheet_paths_for(inputs);
    let mut summary = BatchSummary::default();
    for (i, (input, output)) in inputs.iter().zip(&outputs).enumerate() {
        let report = convert(i, input, output);
        summary.record(&report);
    }
    summary
}

/// Tally of a batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Adds one file's result
    pub fn record(&mut self, report: &FileReport) {
        if report.succeeded() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Total files seen
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// A batch fails only when every file failed
    pub fn is_failure(&self) -> bool {
        self.total() > 0 && self.succeeded == 0
    }
}

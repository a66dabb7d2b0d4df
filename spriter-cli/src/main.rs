//! Spriter CLI Tool
//!
//! Command-line interface for turning videos into sprite sheets and looping
//! preview animations.

mod batch;
mod preview;

use anyhow::{bail, Context, Result};
use batch::{process_file, run_batch, BatchSummary, FileReport, Job, OutputTarget, PreviewMode};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use preview::{PreviewOutcome, PreviewSupport};
use spriter_core::{discover_videos, FrameSize, Grid, Preset, SamplingConfig};
use spriter_sheet::{CommandRunner, ProgressTracker, SheetBuilder, SystemRunner};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "spriter")]
#[command(about = "Convert videos into sprite sheets and seamless preview loops")]
#[command(version)]
struct Cli {
    /// Input video file or directory of videos
    input: PathBuf,

    /// Output sheet path (a directory when the input is a directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frames per second to sample
    #[arg(short, long, default_value = "10", value_parser = parse_fps)]
    fps: f64,

    /// Size of each frame (WxH)
    #[arg(short, long, default_value = "64x64")]
    size: FrameSize,

    /// Grid layout (ColsxRows)
    #[arg(short, long, default_value = "6x6")]
    grid: Grid,

    /// Preset overriding fps, size and grid
    #[arg(short, long, value_enum)]
    preset: Option<PresetArg>,

    /// Also build a seamless preview loop at the source video resolution
    #[arg(long = "loop")]
    loop_safe: bool,

    /// Also build a preview animation at the frame size
    #[arg(long)]
    preview: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: log::LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    /// 10 fps, 64x64, 6x6
    Game,
    /// 8 fps, 32x32, 4x4
    Web,
    /// 12 fps, 128x128, 8x8
    Hires,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Game => Preset::Game,
            PresetArg::Web => Preset::Web,
            PresetArg::Hires => Preset::Hires,
        }
    }
}

fn parse_fps(s: &str) -> std::result::Result<f64, String> {
    let rate: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(format!("frame rate must be positive, got {s}"));
    }
    Ok(rate)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let (config, preset) = resolve_config(cli)?;
    if let Some(preset) = preset {
        println!(
            "Using preset '{}': fps={}, size={}, grid={}",
            preset, config.frame_rate, config.frame_size, config.grid
        );
    }

    if !cli.input.exists() {
        bail!("Input path '{}' does not exist", cli.input.display());
    }

    let directory_mode = cli.input.is_dir();
    let inputs = collect_inputs(&cli.input)?;

    let builder = SheetBuilder::new(SystemRunner);
    let version = builder
        .check_tool()
        .map_err(|e| {
            log::debug!("{e}");
            anyhow::anyhow!("ffmpeg is not installed or not in PATH")
        })?;
    log::info!("using {version}");

    let job = Job {
        config,
        preset,
        output: output_target(cli.output.as_deref(), directory_mode),
        preview: preview_mode(cli),
    };

    let support = if job.preview == PreviewMode::Off {
        PreviewSupport::Unavailable
    } else {
        let support = PreviewSupport::detect();
        if !support.is_available() {
            println!(
                "{}",
                "Preview support is unavailable in this build; only sprite sheets will be written"
                    .yellow()
            );
        }
        support
    };

    if directory_mode {
        println!(
            "Found {} video files in '{}'",
            inputs.len(),
            cli.input.display()
        );
        let summary = run_directory(&builder, &support, &inputs, &job);
        Ok(if summary.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    } else {
        let output = job.sheet_path_for(&cli.input);
        let report = convert(&builder, &support, &cli.input, &output, &job);
        if let Err(e) = &report.sheet {
            bail!(
                "Failed to build sprite sheet for '{}': {e}",
                cli.input.display()
            );
        }
        print_report(&report);
        Ok(ExitCode::SUCCESS)
    }
}

/// Effective sampling parameters; a preset replaces fps, size and grid
fn resolve_config(cli: &Cli) -> Result<(SamplingConfig, Option<Preset>)> {
    match cli.preset.map(Preset::from) {
        Some(preset) => Ok((preset.config(), Some(preset))),
        None => {
            let config = SamplingConfig::new(cli.fps, cli.size, cli.grid)
                .context("Invalid sampling parameters")?;
            Ok((config, None))
        }
    }
}

/// `--loop` wins over `--preview`
fn preview_mode(cli: &Cli) -> PreviewMode {
    if cli.loop_safe {
        PreviewMode::SourceResolution
    } else if cli.preview {
        PreviewMode::CellSize
    } else {
        PreviewMode::Off
    }
}

fn output_target(output: Option<&Path>, directory_mode: bool) -> OutputTarget {
    match output {
        None => OutputTarget::Beside,
        Some(dir) if directory_mode => OutputTarget::Directory(dir.to_path_buf()),
        Some(path) => OutputTarget::File(path.to_path_buf()),
    }
}

/// Videos to process: the discovered files of a directory, or the single file
/// after its format has been checked
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let videos = discover_videos(input)
            .with_context(|| format!("Failed to read directory '{}'", input.display()))?;
        if videos.is_empty() {
            bail!("No video files found in directory '{}'", input.display());
        }
        Ok(videos)
    } else {
        SheetBuilder::<SystemRunner>::validate_input(input)?;
        Ok(vec![input.to_path_buf()])
    }
}

fn run_directory<R: CommandRunner + Copy>(
    builder: &SheetBuilder<R>,
    support: &PreviewSupport,
    inputs: &[PathBuf],
    job: &Job,
) -> BatchSummary {
    let tracker = ProgressTracker::new(inputs.len() as u64, "Processed");

    let summary = run_batch(inputs, job, |i, input, output| {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("\nProcessing {}/{}: {}", i + 1, inputs.len(), name);

        let report = convert(builder, support, input, output, job);
        print_report(&report);
        println!("{}", tracker.advance().dimmed());
        report
    });

    println!(
        "\n{} {} succeeded, {} failed",
        "Summary:".bold(),
        summary.succeeded.to_string().green(),
        summary.failed.to_string().red()
    );
    summary
}

fn convert<R: CommandRunner + Copy>(
    builder: &SheetBuilder<R>,
    support: &PreviewSupport,
    input: &Path,
    output: &Path,
    job: &Job,
) -> FileReport {
    print!("{}", config_block(input, output, &job.config));
    let pb = spinner("Converting video to sprite sheet...");
    let report = process_file(builder, support, input, output, job);
    pb.finish_and_clear();
    report
}

/// Parameters of one conversion, shown before ffmpeg runs
fn config_block(input: &Path, output: &Path, config: &SamplingConfig) -> String {
    let rows = [
        ("Input", input.display().to_string()),
        ("Output", output.display().to_string()),
        ("FPS", config.frame_rate.to_string()),
        ("Size", config.frame_size.to_string()),
        ("Grid", config.grid.to_string()),
    ];
    rows.iter()
        .map(|(label, value)| format!("  {} {}\n", format!("{label}:").cyan(), value))
        .collect()
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_report(report: &FileReport) {
    let sheet = match &report.sheet {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("{} {}: {}", "✗ Failed:".red().bold(), report.input.display(), e);
            return;
        }
    };

    println!("{}", "✓ Sprite sheet created successfully!".green().bold());
    println!("  File: {}", sheet.path.display());
    println!("  Size: {:.1} KB", sheet.file_size as f64 / 1024.0);
    if let Some((width, height)) = sheet.dimensions {
        println!("  Dimensions: {}x{}", width, height);
    }
    if let Some(coverage) = sheet.coverage.filter(|c| c.is_short()) {
        println!(
            "  {}",
            format!(
                "Note: about {} of {} cells have frames",
                coverage.expected, coverage.needed
            )
            .yellow()
        );
    }

    match &report.preview {
        None => {}
        Some(PreviewOutcome::Written { path, frame_count }) => println!(
            "{} {} ({} frames)",
            "✓ Preview loop created:".green().bold(),
            path.display(),
            frame_count
        ),
        Some(PreviewOutcome::NoUsableFrames) => println!(
            "{}",
            "! No usable frames in the sheet; preview skipped".yellow()
        ),
        Some(PreviewOutcome::Unavailable) => println!(
            "{}",
            "! Preview support unavailable; preview skipped".yellow()
        ),
        Some(PreviewOutcome::Failed(msg)) => {
            eprintln!("{} {}", "✗ Preview failed:".red().bold(), msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("spriter").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["clip.mp4"]);
        let (config, preset) = resolve_config(&cli).unwrap();
        assert_eq!(preset, None);
        assert_eq!(config, SamplingConfig::default());
        assert_eq!(preview_mode(&cli), PreviewMode::Off);
        assert_eq!(cli.log_level, log::LevelFilter::Warn);
    }

    #[test]
    fn test_explicit_parameters() {
        let cli = parse(&["clip.mp4", "-f", "12", "-s", "48x48", "-g", "3X3"]);
        let (config, _) = resolve_config(&cli).unwrap();
        assert_eq!(config.frame_rate, 12.0);
        assert_eq!(config.frame_size, FrameSize::new(48, 48).unwrap());
        assert_eq!(config.grid, Grid::new(3, 3).unwrap());
    }

    #[test]
    fn test_preset_overrides_flags() {
        let cli = parse(&["clip.mp4", "--fps", "30", "--size", "8x8", "--preset", "web"]);
        let (config, preset) = resolve_config(&cli).unwrap();
        assert_eq!(preset, Some(Preset::Web));
        assert_eq!(config.frame_rate, 8.0);
        assert_eq!(config.frame_size, FrameSize::new(32, 32).unwrap());
        assert_eq!(config.grid, Grid::new(4, 4).unwrap());
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            vec!["spriter", "clip.mp4", "--fps", "0"],
            vec!["spriter", "clip.mp4", "--fps", "fast"],
            vec!["spriter", "clip.mp4", "--size", "64"],
            vec!["spriter", "clip.mp4", "--grid", "0x4"],
            vec!["spriter", "clip.mp4", "--preset", "ultra"],
            vec!["spriter"],
        ];
        for args in bad {
            assert!(Cli::try_parse_from(args.iter().copied()).is_err(), "accepted {args:?}");
        }
    }

    #[test]
    fn test_preview_modes() {
        assert_eq!(preview_mode(&parse(&["a.mp4", "--preview"])), PreviewMode::CellSize);
        assert_eq!(
            preview_mode(&parse(&["a.mp4", "--loop"])),
            PreviewMode::SourceResolution
        );
        assert_eq!(
            preview_mode(&parse(&["a.mp4", "--loop", "--preview"])),
            PreviewMode::SourceResolution
        );
    }

    #[test]
    fn test_output_target() {
        assert_eq!(output_target(None, false), OutputTarget::Beside);
        assert_eq!(output_target(None, true), OutputTarget::Beside);
        assert_eq!(
            output_target(Some(Path::new("out.png")), false),
            OutputTarget::File("out.png".into())
        );
        assert_eq!(
            output_target(Some(Path::new("sheets")), true),
            OutputTarget::Directory("sheets".into())
        );
    }

    #[test]
    fn test_config_block_lists_parameters() {
        let cli = parse(&["videos/clip.mp4", "-f", "12", "-s", "48x48", "-g", "3x3"]);
        let (config, preset) = resolve_config(&cli).unwrap();
        let job = Job {
            config,
            preset,
            output: output_target(None, false),
            preview: PreviewMode::Off,
        };
        let output = job.sheet_path_for(&cli.input);

        let block = config_block(&cli.input, &output, &config);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Input") && lines[0].ends_with("videos/clip.mp4"));
        assert!(lines[1].contains("Output"));
        assert!(lines[1].ends_with("clip_spritesheet_12fps_48x48_3x3.png"));
        assert!(lines[2].contains("FPS") && lines[2].ends_with(" 12"));
        assert!(lines[3].contains("Size") && lines[3].ends_with(" 48x48"));
        assert!(lines[4].contains("Grid") && lines[4].ends_with(" 3x3"));
    }

    #[test]
    fn test_collect_inputs_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mp4", "b.MOV", "c.mpg", "d.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let inputs = collect_inputs(dir.path()).unwrap();
        assert_eq!(inputs.len(), 3);
        assert!(inputs.iter().all(|p| !p.ends_with("d.txt")));
    }

    #[test]
    fn test_collect_inputs_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        let err = collect_inputs(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No video files found in directory"));
    }

    #[test]
    fn test_collect_inputs_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"x").unwrap();
        let err = collect_inputs(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format '.txt'"));
    }
}

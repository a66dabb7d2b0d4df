//! Output file naming

use crate::{Preset, SamplingConfig};
use std::path::{Path, PathBuf};

/// Extension of sprite sheet images
pub const SHEET_EXTENSION: &str = "png";

/// Extension of preview animations
pub const PREVIEW_EXTENSION: &str = "gif";

/// Encodes the active parameters for use in a file name.
///
/// A preset is identified by its name; explicit parameters become
/// `<fps>fps_<size>_<grid>`.
pub fn params_label(preset: Option<Preset>, config: &SamplingConfig) -> String {
    match preset {
        Some(preset) => preset.name().to_string(),
        None => format!(
            "{}fps_{}_{}",
            config.frame_rate, config.frame_size, config.grid
        ),
    }
}

/// Derives the sheet path for `input`.
///
/// The file is placed in `out_dir` when given, otherwise next to the input.
pub fn sheet_path(input: &Path, out_dir: Option<&Path>, label: &str) -> PathBuf {
    derive_sheet_path(input, out_dir, label, false)
}

/// Derives sheet paths for a batch of inputs.
///
/// Inputs that would share a sheet name (`clip.mov` and `clip.mp4` in one
/// output directory) get their extension folded into the stem instead, so no
/// sheet overwrites another.
pub fn sheet_paths(inputs: &[PathBuf], out_dir: Option<&Path>, label: &str) -> Vec<PathBuf> {
    let plain: Vec<PathBuf> = inputs
        .iter()
        .map(|input| sheet_path(input, out_dir, label))
        .collect();

    inputs
        .iter()
        .zip(&plain)
        .map(|(input, path)| {
            if plain.iter().filter(|p| *p == path).count() < 2 {
                return path.clone();
            }
            let qualified = derive_sheet_path(input, out_dir, label, true);
            log::warn!(
                "{} shares its sheet name with another input; writing {} instead",
                input.display(),
                qualified.display()
            );
            qualified
        })
        .collect()
}

fn derive_sheet_path(input: &Path, out_dir: Option<&Path>, label: &str, with_ext: bool) -> PathBuf {
    let mut stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    if with_ext {
        if let Some(ext) = input.extension() {
            stem = format!("{stem}_{}", ext.to_string_lossy());
        }
    }

    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    dir.join(format!("{stem}_spritesheet_{label}.{SHEET_EXTENSION}"))
}

/// Preview animation path matching a sheet path.
///
/// Never equal to `sheet`: a sheet that is itself a GIF gets a `_preview`
/// suffix.
pub fn preview_path(sheet: &Path) -> PathBuf {
    let is_gif = sheet
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PREVIEW_EXTENSION));
    if !is_gif {
        return sheet.with_extension(PREVIEW_EXTENSION);
    }

    let stem = sheet
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    sheet.with_file_name(format!("{stem}_preview.{PREVIEW_EXTENSION}"))
}

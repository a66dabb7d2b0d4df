//! Input video discovery

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Video extensions accepted as input, in discovery order
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["mov", "mp4", "mpg"];

/// Returns the lowercase extension of `path` if it is a supported video
pub fn video_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Returns true if `path` has a supported video extension (case-insensitive)
pub fn is_supported_video(path: &Path) -> bool {
    video_extension(path).is_some()
}

/// Lists the supported videos directly inside `dir`.
///
/// Extensions are visited in [`SUPPORTED_EXTENSIONS`] order. Within an
/// extension, lowercase matches come first, then uppercase matches, then any
/// other casing; each group keeps directory-listing order.
pub fn discover_videos(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }

    let raw_ext = |p: &Path| p.extension().and_then(|e| e.to_str()).map(str::to_owned);

    let mut found = Vec::new();
    for ext in SUPPORTED_EXTENSIONS {
        let upper = ext.to_ascii_uppercase();
        let mut lower_group = Vec::new();
        let mut upper_group = Vec::new();
        let mut mixed_group = Vec::new();

        for file in &files {
            let Some(file_ext) = raw_ext(file) else {
                continue;
            };
            if file_ext == ext {
                lower_group.push(file.clone());
            } else if file_ext == upper {
                upper_group.push(file.clone());
            } else if file_ext.eq_ignore_ascii_case(ext) {
                mixed_group.push(file.clone());
            }
        }

        found.extend(lower_group);
        found.extend(upper_group);
        found.extend(mixed_group);
    }

    log::debug!("discovered {} video(s) in {}", found.len(), dir.display());
    Ok(found)
}

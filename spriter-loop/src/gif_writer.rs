//! Animated GIF encoding

use crate::{Error, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encodes `frames` as an endlessly repeating GIF written to `path`.
///
/// Every frame is shown for `delay_ms` milliseconds.
pub fn write_gif(path: &Path, frames: &[RgbaImage], delay_ms: u32) -> Result<()> {
    log::debug!(
        "encoding {} frame(s) to {} ({} ms per frame)",
        frames.len(),
        path.display(),
        delay_ms
    );

    let file = File::create(path)
        .map_err(|e| Error::ImageEncode(format!("failed to create {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    encode_gif(&mut writer, frames, delay_ms)?;
    writer
        .flush()
        .map_err(|e| Error::ImageEncode(format!("failed to write {}: {e}", path.display())))?;
    Ok(())
}

/// Encodes `frames` as an endlessly repeating GIF into `writer`
pub fn encode_gif<W: Write>(writer: W, frames: &[RgbaImage], delay_ms: u32) -> Result<()> {
    let mut encoder = GifEncoder::new(writer);
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| Error::ImageEncode(format!("failed to set GIF repeat: {e}")))?;

    let delay = Delay::from_numer_denom_ms(delay_ms, 1);
    for image in frames {
        encoder
            .encode_frame(Frame::from_parts(image.clone(), 0, 0, delay))
            .map_err(|e| Error::ImageEncode(format!("failed to write GIF frame: {e}")))?;
    }

    Ok(())
}

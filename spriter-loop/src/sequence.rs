//! Loop sequence assembly

use crate::frame_slicer::Frame;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use spriter_core::FrameSize;

/// Frames of a preview loop, in playback order.
///
/// When more than one frame is retained, the first frame is repeated at the
/// end so that cyclic playback closes on the frame it started from.
#[derive(Debug, Clone, Default)]
pub struct LoopSequence {
    frames: Vec<RgbaImage>,
    retained: usize,
}

impl LoopSequence {
    /// Builds a sequence from retained frames, resizing them to `target` if given
    pub fn new(retained: Vec<Frame>, target: Option<FrameSize>) -> Self {
        let mut frames: Vec<RgbaImage> = retained
            .into_iter()
            .map(|frame| match target {
                Some(size) => imageops::resize(
                    &frame.image,
                    size.width,
                    size.height,
                    FilterType::Lanczos3,
                ),
                None => frame.image,
            })
            .collect();

        let retained = frames.len();
        if retained > 1 {
            let first = frames[0].clone();
            frames.push(first);
        }

        Self { frames, retained }
    }

    /// Number of frames retained from the sheet, excluding the closing copy
    pub fn retained(&self) -> usize {
        self.retained
    }

    /// Number of frames in playback order
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frame survived filtering
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames in playback order
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frames(n: u8) -> Vec<Frame> {
        (0..n)
            .map(|i| Frame {
                image: RgbaImage::from_pixel(4, 4, Rgba([i * 20 + 20, 50, 90, 255])),
                row: 0,
                col: i as u32,
            })
            .collect()
    }

    #[test]
    fn test_closing_frame_appended() {
        for n in 2..6u8 {
            let seq = LoopSequence::new(frames(n), None);
            assert_eq!(seq.retained(), n as usize);
            assert_eq!(seq.len(), n as usize + 1);
            assert_eq!(seq.frames()[n as usize], seq.frames()[0]);
        }
    }

    #[test]
    fn test_single_and_empty() {
        let seq = LoopSequence::new(frames(1), None);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.retained(), 1);

        let seq = LoopSequence::new(Vec::new(), None);
        assert!(seq.is_empty());
        assert_eq!(seq.retained(), 0);
    }

    #[test]
    fn test_resize_to_target() {
        let target = FrameSize::new(16, 9).unwrap();
        let seq = LoopSequence::new(frames(3), Some(target));
        assert_eq!(seq.len(), 4);
        assert!(seq.frames().iter().all(|f| f.dimensions() == (16, 9)));
        assert_eq!(seq.frames()[3], seq.frames()[0]);
    }

    #[test]
    fn test_order_preserved() {
        let seq = LoopSequence::new(frames(3), None);
        let reds: Vec<u8> = seq.frames().iter().map(|f| f.get_pixel(0, 0)[0]).collect();
        assert_eq!(reds, vec![20, 40, 60, 20]);
    }
}

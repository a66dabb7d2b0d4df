//! Blank frame detection
//!
//! Sampling can produce all-black cells: trailing grid cells past the end of
//! the video, or fade-through-black transitions. Such frames make a preview
//! flash, so they are dropped before the loop is built.
//!
//! Only a handful of representative pixels are inspected: the center, the
//! four corners (inset by a margin) and the two quarter-diagonal points.

use image::RgbaImage;

/// Heuristic limits for the blank-frame classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlankThresholds {
    /// A frame is blank if at least this fraction of samples is pure black
    pub black_ratio: f64,
    /// A frame is blank if mean sample brightness (0-255) is below this
    pub min_brightness: f64,
    /// Inset of the corner samples from the frame edges, in pixels
    pub margin: u32,
}

impl Default for BlankThresholds {
    fn default() -> Self {
        Self {
            black_ratio: 0.6,
            min_brightness: 10.0,
            margin: 5,
        }
    }
}

/// Measurements behind a blank/non-blank verdict
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Fraction of samples with R = G = B = 0
    pub black_ratio: f64,
    /// Mean of (R + G + B) / 3 over the samples
    pub brightness: f64,
    /// Final verdict
    pub blank: bool,
}

impl BlankThresholds {
    /// Measures `frame` and decides whether it is blank
    pub fn classify(&self, frame: &RgbaImage) -> Classification {
        let points = sample_points(frame.width(), frame.height(), self.margin);
        if points.is_empty() {
            return Classification {
                black_ratio: 1.0,
                brightness: 0.0,
                blank: true,
            };
        }

        let mut black = 0usize;
        let mut brightness_sum = 0.0;
        for &(x, y) in &points {
            let [r, g, b, _] = frame.get_pixel(x, y).0;
            if r == 0 && g == 0 && b == 0 {
                black += 1;
            }
            brightness_sum += (r as f64 + g as f64 + b as f64) / 3.0;
        }

        let black_ratio = black as f64 / points.len() as f64;
        let brightness = brightness_sum / points.len() as f64;

        Classification {
            black_ratio,
            brightness,
            blank: black_ratio >= self.black_ratio || brightness < self.min_brightness,
        }
    }

    /// Returns true if `frame` is visually empty
    pub fn is_blank(&self, frame: &RgbaImage) -> bool {
        self.classify(frame).blank
    }
}

/// Pixel coordinates inspected by the classifier, all inside the frame
pub fn sample_points(width: u32, height: u32, margin: u32) -> Vec<(u32, u32)> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let max_x = width - 1;
    let max_y = height - 1;
    let near_x = margin.min(max_x);
    let near_y = margin.min(max_y);
    let far_x = max_x.saturating_sub(margin).max(near_x);
    let far_y = max_y.saturating_sub(margin).max(near_y);

    vec![
        (width / 2, height / 2),
        (near_x, near_y),
        (far_x, near_y),
        (near_x, far_y),
        (far_x, far_y),
        (width / 4, height / 4),
        ((width * 3 / 4).min(max_x), (height * 3 / 4).min(max_y)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn test_sample_points_inside_frame() {
        for (w, h) in [(64, 64), (32, 16), (3, 3), (1, 1), (11, 2)] {
            let points = sample_points(w, h, 5);
            assert_eq!(points.len(), 7);
            assert!(points.iter().all(|&(x, y)| x < w && y < h), "{w}x{h}");
        }
        assert!(sample_points(0, 10, 5).is_empty());
    }

    #[test]
    fn test_sample_points_layout() {
        let points = sample_points(64, 64, 5);
        assert_eq!(
            points,
            vec![(32, 32), (5, 5), (58, 5), (5, 58), (58, 58), (16, 16), (48, 48)]
        );
    }

    #[test]
    fn test_black_frame_is_blank() {
        let thresholds = BlankThresholds::default();
        let frame = solid(64, 64, [0, 0, 0]);
        let c = thresholds.classify(&frame);
        assert_eq!(c.black_ratio, 1.0);
        assert_eq!(c.brightness, 0.0);
        assert!(c.blank);
    }

    #[test]
    fn test_near_black_frame_is_blank() {
        // no pure-black pixels, but too dark
        let frame = solid(64, 64, [6, 8, 9]);
        let c = BlankThresholds::default().classify(&frame);
        assert_eq!(c.black_ratio, 0.0);
        assert!(c.brightness < 10.0);
        assert!(c.blank);
    }

    #[test]
    fn test_bright_frame_is_kept() {
        let frame = solid(64, 64, [120, 80, 200]);
        assert!(!BlankThresholds::default().is_blank(&frame));
    }

    #[test]
    fn test_black_ratio_threshold() {
        let thresholds = BlankThresholds {
            min_brightness: 0.0,
            ..BlankThresholds::default()
        };
        let points = sample_points(64, 64, thresholds.margin);

        // 4 of 7 black samples = 0.57, below the 0.6 ratio
        let mut frame = solid(64, 64, [255, 255, 255]);
        for &(x, y) in &points[..4] {
            frame.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
        assert!(!thresholds.is_blank(&frame));

        // 5 of 7 = 0.71
        let (x, y) = points[4];
        frame.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        assert!(thresholds.is_blank(&frame));
    }

    #[test]
    fn test_only_samples_matter() {
        // a black frame with a bright dot away from every sample point
        let mut frame = solid(64, 64, [0, 0, 0]);
        frame.put_pixel(40, 20, Rgba([255, 255, 255, 255]));
        assert!(BlankThresholds::default().is_blank(&frame));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let thresholds = BlankThresholds::default();
        let frames = [
            solid(16, 16, [0, 0, 0]),
            solid(16, 16, [9, 9, 9]),
            solid(16, 16, [10, 10, 10]),
            RgbaImage::from_fn(16, 16, |x, y| Rgba([(x * 16) as u8, (y * 16) as u8, 0, 255])),
        ];
        for frame in &frames {
            let first = thresholds.classify(frame);
            let second = thresholds.classify(frame);
            assert_eq!(first, second);
            assert_eq!(thresholds.is_blank(frame), first.blank);
        }
    }

    #[test]
    fn test_brightness_boundary() {
        let thresholds = BlankThresholds::default();
        assert!(thresholds.is_blank(&solid(8, 8, [9, 10, 10])));
        assert!(!thresholds.is_blank(&solid(8, 8, [10, 10, 10])));
    }
}

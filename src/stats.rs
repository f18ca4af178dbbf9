//! Before/after statistics for reporting
//!
//! Computed on the BT.601 luma of the image. Nothing here feeds back into
//! the pipeline.

use std::fmt;

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::stats::histogram;

use crate::bgr::BgrImage;
use crate::constants::luma::{B_WEIGHT, G_WEIGHT, R_WEIGHT, SHIFT};

/// Summary of an image's luma distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageStatistics {
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: u8,
    pub max: u8,
    /// `std_dev / mean`, or 0 when the mean is 0
    pub contrast: f64,
}

/// BT.601 luma in 14-bit fixed point, rounded
pub fn to_gray(image: &BgrImage) -> GrayImage {
    let round = 1u32 << (SHIFT - 1);
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let [b, g, r] = image.get_pixel(x, y);
        let luma = (b as u32 * B_WEIGHT + g as u32 * G_WEIGHT + r as u32 * R_WEIGHT + round) >> SHIFT;
        Luma([luma as u8])
    })
}

/// Mean, spread and contrast of the image's luma
pub fn image_statistics(image: &BgrImage) -> ImageStatistics {
    let gray = to_gray(image);
    let bins = histogram(&gray).channels[0];
    let count = gray.as_raw().len() as f64;

    let mean = bins
        .iter()
        .enumerate()
        .map(|(level, &n)| level as f64 * n as f64)
        .sum::<f64>()
        / count;
    let variance = bins
        .iter()
        .enumerate()
        .map(|(level, &n)| (level as f64 - mean).powi(2) * n as f64)
        .sum::<f64>()
        / count;
    let std_dev = variance.sqrt();

    let min = bins.iter().position(|&n| n > 0).unwrap_or(0) as u8;
    let max = bins.iter().rposition(|&n| n > 0).unwrap_or(0) as u8;
    let contrast = if mean > 0.0 { std_dev / mean } else { 0.0 };

    ImageStatistics {
        mean,
        std_dev,
        min,
        max,
        contrast,
    }
}

impl fmt::Display for ImageStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Mean: {:.2}", self.mean)?;
        writeln!(f, "  Std: {:.2}", self.std_dev)?;
        writeln!(f, "  Min: {}, Max: {}", self.min, self.max)?;
        write!(f, "  Contrast: {:.3}", self.contrast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_image_has_zero_spread() {
        let stats = image_statistics(&BgrImage::from_pixel(10, 10, [100, 100, 100]).unwrap());
        assert_eq!(stats.mean, 100.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!((stats.min, stats.max), (100, 100));
        assert_eq!(stats.contrast, 0.0);
    }

    #[test]
    fn test_black_image_reports_zero_contrast() {
        let stats = image_statistics(&BgrImage::from_pixel(3, 3, [0, 0, 0]).unwrap());
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.contrast, 0.0);
    }

    #[test]
    fn test_two_level_image() {
        let image = BgrImage::from_fn(2, 1, |x, _| if x == 0 { [50; 3] } else { [150; 3] }).unwrap();
        let stats = image_statistics(&image);
        assert_eq!(stats.mean, 100.0);
        assert_eq!(stats.std_dev, 50.0);
        assert_eq!(stats.contrast, 0.5);
        assert_eq!((stats.min, stats.max), (50, 150));
    }

    #[test]
    fn test_luma_weights() {
        let gray = to_gray(&BgrImage::from_fn(3, 1, |x, _| match x {
            0 => [255, 0, 0],
            1 => [0, 255, 0],
            _ => [0, 0, 255],
        })
        .unwrap());
        assert_eq!(gray.get_pixel(0, 0).0, [29]);
        assert_eq!(gray.get_pixel(1, 0).0, [150]);
        assert_eq!(gray.get_pixel(2, 0).0, [76]);
    }

    #[test]
    fn test_display_format() {
        let stats = image_statistics(&BgrImage::from_pixel(1, 1, [100, 100, 100]).unwrap());
        let text = stats.to_string();
        assert!(text.contains("Mean: 100.00"));
        assert!(text.contains("Contrast: 0.000"));
    }
}

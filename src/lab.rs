//! 8-bit CIE L*a*b* planes
//!
//! Conversion goes through `palette` (sRGB transfer curve, D65 white point).
//! The float result is quantized to three 8-bit planes:
//!
//! ```text
//! L8 = round(L* * 255 / 100)
//! A8 = round(a* + 128)
//! B8 = round(b* + 128)
//! ```
//!
//! each clamped to [0, 255]. Decoding inverts the scaling and clamps back
//! into the sRGB gamut, so a round trip is exact up to quantization.

use image::{GrayImage, ImageBuffer, Luma};
use palette::{FromColor, Lab, Srgb};

use crate::bgr::BgrImage;
use crate::constants::lab::{AB_OFFSET, L_SCALE};
use crate::error::{EnhanceError, Result};

/// Luminance plane and two chrominance planes of equal size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabImage {
    pub l: GrayImage,
    pub a: GrayImage,
    pub b: GrayImage,
}

fn quantize(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Encode one BGR pixel as 8-bit `[L, a, b]`
pub fn bgr_to_lab_pixel([b, g, r]: [u8; 3]) -> [u8; 3] {
    let srgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let lab: Lab = Lab::from_color(srgb);
    [
        quantize(lab.l * L_SCALE),
        quantize(lab.a + AB_OFFSET),
        quantize(lab.b + AB_OFFSET),
    ]
}

/// Decode one 8-bit `[L, a, b]` triple to BGR
pub fn lab_to_bgr_pixel([l, a, b]: [u8; 3]) -> [u8; 3] {
    let lab = Lab::new(
        l as f32 / L_SCALE,
        a as f32 - AB_OFFSET,
        b as f32 - AB_OFFSET,
    );
    let srgb: Srgb = Srgb::from_color(lab);
    [
        quantize(srgb.blue.clamp(0.0, 1.0) * 255.0),
        quantize(srgb.green.clamp(0.0, 1.0) * 255.0),
        quantize(srgb.red.clamp(0.0, 1.0) * 255.0),
    ]
}

impl LabImage {
    /// Split a BGR image into L, a, b planes
    pub fn from_bgr(image: &BgrImage) -> LabImage {
        let (width, height) = image.dimensions();
        let mut l = GrayImage::new(width, height);
        let mut a = GrayImage::new(width, height);
        let mut b = GrayImage::new(width, height);

        for (x, y, pixel) in image.buffer().enumerate_pixels() {
            let [pl, pa, pb] = bgr_to_lab_pixel(pixel.0);
            l.put_pixel(x, y, Luma([pl]));
            a.put_pixel(x, y, Luma([pa]));
            b.put_pixel(x, y, Luma([pb]));
        }

        LabImage { l, a, b }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.l.dimensions()
    }

    /// Same chrominance with a replacement luminance plane
    pub fn with_luminance(&self, l: GrayImage) -> Result<LabImage> {
        if l.dimensions() != self.dimensions() {
            return Err(EnhanceError::invalid_image(format!(
                "luminance plane is {:?}, chrominance is {:?}",
                l.dimensions(),
                self.dimensions()
            )));
        }
        Ok(LabImage {
            l,
            a: self.a.clone(),
            b: self.b.clone(),
        })
    }

    /// Merge the planes and convert back to BGR
    pub fn to_bgr(&self) -> Result<BgrImage> {
        let (width, height) = self.dimensions();
        if self.a.dimensions() != (width, height) || self.b.dimensions() != (width, height) {
            return Err(EnhanceError::invalid_image("Lab planes differ in size"));
        }

        let merged: ImageBuffer<image::Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(width, height, |x, y| {
                image::Rgb(lab_to_bgr_pixel([
                    self.l.get_pixel(x, y).0[0],
                    self.a.get_pixel(x, y).0[0],
                    self.b.get_pixel(x, y).0[0],
                ]))
            });
        BgrImage::from_raw(width, height, BgrImage::CHANNELS, merged.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_channel_error(a: &BgrImage, b: &BgrImage) -> u8 {
        a.pixels()
            .zip(b.pixels())
            .flat_map(|(p, q)| (0..3).map(move |i| p[i].abs_diff(q[i])))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_neutral_grays_have_centered_chroma() {
        for v in [0u8, 50, 100, 200, 255] {
            let [_, a, b] = bgr_to_lab_pixel([v, v, v]);
            assert_eq!((a, b), (128, 128), "gray {}", v);
        }
        assert_eq!(bgr_to_lab_pixel([0, 0, 0])[0], 0);
        assert_eq!(bgr_to_lab_pixel([255, 255, 255])[0], 255);
        assert_eq!(bgr_to_lab_pixel([100, 100, 100])[0], 108);
    }

    #[test]
    fn test_mid_gray_round_trips_exactly() {
        let image = BgrImage::from_pixel(10, 10, [100, 100, 100]).unwrap();
        assert_eq!(LabImage::from_bgr(&image).to_bgr().unwrap(), image);
    }

    #[test]
    fn test_gray_ramp_round_trip_within_one() {
        let ramp = BgrImage::from_fn(256, 1, |x, _| [x as u8; 3]).unwrap();
        let back = LabImage::from_bgr(&ramp).to_bgr().unwrap();
        assert!(max_channel_error(&ramp, &back) <= 1);
    }

    /// Every color of the BGR cube sampled at `step`, one per pixel
    fn sampled_cube(step: usize) -> Vec<[u8; 3]> {
        let levels: Vec<u8> = (0..=255).step_by(step).collect();
        let mut colors = Vec::new();
        for &b in &levels {
            for &g in &levels {
                for &r in &levels {
                    colors.push([b, g, r]);
                }
            }
        }
        colors
    }

    fn round_trip_errors(colors: &[[u8; 3]]) -> Vec<u8> {
        let image = BgrImage::from_fn(colors.len() as u32, 1, |x, _| colors[x as usize]).unwrap();
        let back = LabImage::from_bgr(&image).to_bgr().unwrap();
        image
            .pixels()
            .zip(back.pixels())
            .map(|(p, q)| (0..3).map(|i| p[i].abs_diff(q[i])).max().unwrap_or(0))
            .collect()
    }

    #[test]
    fn test_low_chroma_round_trip_within_two() {
        // channel spread <= 60 keeps a*/b* quantization error below 2.5 levels
        let colors: Vec<[u8; 3]> = sampled_cube(15)
            .into_iter()
            .filter(|c| c.iter().max().unwrap() - c.iter().min().unwrap() <= 60)
            .collect();
        assert_eq!(colors.len(), 918);

        for (color, err) in colors.iter().zip(round_trip_errors(&colors)) {
            assert!(err <= 2, "{:?} came back off by {}", color, err);
        }
    }

    #[test]
    fn test_saturated_round_trip_error_is_bounded() {
        // saturated colors with a channel near 0 sit where the inverse
        // transfer curve is steep; integer a*/b* then costs up to 18 levels
        let colors = sampled_cube(15);
        let errors = round_trip_errors(&colors);

        let worst = errors.iter().copied().max().unwrap();
        assert!(worst <= 18, "worst round-trip error {}", worst);
        assert!(worst > 2);

        let over_two = errors.iter().filter(|&&e| e > 2).count();
        assert!(over_two * 5 < colors.len(), "{} of {} colors over 2", over_two, colors.len());
    }

    #[test]
    fn test_blue_cast_shows_in_b_plane() {
        let [_, a, b] = bgr_to_lab_pixel([200, 120, 30]);
        assert!(b < 128, "blue-dominant pixel should have b* < 0, got {}", b);
        assert!(a < 140);
    }

    #[test]
    fn test_with_luminance_rejects_size_mismatch() {
        let lab = LabImage::from_bgr(&BgrImage::from_pixel(4, 4, [1, 2, 3]).unwrap());
        assert!(lab.with_luminance(GrayImage::new(3, 4)).is_err());
    }
}

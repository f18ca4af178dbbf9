//! Side-by-side before/after layout

use image::{imageops, ImageBuffer, Rgb};

use crate::bgr::BgrImage;
use crate::error::Result;

/// Place `original` on the left and `enhanced` on the right
///
/// The canvas is as tall as the taller input; uncovered area stays black.
pub fn side_by_side(original: &BgrImage, enhanced: &BgrImage) -> Result<BgrImage> {
    let (left_width, left_height) = original.dimensions();
    let (right_width, right_height) = enhanced.dimensions();

    let mut canvas: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::new(left_width + right_width, left_height.max(right_height));
    imageops::replace(&mut canvas, original.buffer(), 0, 0);
    imageops::replace(&mut canvas, enhanced.buffer(), left_width as i64, 0);

    let (width, height) = canvas.dimensions();
    BgrImage::from_raw(width, height, BgrImage::CHANNELS, canvas.into_raw())
}

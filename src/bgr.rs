//! Three-channel 8-bit image in blue, green, red order
//!
//! `BgrImage` is the value passed between pipeline stages. Its constructors
//! enforce the invariants every stage relies on: non-zero width and height
//! and exactly three 8-bit channels.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

use crate::error::{EnhanceError, Result};

/// Slot of a channel inside a [`BgrImage`] pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BgrChannel {
    Blue = 0,
    Green = 1,
    Red = 2,
}

impl BgrChannel {
    pub const ALL: [BgrChannel; 3] = [BgrChannel::Blue, BgrChannel::Green, BgrChannel::Red];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Raster image with pixels stored as `[b, g, r]`
///
/// The backing buffer reuses `image`'s three-subpixel pixel type; only the
/// slot order differs from an `RgbImage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgrImage {
    buffer: ImageBuffer<Rgb<u8>, Vec<u8>>,
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(EnhanceError::invalid_image(format!(
            "image has zero area ({}x{})",
            width, height
        )));
    }
    Ok(())
}

impl BgrImage {
    pub const CHANNELS: usize = 3;

    /// Image where every pixel has the value `bgr`
    pub fn from_pixel(width: u32, height: u32, bgr: [u8; 3]) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            buffer: ImageBuffer::from_pixel(width, height, Rgb(bgr)),
        })
    }

    /// Image whose pixel at `(x, y)` is `f(x, y)`
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> [u8; 3],
    {
        check_dimensions(width, height)?;
        Ok(Self {
            buffer: ImageBuffer::from_fn(width, height, |x, y| Rgb(f(x, y))),
        })
    }

    /// Wrap interleaved row-major BGR bytes
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::InvalidImage`] if a dimension is zero, if
    /// `channels` is not 3, or if `data` does not hold exactly
    /// `width * height * 3` bytes.
    pub fn from_raw(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        if channels != Self::CHANNELS {
            return Err(EnhanceError::invalid_image(format!(
                "expected 3 channels, got {}",
                channels
            )));
        }
        let expected = width as usize * height as usize * Self::CHANNELS;
        if data.len() != expected {
            return Err(EnhanceError::invalid_image(format!(
                "buffer holds {} bytes, {}x{}x3 needs {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        ImageBuffer::from_raw(width, height, data)
            .map(|buffer| Self { buffer })
            .ok_or_else(|| EnhanceError::invalid_image("buffer does not match dimensions"))
    }

    /// Reorder an RGB image into BGR slots
    pub fn from_rgb(rgb: &RgbImage) -> Result<Self> {
        let (width, height) = rgb.dimensions();
        Self::from_fn(width, height, |x, y| {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            [b, g, r]
        })
    }

    /// Reduce a decoded image of any color type to 8-bit BGR
    ///
    /// Alpha is dropped and single-channel images are replicated across the
    /// three slots.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        Self::from_rgb(&image.to_rgb8())
    }

    /// Reorder into an RGB image for encoding
    pub fn to_rgb(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width(), self.height(), |x, y| {
            let [b, g, r] = self.get_pixel(x, y);
            Rgb([r, g, b])
        })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Pixel at `(x, y)` as `[b, g, r]`
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Interleaved row-major BGR bytes
    pub fn as_raw(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.buffer.pixels().map(|p| p.0)
    }

    /// New image with `f` applied to every pixel
    pub fn map_pixels<F>(&self, mut f: F) -> BgrImage
    where
        F: FnMut([u8; 3]) -> [u8; 3],
    {
        let mut buffer = self.buffer.clone();
        for pixel in buffer.pixels_mut() {
            pixel.0 = f(pixel.0);
        }
        BgrImage { buffer }
    }

    /// Copy one channel out as a single-plane image
    pub fn channel(&self, channel: BgrChannel) -> GrayImage {
        let index = channel.index();
        ImageBuffer::from_fn(self.width(), self.height(), |x, y| {
            Luma([self.buffer.get_pixel(x, y).0[index]])
        })
    }

    pub(crate) fn buffer(&self) -> &ImageBuffer<Rgb<u8>, Vec<u8>> {
        &self.buffer
    }
}

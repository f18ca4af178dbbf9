//! Gray-world white balance
//!
//! Underwater light loses red first and green second, leaving a blue-green
//! cast. The gray-world heuristic assumes the scene averages to neutral gray
//! and scales each channel so that its mean moves toward the mean of all
//! three channel means. Gains are capped so a nearly empty channel is not
//! blown up into noise.

use log::debug;

use crate::bgr::{BgrChannel, BgrImage};
use crate::config::WhiteBalanceConfig;
use crate::error::Result;

/// Per-channel multiplicative correction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelGains {
    pub blue: f32,
    pub green: f32,
    pub red: f32,
}

impl ChannelGains {
    pub const IDENTITY: ChannelGains = ChannelGains {
        blue: 1.0,
        green: 1.0,
        red: 1.0,
    };

    /// Gains in BGR slot order
    pub fn as_array(&self) -> [f32; 3] {
        [self.blue, self.green, self.red]
    }
}

/// Arithmetic mean of each channel, in BGR slot order
pub fn channel_means(image: &BgrImage) -> [f64; 3] {
    let count = image.pixel_count() as f64;
    BgrChannel::ALL.map(|channel| {
        let plane = image.channel(channel);
        let sum: u64 = plane.as_raw().iter().map(|&v| v as u64).sum();
        sum as f64 / count
    })
}

/// Gray-world gains, each `min(gray / mean, max_gain)`
///
/// A channel with zero mean gets the identity gain, so every returned gain
/// lies in `(0, max_gain]`.
pub fn gray_world_gains(image: &BgrImage, max_gain: f32) -> ChannelGains {
    let means = channel_means(image);
    let gray = means.iter().sum::<f64>() / 3.0;

    let gain = |mean: f64| -> f32 {
        if mean > 0.0 {
            (gray / mean).min(max_gain as f64) as f32
        } else {
            1.0
        }
    };

    let gains = ChannelGains {
        blue: gain(means[0]),
        green: gain(means[1]),
        red: gain(means[2]),
    };
    debug!(
        "gray-world means b={:.2} g={:.2} r={:.2} target={:.2} -> gains {:?}",
        means[0], means[1], means[2], gray, gains
    );
    gains
}

/// Scale every pixel by its channel gain, clip to [0, 255] and truncate
pub fn apply_gains(image: &BgrImage, gains: &ChannelGains) -> BgrImage {
    let gains = gains.as_array();
    image.map_pixels(|pixel| {
        let mut out = [0u8; 3];
        for ((dst, value), gain) in out.iter_mut().zip(pixel).zip(gains) {
            *dst = (value as f32 * gain).clamp(0.0, 255.0) as u8;
        }
        out
    })
}

/// Lift red where green is present
///
/// On [0, 1]-normalized values, `r' = r + (g - r) * (1 - r) * g`. Pixels
/// with little green keep their red, so open water is not turned pink.
pub fn compensate_red_channel(image: &BgrImage) -> BgrImage {
    image.map_pixels(|[b, g, r]| {
        let rf = r as f32 / 255.0;
        let gf = g as f32 / 255.0;
        let compensated = rf + (gf - rf) * (1.0 - rf) * gf;
        [b, g, (compensated * 255.0).clamp(0.0, 255.0) as u8]
    })
}

/// Color Balancer stage
pub fn balance_colors(image: &BgrImage, config: &WhiteBalanceConfig) -> Result<BgrImage> {
    config.validate()?;

    let compensated;
    let source = if config.compensate_red {
        compensated = compensate_red_channel(image);
        &compensated
    } else {
        image
    };

    let gains = gray_world_gains(source, config.max_gain);
    Ok(apply_gains(source, &gains))
}

//! # Underwater Enhance
//!
//! Fixed, deterministic enhancement of underwater photographs ahead of
//! detection and segmentation models:
//!
//! 1. Gray-world white balance removes the blue-green cast, with each
//!    channel gain capped at 4.0.
//! 2. CLAHE (clip limit 2.0, 8x8 tiles) on the L* plane of L*a*b* boosts
//!    local contrast while the a*/b* chrominance planes pass through.
//!
//! Every stage takes an image by reference and returns a new one.
//!
//! ```rust,no_run
//! use underwater_enhance::{enhance, image_statistics, io};
//! use std::path::Path;
//!
//! let original = io::load_bgr(Path::new("reef.jpg"))?;
//! let enhanced = enhance(&original)?;
//! println!("contrast {:.3} -> {:.3}",
//!     image_statistics(&original).contrast,
//!     image_statistics(&enhanced).contrast);
//! # Ok::<(), underwater_enhance::EnhanceError>(())
//! ```

use log::debug;

pub mod bgr;
pub mod clahe;
pub mod compare;
pub mod config;
pub mod constants;
pub mod contrast;
pub mod error;
pub mod io;
pub mod lab;
pub mod stats;
pub mod white_balance;

pub use bgr::{BgrChannel, BgrImage};
pub use config::{ContrastConfig, EnhanceConfig, WhiteBalanceConfig};
pub use error::{EnhanceError, Result};
pub use lab::LabImage;
pub use stats::{image_statistics, ImageStatistics};
pub use white_balance::ChannelGains;

/// Run the full pipeline with the default parameters
pub fn enhance(image: &BgrImage) -> Result<BgrImage> {
    enhance_with_config(image, &EnhanceConfig::default())
}

/// Color Balancer followed by Contrast Enhancer
///
/// # Errors
///
/// Returns [`EnhanceError::InvalidParameter`] if `config` fails validation;
/// nothing is processed in that case.
pub fn enhance_with_config(image: &BgrImage, config: &EnhanceConfig) -> Result<BgrImage> {
    config.validate()?;
    let (width, height) = image.dimensions();
    debug!("enhancing {}x{} image", width, height);

    let balanced = white_balance::balance_colors(image, &config.white_balance)?;
    contrast::enhance_contrast(&balanced, &config.contrast)
}

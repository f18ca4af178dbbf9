//! Local contrast enhancement on luminance only
//!
//! Equalizing the color channels directly would amplify chrominance noise
//! and shift hues. The image is split into L*a*b* planes, CLAHE runs on L,
//! and a/b are carried through untouched.

use log::debug;

use crate::bgr::BgrImage;
use crate::clahe::{clahe, ClaheParams};
use crate::config::ContrastConfig;
use crate::error::Result;
use crate::lab::LabImage;

/// CLAHE on the L plane; the a and b planes are returned bit-identical
pub fn equalize_luminance(lab: &LabImage, config: &ContrastConfig) -> Result<LabImage> {
    config.validate()?;
    let l = clahe(&lab.l, &ClaheParams::from(config))?;
    lab.with_luminance(l)
}

/// Contrast Enhancer stage: BGR -> Lab, CLAHE on L, Lab -> BGR
pub fn enhance_contrast(image: &BgrImage, config: &ContrastConfig) -> Result<BgrImage> {
    let lab = LabImage::from_bgr(image);
    let enhanced = equalize_luminance(&lab, config)?;
    debug!(
        "luminance equalized with clip {} on {}x{} tiles",
        config.clip_limit, config.tiles_x, config.tiles_y
    );
    enhanced.to_bgr()
}

//! Tunable parameters of the enhancement pipeline
//!
//! Defaults reproduce the fixed pipeline (max gain 4.0, clip limit 2.0,
//! 8x8 tiles, no red compensation). Overrides are set field by field:
//!
//! ```
//! use underwater_enhance::EnhanceConfig;
//!
//! let mut config = EnhanceConfig::default();
//! config.contrast.clip_limit = 3.0;
//! config.validate()?;
//! # Ok::<(), underwater_enhance::EnhanceError>(())
//! ```

use crate::constants;
use crate::error::{EnhanceError, Result};

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnhanceConfig {
    /// Color Balancer parameters
    pub white_balance: WhiteBalanceConfig,

    /// Contrast Enhancer parameters
    pub contrast: ContrastConfig,
}

/// Gray-world white balance parameters
#[derive(Debug, Clone, PartialEq)]
pub struct WhiteBalanceConfig {
    /// Upper bound of every per-channel gain
    pub max_gain: f32,

    /// Lift the red channel from green before balancing
    pub compensate_red: bool,
}

impl Default for WhiteBalanceConfig {
    fn default() -> Self {
        Self {
            max_gain: constants::white_balance::MAX_GAIN,
            compensate_red: false,
        }
    }
}

/// CLAHE parameters for the luminance plane
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastConfig {
    /// Histogram clip limit relative to a flat histogram; 0 disables clipping
    pub clip_limit: f32,

    /// Tile columns
    pub tiles_x: u32,

    /// Tile rows
    pub tiles_y: u32,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            clip_limit: constants::contrast::CLIP_LIMIT,
            tiles_x: constants::contrast::TILES_X,
            tiles_y: constants::contrast::TILES_Y,
        }
    }
}

impl WhiteBalanceConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.max_gain.is_finite() || self.max_gain <= 0.0 {
            return Err(EnhanceError::invalid_parameter(
                "white_balance.max_gain",
                self.max_gain,
            ));
        }
        Ok(())
    }
}

impl ContrastConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.clip_limit.is_finite() || self.clip_limit < 0.0 {
            return Err(EnhanceError::invalid_parameter(
                "contrast.clip_limit",
                self.clip_limit,
            ));
        }
        if self.tiles_x == 0 {
            return Err(EnhanceError::invalid_parameter("contrast.tiles_x", 0));
        }
        if self.tiles_y == 0 {
            return Err(EnhanceError::invalid_parameter("contrast.tiles_y", 0));
        }
        Ok(())
    }
}

impl EnhanceConfig {
    /// Check every parameter range
    pub fn validate(&self) -> Result<()> {
        self.white_balance.validate()?;
        self.contrast.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_pipeline() {
        let config = EnhanceConfig::default();
        assert_eq!(config.white_balance.max_gain, 4.0);
        assert!(!config.white_balance.compensate_red);
        assert_eq!(config.contrast.clip_limit, 2.0);
        assert_eq!((config.contrast.tiles_x, config.contrast.tiles_y), (8, 8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EnhanceConfig::default();
        config.white_balance.max_gain = 0.0;
        assert!(matches!(
            config.validate(),
            Err(EnhanceError::InvalidParameter { .. })
        ));

        let mut config = EnhanceConfig::default();
        config.contrast.clip_limit = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = EnhanceConfig::default();
        config.contrast.tiles_y = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_clip_limit_is_allowed() {
        let mut config = EnhanceConfig::default();
        config.contrast.clip_limit = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_keep_other_defaults() {
        let mut config = EnhanceConfig::default();
        config.contrast.tiles_x = 4;
        config.contrast.tiles_y = 4;
        config.white_balance.compensate_red = true;

        assert!(config.validate().is_ok());
        assert_eq!(config.contrast.clip_limit, 2.0);
        assert_eq!(config.white_balance.max_gain, 4.0);
        assert_ne!(config, EnhanceConfig::default());
    }
}

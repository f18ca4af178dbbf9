//! Default parameters and fixed conversion constants
//!
//! The defaults reproduce the fixed pipeline; `EnhanceConfig` exposes them
//! as overridable values.

/// Color Balancer defaults
pub mod white_balance {
    /// Upper bound of any per-channel gray-world gain
    pub const MAX_GAIN: f32 = 4.0;
}

/// Contrast Enhancer defaults
pub mod contrast {
    /// CLAHE clip limit, relative to a uniform histogram (tile_area / 256)
    pub const CLIP_LIMIT: f32 = 2.0;

    /// Number of CLAHE tiles along x
    pub const TILES_X: u32 = 8;

    /// Number of CLAHE tiles along y
    pub const TILES_Y: u32 = 8;
}

/// 8-bit L*a*b* encoding
pub mod lab {
    /// L* in [0, 100] is stored as L* * 255 / 100
    pub const L_SCALE: f32 = 255.0 / 100.0;

    /// a* and b* are stored with this offset
    pub const AB_OFFSET: f32 = 128.0;
}

/// ITU-R BT.601 luma weights in 14-bit fixed point
pub mod luma {
    pub const SHIFT: u32 = 14;
    pub const B_WEIGHT: u32 = 1868;
    pub const G_WEIGHT: u32 = 9617;
    pub const R_WEIGHT: u32 = 4899;
}

/// Number of bins in an 8-bit histogram
pub const HISTOGRAM_BINS: usize = 256;

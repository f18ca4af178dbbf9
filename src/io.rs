//! Reading and writing `BgrImage` files through the `image` crate

use std::path::Path;

use log::debug;

use crate::bgr::BgrImage;
use crate::error::{EnhanceError, Result};

/// Decode any supported format into an 8-bit BGR image
pub fn load_bgr(path: &Path) -> Result<BgrImage> {
    let decoded = image::open(path).map_err(|source| EnhanceError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        decoded.width(),
        decoded.height(),
        decoded.color()
    );
    BgrImage::from_dynamic(&decoded)
}

/// Encode with the format implied by the file extension
pub fn save_bgr(image: &BgrImage, path: &Path) -> Result<()> {
    image
        .to_rgb()
        .save(path)
        .map_err(|source| EnhanceError::ImageSave {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_round_trip() {
        let path = std::env::temp_dir().join(format!("underwater_enhance_io_{}.png", std::process::id()));
        let image = BgrImage::from_fn(6, 4, |x, y| [x as u8 * 40, y as u8 * 60, 200]).unwrap();

        save_bgr(&image, &path).unwrap();
        let loaded = load_bgr(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, image);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = load_bgr(Path::new("nonexistent_file.jpg"));
        assert!(matches!(result, Err(EnhanceError::ImageLoad { .. })));
    }

    #[test]
    fn test_unknown_extension_is_save_error() {
        let image = BgrImage::from_pixel(1, 1, [0, 0, 0]).unwrap();
        let path = std::env::temp_dir().join("underwater_enhance_io.unknownext");
        assert!(matches!(
            save_bgr(&image, &path),
            Err(EnhanceError::ImageSave { .. })
        ));
    }
}

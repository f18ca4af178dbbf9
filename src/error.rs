//! Error types for the underwater_enhance library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for underwater_enhance operations
pub type Result<T> = std::result::Result<T, EnhanceError>;

/// Failure conditions of the enhancement pipeline and its I/O glue
#[derive(Error, Debug)]
pub enum EnhanceError {
    /// Input is empty, has a zero dimension, or is not 3-channel 8-bit
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    /// A tunable parameter is out of its valid range
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Image file could not be opened or decoded
    #[error("Failed to load image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image file could not be encoded or written
    #[error("Failed to save image {}: {source}", .path.display())]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl EnhanceError {
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// A configuration value outside its accepted range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("effective radius must be within [50, 100] percent, got {0}")]
    EffectiveRadius(f32),

    #[error("sensitivity must be within [0, 10], got {0}")]
    Sensitivity(f32),

    #[error("min area scale must be within [0, 10], got {0}")]
    MinAreaScale(f32),

    #[error("{name} must be within [0, 1], got {value}")]
    UnitRange { name: &'static str, value: f32 },

    #[error("{name} must be at most {max}, got {value}")]
    KernelSize {
        name: &'static str,
        value: i32,
        max: i32,
    },

    #[error("erosion iterations must be within [1, 10], got {0}")]
    ErodeIterations(u32),

    #[error("hue center must be below 180, got {0}")]
    HueCenter(u8),

    #[error("adaptive block range is inverted: min {min} > max {max}")]
    BlockRange { min: i32, max: i32 },

    #[error("auto-tune search space is empty")]
    EmptySearchSpace,
}

/// Errors that can occur when loading a source image or config from disk.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to load image '{path}': {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Image '{path}' is empty")]
    Empty { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ColonyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ImageLoad(#[from] ImageLoadError),

    #[error("Failed to read config: {0}")]
    ConfigFile(#[from] common::SerdeFormatError),
}

pub type Result<T> = std::result::Result<T, ColonyError>;

//! Gray image binarization.
//!
//! A pixel is foreground when it lies strictly above its threshold (global
//! or local); `invert` flips the result so dark colonies on a bright agar
//! become foreground.


use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::common::{Mask, kernel_size};
use crate::filter::{Border, box_mean, gaussian_blur};
use crate::raster::GrayImage;

/// Smallest accepted adaptive block size.
pub const MIN_BLOCK_SIZE: i32 = 3;

/// Thresholding strategy and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Display, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ThresholdMode {
    /// Global level chosen by maximizing between-class variance.
    Otsu,
    /// Local mean over a square block, minus `c`.
    AdaptiveMean { block_min: i32, block_max: i32, c: i32 },
    /// Gaussian-weighted local mean, minus `c`.
    AdaptiveGaussian { block_min: i32, block_max: i32, c: i32 },
    Fixed { level: u8 },
}

impl Default for ThresholdMode {
    fn default() -> Self {
        ThresholdMode::AdaptiveGaussian {
            block_min: 33,
            block_max: 33,
            c: 2,
        }
    }
}

impl ThresholdMode {
    /// Adaptive mode evaluated at a single block size.
    pub fn adaptive_gaussian(block: i32, c: i32) -> Self {
        ThresholdMode::AdaptiveGaussian {
            block_min: block,
            block_max: block,
            c,
        }
    }

    pub fn adaptive_mean(block: i32, c: i32) -> Self {
        ThresholdMode::AdaptiveMean {
            block_min: block,
            block_max: block,
            c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizationConfig {
    pub mode: ThresholdMode,
    pub invert: bool,
}

impl Default for BinarizationConfig {
    fn default() -> Self {
        Self {
            mode: ThresholdMode::default(),
            invert: true,
        }
    }
}

pub fn binarize(gray: &GrayImage, config: &BinarizationConfig) -> Mask {
    let mask = match config.mode {
        ThresholdMode::Otsu => {
            let level = otsu_level(gray);
            tracing::debug!(level, "Otsu threshold");
            global_threshold(gray, level)
        }
        ThresholdMode::Fixed { level } => global_threshold(gray, level),
        ThresholdMode::AdaptiveMean {
            block_min,
            block_max,
            c,
        } => dual_block(gray, block_min, block_max, c, false),
        ThresholdMode::AdaptiveGaussian {
            block_min,
            block_max,
            c,
        } => dual_block(gray, block_min, block_max, c, true),
    };

    if config.invert { mask.invert() } else { mask }
}

fn global_threshold(gray: &GrayImage, level: u8) -> Mask {
    gray.map(|&v| v > level)
}

/// Intersects the adaptive masks at both block sizes; equal sizes run once.
fn dual_block(gray: &GrayImage, block_min: i32, block_max: i32, c: i32, gaussian: bool) -> Mask {
    let small = kernel_size(block_min, MIN_BLOCK_SIZE);
    let large = kernel_size(block_max, MIN_BLOCK_SIZE);
    let first = adaptive_threshold(gray, small, c, gaussian);
    if small == large {
        return first;
    }
    first.and(&adaptive_threshold(gray, large, c, gaussian))
}

/// Foreground where `src - round(local mean) > -c`.
pub fn adaptive_threshold(gray: &GrayImage, block: usize, c: i32, gaussian: bool) -> Mask {
    let local = if gaussian {
        gaussian_blur(gray, block, Border::Replicate)
    } else {
        box_mean(gray, block, Border::Replicate)
    };
    gray.zip_map(&local, |&src, &mean| src as i32 - mean as i32 > -c)
}

/// Otsu's global threshold; pixels `<= level` form the dark class.
pub fn otsu_level(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for &v in gray.pixels() {
        histogram[v as usize] += 1;
    }
    let total = gray.len() as f64;
    if total == 0.0 {
        return 0;
    }

    let mu_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &n)| i as f64 * n as f64)
        .sum::<f64>()
        / total;

    let mut best_level = 0u8;
    let mut best_sigma = 0.0f64;
    let mut q1 = 0.0f64;
    let mut mu1_sum = 0.0f64;
    for (level, &count) in histogram.iter().enumerate() {
        q1 += count as f64 / total;
        mu1_sum += level as f64 * count as f64 / total;
        let q2 = 1.0 - q1;
        if q1 < f64::EPSILON || q2 < f64::EPSILON {
            continue;
        }
        let mu1 = mu1_sum / q1;
        let mu2 = (mu_total - mu1_sum) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > best_sigma {
            best_sigma = sigma;
            best_level = level as u8;
        }
    }
    best_level
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{ColorConsistencyConfig, ColorSplitConfig};
use crate::common::{ensure_odd, round_half_up};
use crate::counting::MinArea;
use crate::error::{ConfigError, Result};
use crate::threshold::{BinarizationConfig, ThresholdMode};
use crate::watershed::{DtThreshold, SeedStrategy};

/// Largest blur, morphology and seed kernel a config may ask for.
pub const MAX_KERNEL_SIZE: i32 = 21;

/// Everything a single processing pass needs. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Gaussian blur before dish detection and binarization, forced odd.
    pub blur_size: i32,
    pub binarization: BinarizationConfig,
    /// Opening kernel size, forced odd; 1 disables the opening.
    pub morph_size: i32,
    /// Counting circle radius in percent of the dish radius, `[50, 100]`.
    pub effective_radius_pct: f32,
    pub min_area: MinArea,
    /// Splits touching colonies when set.
    pub watershed: Option<SeedStrategy>,
    /// Counts two hue classes instead of the binarized foreground when set.
    pub color_split: Option<ColorSplitConfig>,
    pub color_consistency: Option<ColorConsistencyConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            blur_size: 5,
            binarization: BinarizationConfig::default(),
            morph_size: 5,
            effective_radius_pct: 87.0,
            min_area: MinArea::default(),
            watershed: None,
            color_split: None,
            color_consistency: None,
        }
    }
}

impl PipelineConfig {
    /// Derives blur, morphology and minimum area from one `[0, 10]` knob.
    /// Higher sensitivity blurs less, opens with a smaller kernel and raises
    /// the minimum area.
    pub fn from_sensitivity(sensitivity: f32) -> std::result::Result<Self, ConfigError> {
        if !(0.0..=10.0).contains(&sensitivity) {
            return Err(ConfigError::Sensitivity(sensitivity));
        }
        let s = sensitivity as f64;
        let blur = round_half_up(13.0 - s).clamp(3, 13) as i32;
        let morph = (7 - round_half_up(0.4 * s)).clamp(3, 9) as i32;
        Ok(Self {
            blur_size: ensure_odd(blur),
            morph_size: ensure_odd(morph),
            min_area: MinArea::Scale(sensitivity),
            ..Self::default()
        })
    }

    /// Loads a YAML or JSON config (by extension) and validates it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = common::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(50.0..=100.0).contains(&self.effective_radius_pct) {
            return Err(ConfigError::EffectiveRadius(self.effective_radius_pct));
        }
        if let MinArea::Scale(scale) = self.min_area
            && !(0.0..=10.0).contains(&scale)
        {
            return Err(ConfigError::MinAreaScale(scale));
        }
        kernel_limit("blur size", self.blur_size)?;
        kernel_limit("morph size", self.morph_size)?;

        match self.binarization.mode {
            ThresholdMode::AdaptiveMean {
                block_min,
                block_max,
                ..
            }
            | ThresholdMode::AdaptiveGaussian {
                block_min,
                block_max,
                ..
            } if block_min > block_max => {
                return Err(ConfigError::BlockRange {
                    min: block_min,
                    max: block_max,
                });
            }
            _ => {}
        }

        if let Some(strategy) = &self.watershed {
            validate_seed_strategy(strategy)?;
        }

        if let Some(split) = &self.color_split {
            for class in [&split.class_a, &split.class_b] {
                if class.hue_center >= crate::raster::HUE_RANGE {
                    return Err(ConfigError::HueCenter(class.hue_center));
                }
                kernel_limit("seed erode size", class.erode_size)?;
                kernel_limit("seed dilate size", class.dilate_size)?;
            }
        }

        if let Some(consistency) = &self.color_consistency {
            unit_range("color tolerance", consistency.tolerance)?;
        }
        Ok(())
    }
}

fn unit_range(name: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::UnitRange { name, value })
    }
}

fn kernel_limit(name: &'static str, value: i32) -> std::result::Result<(), ConfigError> {
    if value <= MAX_KERNEL_SIZE {
        Ok(())
    } else {
        Err(ConfigError::KernelSize {
            name,
            value,
            max: MAX_KERNEL_SIZE,
        })
    }
}

fn validate_iterations(iterations: u32) -> std::result::Result<(), ConfigError> {
    if (1..=10).contains(&iterations) {
        Ok(())
    } else {
        Err(ConfigError::ErodeIterations(iterations))
    }
}

fn validate_seed_strategy(strategy: &SeedStrategy) -> std::result::Result<(), ConfigError> {
    match *strategy {
        SeedStrategy::Erosion { kernel, iterations } => {
            kernel_limit("erosion kernel", kernel)?;
            validate_iterations(iterations)
        }
        SeedStrategy::Hybrid {
            kernel,
            iterations,
            peak_cleanup,
            ..
        } => {
            kernel_limit("erosion kernel", kernel)?;
            kernel_limit("peak cleanup size", peak_cleanup)?;
            validate_iterations(iterations)
        }
        SeedStrategy::DistanceTransform {
            threshold,
            peak_cleanup,
            ..
        } => {
            kernel_limit("peak cleanup size", peak_cleanup)?;
            match threshold {
                DtThreshold::Alpha(alpha) => unit_range("split strength", alpha),
                DtThreshold::RelativePerComponent(alpha) => unit_range("split strength", alpha),
                DtThreshold::Absolute(_) => Ok(()),
            }
        }
    }
}

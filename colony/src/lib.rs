//! Colony - colony counting for petri-dish photographs.
//!
//! The pipeline locates the dish, crops a square ROI around it, binarizes
//! and cleans the gray ROI, optionally splits touching colonies with a
//! marker watershed or counts two hue classes separately, and finally
//! counts 8-connected components inside an inner counting circle.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use colony::{ColorImage, PipelineConfig, process_image};
//!
//! let image = ColorImage::from_file("plate.jpg")?;
//! let config = PipelineConfig::from_sensitivity(6.0)?;
//! let result = process_image(&config, &image)?;
//!
//! println!("Found {} colonies", result.count);
//! ```

pub mod annotate;
pub mod autotune;
pub mod color;
pub(crate) mod common;
mod config;
pub mod counting;
pub mod dish;
pub mod distance;
mod error;
pub(crate) mod filter;
pub(crate) mod labeling;
pub(crate) mod morphology;
mod pipeline;
mod raster;
mod roi;
pub mod sweep;
pub mod threshold;
pub mod watershed;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Core image types
// ============================================================================

pub use common::{Buffer2, Mask, Rect, ensure_odd};
pub use raster::{ColorImage, GrayImage, HUE_RANGE, Hsv, HsvImage};

// ============================================================================
// Configuration and errors
// ============================================================================

pub use color::{ColorConsistencyConfig, ColorSplitConfig, HueClass};
pub use config::PipelineConfig;
pub use counting::MinArea;
pub use distance::{DistanceMetric, MaskSize};
pub use error::{ColonyError, ConfigError, ImageLoadError, Result};
pub use threshold::{BinarizationConfig, ThresholdMode};
pub use watershed::{DtThreshold, SeedStrategy};

// ============================================================================
// Pipeline
// ============================================================================

pub use counting::{InnerCircle, Region};
pub use dish::Dish;
pub use pipeline::{PreparedImage, ProcessResult, StageMasks, process_image, process_prepared};
pub use roi::roi_rect;

// ============================================================================
// Tuning and diagnostics
// ============================================================================

pub use annotate::{AnnotationStyle, annotate};
pub use autotune::{Candidate, SearchSpace, TuneOutcome, tune};
pub use sweep::{SweepEvaluator, SweepReport, SweepResult};

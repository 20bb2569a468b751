//! Diagnostic sweep of distance-transform watershed settings.
//!
//! Binarization and morphology stay fixed at a baseline; only the seed
//! strategy varies. The report ranks every combination by count next to the
//! baseline count without watershed. Nothing is applied automatically.

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::counting::MinArea;
use crate::distance::{DistanceMetric, MaskSize};
use crate::error::Result;
use crate::pipeline::{PreparedImage, process_prepared};
use crate::raster::ColorImage;
use crate::threshold::{BinarizationConfig, ThresholdMode};
use crate::watershed::{DtThreshold, SeedStrategy};

#[derive(Debug, Clone, PartialEq)]
pub struct SweepEvaluator {
    /// Fixed stages; its own `watershed` and `color_split` settings are
    /// ignored, since color splitting bypasses the watershed.
    pub baseline: PipelineConfig,
    pub metrics: Vec<DistanceMetric>,
    pub masks: Vec<MaskSize>,
    pub peak_cleanup_sizes: Vec<i32>,
    pub alphas: Vec<f32>,
    pub absolute_levels: Vec<u8>,
}

impl Default for SweepEvaluator {
    fn default() -> Self {
        Self {
            baseline: PipelineConfig {
                blur_size: 7,
                binarization: BinarizationConfig {
                    mode: ThresholdMode::adaptive_gaussian(33, 0),
                    invert: true,
                },
                morph_size: 5,
                effective_radius_pct: 84.0,
                min_area: MinArea::Pixels(93),
                watershed: None,
                color_split: None,
                color_consistency: None,
            },
            metrics: vec![DistanceMetric::L2],
            masks: vec![MaskSize::Three, MaskSize::Five],
            peak_cleanup_sizes: vec![1, 3, 5],
            alphas: vec![0.0, 0.02, 0.05, 0.08, 0.1, 0.12, 0.15, 0.18, 0.2],
            absolute_levels: vec![5, 10, 15, 20, 25, 30, 40, 50, 60],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub id: String,
    pub params: SeedStrategy,
    pub count: usize,
}

/// Serializes as `{baseline, results: [{id, params, count}]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub baseline: usize,
    /// Sorted by count, highest first; equal counts keep evaluation order.
    pub results: Vec<SweepResult>,
}

impl SweepReport {
    /// Results counting more colonies than the baseline.
    pub fn improving(&self) -> impl Iterator<Item = &SweepResult> {
        self.results.iter().filter(|r| r.count > self.baseline)
    }
}

impl SweepEvaluator {
    pub fn combinations(&self) -> usize {
        self.metrics.len()
            * self.masks.len()
            * self.peak_cleanup_sizes.len()
            * (self.alphas.len() + self.absolute_levels.len())
    }

    /// Strategies in evaluation order with their report ids.
    fn strategies(&self) -> Vec<(String, SeedStrategy)> {
        let mut out = Vec::with_capacity(self.combinations());
        for &metric in &self.metrics {
            for &mask in &self.masks {
                for &peak_cleanup in &self.peak_cleanup_sizes {
                    let strategy = |threshold| SeedStrategy::DistanceTransform {
                        metric,
                        mask,
                        threshold,
                        peak_cleanup,
                    };
                    for &alpha in &self.alphas {
                        let id = format!("a-{metric}-{mask}-{peak_cleanup}-{alpha}");
                        out.push((id, strategy(DtThreshold::Alpha(alpha))));
                    }
                    for &level in &self.absolute_levels {
                        let id = format!("t-{metric}-{mask}-{peak_cleanup}-{level}");
                        out.push((id, strategy(DtThreshold::Absolute(level))));
                    }
                }
            }
        }
        out
    }

    pub fn run(&self, image: &ColorImage) -> Result<SweepReport> {
        let baseline_config = PipelineConfig {
            watershed: None,
            color_split: None,
            ..self.baseline
        };
        baseline_config.validate()?;

        let prepared = PreparedImage::new(image, baseline_config.blur_size);
        let baseline = process_prepared(&baseline_config, &prepared).count;
        tracing::debug!(baseline, combinations = self.combinations(), "Sweep started");

        let mut results = self
            .strategies()
            .into_iter()
            .map(|(id, strategy)| {
                let config = PipelineConfig {
                    watershed: Some(strategy),
                    ..baseline_config
                };
                config.validate()?;
                let count = process_prepared(&config, &prepared).count;
                tracing::debug!(%id, count, "Sweep combination");
                Ok(SweepResult {
                    id,
                    params: strategy,
                    count,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        results.sort_by(|a, b| b.count.cmp(&a.count));

        let report = SweepReport { baseline, results };
        tracing::info!(
            baseline,
            combinations = report.results.len(),
            improving = report.improving().count(),
            top = report.results.first().map(|r| r.count),
            "Sweep finished"
        );
        Ok(report)
    }
}

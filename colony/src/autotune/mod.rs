//! Grid search over blur, binarization and morphology settings.
//!
//! The search space is a lazy, restartable iterator of [`Candidate`]s; the
//! scorer only sees one candidate at a time. Dish detection depends on the
//! blur size, so the prepared image is rebuilt whenever the blur changes and
//! reused for every candidate that shares it.
//!
//! After the grid search a single calibration pass samples HSV values under
//! the winning foreground and re-centers hue class A on them.


use std::f64::consts::TAU;

use serde::Serialize;

use crate::color::{ColorSplitConfig, HueClass, circular_hue_dist, count_classes};
use crate::common::{Mask, round_half_up};
use crate::config::PipelineConfig;
use crate::counting::count_regions;
use crate::error::{ConfigError, Result};
use crate::pipeline::PreparedImage;
use crate::raster::{ColorImage, HUE_RANGE, Hsv};
use crate::threshold::{BinarizationConfig, ThresholdMode};

/// Calibration needs strictly more samples than this.
pub const MIN_CALIBRATION_SAMPLES: usize = 20;

const HUE_TOLERANCE_RANGE: (i64, i64) = (6, 40);
const FALLBACK_HUE_TOLERANCE: u8 = 10;
const FALLBACK_SV_MIN: u8 = 40;

// ============================================================================
// Search space
// ============================================================================

/// One point of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub blur_size: i32,
    pub mode: ThresholdMode,
    pub invert: bool,
    pub morph_size: i32,
}

impl Candidate {
    /// `base` with this candidate's blur, binarization and morphology.
    pub fn apply(&self, base: &PipelineConfig) -> PipelineConfig {
        PipelineConfig {
            blur_size: self.blur_size,
            binarization: BinarizationConfig {
                mode: self.mode,
                invert: self.invert,
            },
            morph_size: self.morph_size,
            ..*base
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    pub blur_sizes: Vec<i32>,
    pub modes: Vec<ThresholdMode>,
    pub inverts: Vec<bool>,
    pub morph_sizes: Vec<i32>,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            blur_sizes: vec![5, 9, 13],
            modes: default_modes(),
            inverts: vec![true, false],
            morph_sizes: vec![3, 5, 7],
        }
    }
}

/// Otsu, both adaptive families over blocks {11, 17, 23} x C {-6..2}, then a
/// few fixed levels.
fn default_modes() -> Vec<ThresholdMode> {
    const BLOCKS: [i32; 3] = [11, 17, 23];
    const CS: [i32; 5] = [-6, -4, -2, 0, 2];

    let adaptive = |make: fn(i32, i32) -> ThresholdMode| {
        BLOCKS
            .into_iter()
            .flat_map(move |block| CS.into_iter().map(move |c| make(block, c)))
    };

    std::iter::once(ThresholdMode::Otsu)
        .chain(adaptive(ThresholdMode::adaptive_mean))
        .chain(adaptive(ThresholdMode::adaptive_gaussian))
        .chain([64, 96, 128, 160].map(|level| ThresholdMode::Fixed { level }))
        .collect()
}

impl SearchSpace {
    /// Candidates with blur outermost and morphology innermost. Each call
    /// starts a fresh pass.
    pub fn candidates(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.blur_sizes.iter().flat_map(move |&blur_size| {
            self.modes.iter().flat_map(move |&mode| {
                self.inverts.iter().flat_map(move |&invert| {
                    self.morph_sizes.iter().map(move |&morph_size| Candidate {
                        blur_size,
                        mode,
                        invert,
                        morph_size,
                    })
                })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.blur_sizes.len() * self.modes.len() * self.inverts.len() * self.morph_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tuning
// ============================================================================

/// Chosen class seed sizes and the count they reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedChoice {
    pub erode_size: i32,
    pub dilate_size: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuneOutcome {
    /// The base config with the winning candidate, seed sizes and class A
    /// calibration applied.
    pub config: PipelineConfig,
    pub best: Candidate,
    pub count: usize,
    pub seeds: Option<SeedChoice>,
    /// Calibrated class A; only written into `config` when color split is on.
    pub calibration: Option<HueClass>,
}

/// Runs seed tuning (color split only), the grid search and one calibration
/// pass. Candidates are scored by the colony count of the opened foreground
/// inside the counting circle; the first candidate reaching the top count
/// wins.
pub fn tune(base: &PipelineConfig, image: &ColorImage, space: &SearchSpace) -> Result<TuneOutcome> {
    base.validate()?;
    if space.is_empty() {
        return Err(ConfigError::EmptySearchSpace.into());
    }

    let mut config = *base;
    let seeds = config.color_split.as_mut().map(|split| {
        let prepared = PreparedImage::new(image, base.blur_size);
        let choice = tune_seed_sizes(base, &prepared, split);
        *split = split.with_seed_sizes(choice.erode_size, choice.dilate_size);
        choice
    });

    let (best, count) = search(&config, image, space);
    config = best.apply(&config);

    let calibration = calibrate_from_foreground(&config, image);
    if let (Some(class_a), Some(split)) = (calibration, config.color_split.as_mut()) {
        split.class_a = class_a;
    }

    tracing::info!(
        count,
        candidates = space.len(),
        blur = best.blur_size,
        mode = %best.mode,
        invert = best.invert,
        morph = best.morph_size,
        calibrated = calibration.is_some(),
        "Auto-tune finished"
    );

    Ok(TuneOutcome {
        config,
        best,
        count,
        seeds,
        calibration,
    })
}

fn search(base: &PipelineConfig, image: &ColorImage, space: &SearchSpace) -> (Candidate, usize) {
    let min_area = base.min_area.pixels();
    let mut prepared: Option<(i32, PreparedImage)> = None;
    let mut best: Option<(Candidate, usize)> = None;

    for candidate in space.candidates() {
        let reuse = matches!(&prepared, Some((blur, _)) if *blur == candidate.blur_size);
        if !reuse {
            prepared = Some((candidate.blur_size, PreparedImage::new(image, candidate.blur_size)));
        }
        let Some((_, current)) = &prepared else {
            continue;
        };

        let score = score_candidate(&candidate.apply(base), current, min_area);
        if best.is_none_or(|(_, top)| score > top) {
            tracing::debug!(?candidate, score, "New best candidate");
            best = Some((candidate, score));
        }
    }

    // The space is non-empty, so at least one candidate was scored.
    best.unwrap_or((
        Candidate {
            blur_size: base.blur_size,
            mode: base.binarization.mode,
            invert: base.binarization.invert,
            morph_size: base.morph_size,
        },
        0,
    ))
}

fn score_candidate(config: &PipelineConfig, prepared: &PreparedImage, min_area: usize) -> usize {
    let (_, opened) = prepared.foreground(config);
    let inner = counting_mask(config, prepared);
    count_regions(&opened.and(&inner), min_area).len()
}

fn counting_mask(config: &PipelineConfig, prepared: &PreparedImage) -> Mask {
    prepared
        .inner_circle(config.effective_radius_pct)
        .mask(prepared.roi.width, prepared.roi.height)
}

const SEED_ERODE_SIZES: [i32; 4] = [1, 3, 5, 7];
const SEED_DILATE_SIZES: [i32; 4] = [3, 5, 7, 9];

/// Picks the erode/dilate pair maximizing count(A) + count(B).
fn tune_seed_sizes(
    config: &PipelineConfig,
    prepared: &PreparedImage,
    split: &ColorSplitConfig,
) -> SeedChoice {
    let hsv = prepared.color.to_hsv();
    let inner = counting_mask(config, prepared);
    let min_area = config.min_area.pixels();

    let mut best: Option<SeedChoice> = None;
    for erode_size in SEED_ERODE_SIZES {
        for dilate_size in SEED_DILATE_SIZES {
            let trial = split.with_seed_sizes(erode_size, dilate_size);
            let count = count_classes(&trial, &hsv, &inner, min_area).total();
            if best.is_none_or(|b| count > b.count) {
                best = Some(SeedChoice {
                    erode_size,
                    dilate_size,
                    count,
                });
            }
        }
    }
    let choice = best.unwrap_or(SeedChoice {
        erode_size: split.class_a.erode_size,
        dilate_size: split.class_a.dilate_size,
        count: 0,
    });
    tracing::debug!(?choice, "Tuned class seed sizes");
    choice
}

// ============================================================================
// Hue calibration
// ============================================================================

/// Samples HSV values of the source image under the tuned foreground inside
/// the counting circle and calibrates class A from them.
fn calibrate_from_foreground(config: &PipelineConfig, image: &ColorImage) -> Option<HueClass> {
    let prepared = PreparedImage::new(image, config.blur_size);
    let (_, opened) = prepared.foreground(config);
    let sample_mask = opened.and(&counting_mask(config, &prepared));
    let hsv = prepared.color.to_hsv();

    let samples: Vec<Hsv> = sample_mask
        .pixels()
        .iter()
        .zip(hsv.pixels())
        .filter_map(|(&set, &px)| set.then_some(px))
        .collect();

    let base = config
        .color_split
        .map(|split| split.class_a)
        .unwrap_or_default();
    calibrate_hue_class(&samples, &base)
}

/// Re-centers `base` on the sampled pixels: circular mean hue, tolerance at
/// the 80th percentile of hue distance clamped to `[6, 40]`, saturation and
/// value floors at the 20th percentile. Marker color and seed sizes are
/// kept. Returns `None` with too few samples.
pub fn calibrate_hue_class(samples: &[Hsv], base: &HueClass) -> Option<HueClass> {
    if samples.len() <= MIN_CALIBRATION_SAMPLES {
        tracing::debug!(
            samples = samples.len(),
            "Too few samples, keeping manual hue class"
        );
        return None;
    }

    let hue_center = circular_mean_hue(samples.iter().map(|px| px.h));

    let mut distances: Vec<u8> = samples
        .iter()
        .map(|px| circular_hue_dist(px.h, hue_center))
        .collect();
    let p80 = percentile(&mut distances, 0.8);
    let hue_tolerance = if p80 == 0 {
        FALLBACK_HUE_TOLERANCE
    } else {
        (p80 as i64).clamp(HUE_TOLERANCE_RANGE.0, HUE_TOLERANCE_RANGE.1) as u8
    };

    let floor = |values: &mut Vec<u8>| match percentile(values, 0.2) {
        0 => FALLBACK_SV_MIN,
        v => v,
    };
    let sat_min = floor(&mut samples.iter().map(|px| px.s).collect());
    let val_min = floor(&mut samples.iter().map(|px| px.v).collect());

    let calibrated = HueClass {
        hue_center,
        hue_tolerance,
        sat_min,
        val_min,
        ..*base
    };
    tracing::debug!(samples = samples.len(), ?calibrated, "Calibrated hue class");
    Some(calibrated)
}

/// Hue of the summed unit vectors, mapped back onto `[0, 180)`.
fn circular_mean_hue(hues: impl Iterator<Item = u8>) -> u8 {
    let (sum_x, sum_y) = hues.fold((0.0f64, 0.0f64), |(x, y), h| {
        let theta = h as f64 / HUE_RANGE as f64 * TAU;
        (x + theta.cos(), y + theta.sin())
    });
    let mut theta = sum_y.atan2(sum_x);
    if theta < 0.0 {
        theta += TAU;
    }
    (round_half_up(theta / TAU * HUE_RANGE as f64) % HUE_RANGE as i64) as u8
}

/// Value at index `floor(len * q)` of the sorted values. `values` must not be
/// empty.
fn percentile(values: &mut [u8], q: f64) -> u8 {
    values.sort_unstable();
    let index = ((values.len() as f64 * q) as usize).min(values.len() - 1);
    values[index]
}

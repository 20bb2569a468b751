//! Hue-based colony classes and the color consistency filter.
//!
//! Hue lives on an 8-bit circle of length 180, so class windows that cross
//! 0/179 are split into a low and a high range. The two classes are counted
//! independently; overlapping windows count the same colony twice.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::common::{Mask, kernel_size};
use crate::counting::{Region, count_regions};
use crate::labeling::LabelMap;
use crate::morphology::{StructuringElement, dilate, erode};
use crate::raster::{ColorImage, HUE_RANGE, HsvImage};

/// Shortest distance between two hues on the 180-step circle.
pub fn circular_hue_dist(a: u8, b: u8) -> u8 {
    let d = a.abs_diff(b) % HUE_RANGE;
    d.min(HUE_RANGE - d)
}

/// One color morphotype: a hue band plus saturation and value floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HueClass {
    /// Band center in `[0, 180)`.
    pub hue_center: u8,
    pub hue_tolerance: u8,
    pub sat_min: u8,
    pub val_min: u8,
    /// Annotation color, never touched by calibration.
    pub marker_color: [u8; 3],
    /// Seed erosion size, forced odd.
    pub erode_size: i32,
    /// Seed dilation size, forced odd.
    pub dilate_size: i32,
}

impl Default for HueClass {
    fn default() -> Self {
        Self {
            hue_center: 19,
            hue_tolerance: 6,
            sat_min: 39,
            val_min: 88,
            marker_color: [0, 255, 0],
            erode_size: 5,
            dilate_size: 7,
        }
    }
}

impl HueClass {
    /// Inclusive hue ranges covered by the band.
    pub fn hue_ranges(&self) -> Vec<(u8, u8)> {
        let center = self.hue_center as i32;
        let tol = self.hue_tolerance as i32;
        let range = HUE_RANGE as i32;
        if center - tol < 0 || center + tol > range - 1 {
            let low_end = ((center + tol) % range).max(0) as u8;
            let high_start = ((center - tol + range) % range).max(0) as u8;
            vec![(0, low_end), (high_start, HUE_RANGE - 1)]
        } else {
            vec![(
                (center - tol).max(0) as u8,
                (center + tol).min(range - 1) as u8,
            )]
        }
    }

    pub fn mask(&self, hsv: &HsvImage) -> Mask {
        let ranges = self.hue_ranges();
        hsv.map(|px| {
            px.s >= self.sat_min
                && px.v >= self.val_min
                && ranges.iter().any(|&(lo, hi)| (lo..=hi).contains(&px.h))
        })
    }

    /// Class mask inside `inner`, eroded then dilated into seed blobs.
    pub fn seeds(&self, hsv: &HsvImage, inner: &Mask) -> Mask {
        let mask = self.mask(hsv).and(inner);
        let eroded = erode(&mask, &StructuringElement::ellipse(kernel_size(self.erode_size, 1)));
        dilate(&eroded, &StructuringElement::ellipse(kernel_size(self.dilate_size, 1)))
    }

    pub fn count(&self, hsv: &HsvImage, inner: &Mask, min_area: usize) -> Vec<Region> {
        count_regions(&self.seeds(hsv, inner), min_area)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSplitConfig {
    pub class_a: HueClass,
    pub class_b: HueClass,
}

impl Default for ColorSplitConfig {
    fn default() -> Self {
        Self {
            class_a: HueClass::default(),
            class_b: HueClass {
                hue_center: 140,
                hue_tolerance: 15,
                sat_min: 40,
                val_min: 40,
                marker_color: [255, 0, 255],
                ..HueClass::default()
            },
        }
    }
}

impl ColorSplitConfig {
    /// Sets the seed sizes of both classes.
    pub fn with_seed_sizes(mut self, erode_size: i32, dilate_size: i32) -> Self {
        for class in [&mut self.class_a, &mut self.class_b] {
            class.erode_size = erode_size;
            class.dilate_size = dilate_size;
        }
        self
    }
}

/// Regions of both classes in ROI coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassCounts {
    pub regions_a: Vec<Region>,
    pub regions_b: Vec<Region>,
}

impl ClassCounts {
    pub fn total(&self) -> usize {
        self.regions_a.len() + self.regions_b.len()
    }
}

pub fn count_classes(
    config: &ColorSplitConfig,
    hsv: &HsvImage,
    inner: &Mask,
    min_area: usize,
) -> ClassCounts {
    ClassCounts {
        regions_a: config.class_a.count(hsv, inner, min_area),
        regions_b: config.class_b.count(hsv, inner, min_area),
    }
}

// ============================================================================
// Color consistency
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConsistencyConfig {
    /// Largest accepted RGB distance from the typical colony color, in `[0, 1]`
    /// of the RGB cube diagonal.
    pub tolerance: f32,
}

impl Default for ColorConsistencyConfig {
    fn default() -> Self {
        Self { tolerance: 0.25 }
    }
}

/// Mean RGB of every region's pixels.
fn region_means(image: &ColorImage, labels: &LabelMap, regions: &[Region]) -> Vec<[f64; 3]> {
    let mut sums = vec![[0.0f64; 4]; labels.num_labels() + 1];
    for (&label, rgb) in labels.labels().pixels().iter().zip(image.pixels()) {
        if label == 0 {
            continue;
        }
        let acc = &mut sums[label as usize];
        for (sum, &v) in acc.iter_mut().zip(rgb) {
            *sum += v as f64;
        }
        acc[3] += 1.0;
    }
    regions
        .iter()
        .map(|r| {
            let acc = sums[r.label as usize];
            let n = acc[3].max(1.0);
            [acc[0] / n, acc[1] / n, acc[2] / n]
        })
        .collect()
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Keeps regions whose mean color lies within `tolerance` of the per-channel
/// median of all region means. `labels` must be the map `regions` came from.
pub fn filter_consistent(
    image: &ColorImage,
    labels: &LabelMap,
    regions: Vec<Region>,
    config: &ColorConsistencyConfig,
) -> Vec<Region> {
    if regions.len() < 2 {
        return regions;
    }
    let means = region_means(image, labels, &regions);
    let reference: Vec<f64> = (0..3)
        .map(|c| median(&mut means.iter().map(|m| m[c]).collect::<Vec<_>>()))
        .collect();
    let max_dist = config.tolerance as f64 * 3f64.sqrt() * 255.0;

    let before = regions.len();
    let kept: Vec<Region> = regions
        .into_iter()
        .zip(&means)
        .filter(|(_, mean)| {
            let d2: f64 = (0..3).map(|c| (mean[c] - reference[c]).powi(2)).sum();
            d2.sqrt() <= max_dist
        })
        .map(|(region, _)| region)
        .collect();
    tracing::debug!(before, after = kept.len(), "Color consistency filter");
    kept
}

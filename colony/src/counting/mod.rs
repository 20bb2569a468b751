//! Connected-component counting inside the effective dish radius.


use serde::{Deserialize, Serialize};

use crate::common::{Mask, Rect, round_half_up};
use crate::dish::Dish;
use crate::labeling::LabelMap;

/// Minimum colony area, either literal or from the 0-10 sensitivity scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinArea {
    Pixels(u32),
    Scale(f32),
}

impl Default for MinArea {
    fn default() -> Self {
        MinArea::Pixels(30)
    }
}

impl MinArea {
    pub fn pixels(self) -> usize {
        match self {
            MinArea::Pixels(px) => px as usize,
            MinArea::Scale(scale) => min_area_from_scale(scale) as usize,
        }
    }
}

/// `round(5 + scale² * 15)`: gentle at the low end, steep at the high end.
pub fn min_area_from_scale(scale: f32) -> u32 {
    let scale = scale as f64;
    round_half_up(5.0 + scale * scale * 15.0).max(0) as u32
}

/// Counting circle in ROI-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerCircle {
    pub center_x: i64,
    pub center_y: i64,
    pub radius: i64,
}

impl InnerCircle {
    /// `radius_percent` of the dish radius around the dish center, mapped into
    /// `roi` and clamped to lie inside it.
    pub fn new(dish: &Dish, roi: Rect, radius_percent: f32) -> Self {
        let radius = round_half_up(dish.radius as f64 * radius_percent as f64 / 100.0).max(0);
        let max_x = (roi.width as i64 - 1).max(0);
        let max_y = (roi.height as i64 - 1).max(0);
        Self {
            center_x: (dish.center_x as i64 - roi.x as i64).clamp(0, max_x),
            center_y: (dish.center_y as i64 - roi.y as i64).clamp(0, max_y),
            radius,
        }
    }

    pub fn mask(&self, width: usize, height: usize) -> Mask {
        Mask::circle(width, height, self.center_x, self.center_y, self.radius)
    }
}

/// A counted colony.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub label: u32,
    pub area_px: usize,
    /// Mean pixel position `(x, y)`.
    pub centroid: (f64, f64),
}

impl Region {
    pub fn translated(self, dx: usize, dy: usize) -> Self {
        Self {
            centroid: (self.centroid.0 + dx as f64, self.centroid.1 + dy as f64),
            ..self
        }
    }
}

/// Labels `mask` with 8-connectivity and keeps components of at least
/// `min_area` pixels. Region labels index into the returned map.
pub fn label_regions(mask: &Mask, min_area: usize) -> (LabelMap, Vec<Region>) {
    let labels = LabelMap::from_mask(mask);
    let regions = labels
        .component_stats()
        .into_iter()
        .filter(|c| c.area >= min_area)
        .map(|c| Region {
            label: c.label,
            area_px: c.area,
            centroid: c.centroid,
        })
        .collect();
    (labels, regions)
}

pub fn count_regions(mask: &Mask, min_area: usize) -> Vec<Region> {
    label_regions(mask, min_area).1
}

//! Two-pass chamfer distance transform.
//!
//! Every foreground pixel receives its chamfer distance to the nearest
//! background pixel. Pixels outside the image are never background, so a
//! blob touching the border keeps growing toward it.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::common::{Buffer2, Mask};
use crate::raster::GrayImage;

/// Distance map in pixels.
pub type DistanceMap = Buffer2<f32>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum DistanceMetric {
    L1,
    #[default]
    L2,
    #[strum(serialize = "C")]
    #[serde(rename = "C")]
    Chebyshev,
}

/// Chamfer mask size: 3x3 or 5x5 (adds knight moves).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum MaskSize {
    #[strum(serialize = "3")]
    Three,
    #[default]
    #[strum(serialize = "5")]
    Five,
}

impl MaskSize {
    pub fn size(self) -> u8 {
        match self {
            MaskSize::Three => 3,
            MaskSize::Five => 5,
        }
    }
}

impl From<MaskSize> for u8 {
    fn from(mask: MaskSize) -> u8 {
        mask.size()
    }
}

impl TryFrom<u8> for MaskSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(MaskSize::Three),
            5 => Ok(MaskSize::Five),
            other => Err(format!("distance mask size must be 3 or 5, got {}", other)),
        }
    }
}

/// Chamfer weights: axial step, diagonal step, knight step.
#[derive(Debug, Clone, Copy)]
struct Weights {
    a: f32,
    b: f32,
    c: Option<f32>,
}

impl Weights {
    fn new(metric: DistanceMetric, mask: MaskSize) -> Self {
        match (metric, mask) {
            (DistanceMetric::L1, _) => Self { a: 1.0, b: 2.0, c: None },
            (DistanceMetric::Chebyshev, _) => Self { a: 1.0, b: 1.0, c: None },
            (DistanceMetric::L2, MaskSize::Three) => Self {
                a: 0.955,
                b: 1.3693,
                c: None,
            },
            (DistanceMetric::L2, MaskSize::Five) => Self {
                a: 1.0,
                b: 1.4,
                c: Some(2.1969),
            },
        }
    }

    /// Offsets already visited by a top-left to bottom-right scan.
    fn forward(&self) -> Vec<(isize, isize, f32)> {
        let mut offsets = vec![
            (-1, 0, self.a),
            (-1, -1, self.b),
            (0, -1, self.a),
            (1, -1, self.b),
        ];
        if let Some(c) = self.c {
            offsets.extend([(-1, -2, c), (1, -2, c), (-2, -1, c), (2, -1, c)]);
        }
        offsets
    }
}

pub fn distance_transform(mask: &Mask, metric: DistanceMetric, mask_size: MaskSize) -> DistanceMap {
    let width = mask.width();
    let height = mask.height();
    // Larger than any reachable chamfer distance.
    let far = (width + height) as f32 * 3.0;

    let mut dist = DistanceMap::from_fn(width, height, |x, y| if mask[(x, y)] { far } else { 0.0 });

    let forward = Weights::new(metric, mask_size).forward();
    let backward: Vec<_> = forward.iter().map(|&(dx, dy, w)| (-dx, -dy, w)).collect();

    for y in 0..height {
        for x in 0..width {
            relax(&mut dist, x, y, &forward);
        }
    }
    for y in (0..height).rev() {
        for x in (0..width).rev() {
            relax(&mut dist, x, y, &backward);
        }
    }

    dist
}

fn relax(dist: &mut DistanceMap, x: usize, y: usize, offsets: &[(isize, isize, f32)]) {
    let current = dist[(x, y)];
    if current == 0.0 {
        return;
    }
    let mut best = current;
    for &(dx, dy, w) in offsets {
        if let Some(&d) = dist.get_signed(x as isize + dx, y as isize + dy) {
            best = best.min(d + w);
        }
    }
    dist[(x, y)] = best;
}

/// Min-max normalizes to `[0, 1]` then quantizes to `round(v * 255)`.
/// A constant map quantizes to all zeros.
pub fn normalize_to_u8(map: &DistanceMap) -> GrayImage {
    let (min, max) = map
        .pixels()
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if map.is_empty() || range <= f32::EPSILON {
        return GrayImage::new_filled(map.width(), map.height(), 0);
    }
    map.map(|&v| (((v - min) / range) * 255.0).round().clamp(0.0, 255.0) as u8)
}

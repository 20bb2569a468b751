//! Splitting of touching colonies.
//!
//! Seeds are found inside the opened foreground, labeled from 2 upward and
//! flooded over the color ROI. Basins are then clipped back to the
//! foreground with their shared borders removed, so each basin counts as
//! its own component.
//!
//! Zero seeds are not an error: nothing is flooded and the split mask is
//! empty.

mod flood;
mod seeds;


pub use flood::{Markers, WATERSHED_LINE, watershed};
pub use seeds::{alpha_threshold, distance_seeds, erosion_seeds};

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::common::Mask;
use crate::distance::{DistanceMetric, MaskSize};
use crate::labeling::LabelMap;
use crate::raster::ColorImage;

/// First label handed to a seed; `1` is reserved for background.
pub const FIRST_SEED_LABEL: i32 = 2;

/// How the distance-transform seed gate is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtThreshold {
    /// `alpha` in `[0, 1]` mapped to a level in the 2%..40% band.
    Alpha(f32),
    /// Literal 8-bit level.
    Absolute(u8),
    /// Per-component cut at `max * (0.2 + 0.5 alpha)`.
    RelativePerComponent(f32),
}

impl Default for DtThreshold {
    fn default() -> Self {
        DtThreshold::Alpha(0.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Display, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SeedStrategy {
    Erosion {
        kernel: i32,
        iterations: u32,
    },
    DistanceTransform {
        metric: DistanceMetric,
        mask: MaskSize,
        threshold: DtThreshold,
        peak_cleanup: i32,
    },
    /// Union of erosion seeds and absolute-threshold distance seeds.
    Hybrid {
        kernel: i32,
        iterations: u32,
        metric: DistanceMetric,
        mask: MaskSize,
        threshold: u8,
        peak_cleanup: i32,
    },
}

impl Default for SeedStrategy {
    fn default() -> Self {
        SeedStrategy::Erosion {
            kernel: 5,
            iterations: 2,
        }
    }
}

impl SeedStrategy {
    pub fn seeds(&self, foreground: &Mask) -> Mask {
        match *self {
            SeedStrategy::Erosion { kernel, iterations } => {
                erosion_seeds(foreground, kernel, iterations)
            }
            SeedStrategy::DistanceTransform {
                metric,
                mask,
                threshold,
                peak_cleanup,
            } => distance_seeds(foreground, metric, mask, threshold, peak_cleanup),
            SeedStrategy::Hybrid {
                kernel,
                iterations,
                metric,
                mask,
                threshold,
                peak_cleanup,
            } => {
                let eroded = erosion_seeds(foreground, kernel, iterations);
                let peaks = distance_seeds(
                    foreground,
                    metric,
                    mask,
                    DtThreshold::Absolute(threshold),
                    peak_cleanup,
                );
                eroded.or(&peaks)
            }
        }
    }
}

/// Labels 8-connected seed blobs from [`FIRST_SEED_LABEL`]; other pixels are 0.
pub fn label_markers(seeds: &Mask) -> (Markers, usize) {
    let labels = LabelMap::from_mask(seeds);
    let markers = labels.labels().map(|&l| {
        if l == 0 {
            0
        } else {
            l as i32 + FIRST_SEED_LABEL - 1
        }
    });
    (markers, labels.num_labels())
}

/// Seed basins clipped to `foreground`. Pixels 8-adjacent to a different
/// basin are dropped so neighboring basins stay separate components.
pub fn basins_to_mask(markers: &Markers, foreground: &Mask) -> Mask {
    assert!(markers.same_size(foreground), "markers and mask size mismatch");
    Mask::from_fn(markers.width(), markers.height(), |x, y| {
        let label = markers[(x, y)];
        if label < FIRST_SEED_LABEL || !foreground[(x, y)] {
            return false;
        }
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if let Some(&other) = markers.get_signed(x as isize + dx, y as isize + dy)
                    && other >= FIRST_SEED_LABEL
                    && other != label
                {
                    return false;
                }
            }
        }
        true
    })
}

/// Splits touching blobs of `foreground` over the color ROI `image`.
pub fn split_touching(image: &ColorImage, foreground: &Mask, strategy: &SeedStrategy) -> Mask {
    let seeds = strategy.seeds(foreground);
    let (mut markers, seed_count) = label_markers(&seeds);
    tracing::debug!(%strategy, seed_count, "Watershed seeds");

    if seed_count == 0 {
        return Mask::new_filled(foreground.width(), foreground.height(), false);
    }

    watershed(image, &mut markers);
    basins_to_mask(&markers, foreground)
}

//! Petri dish localization.
//!
//! The dish rim is the strongest closed edge in a typical plate photo, so
//! the dish is taken as the 8-connected Canny edge component with the
//! largest bounding box. Images without any edges fall back to a centered
//! dish touching the shorter side.

mod canny;


pub use canny::{HIGH_THRESHOLD, LOW_THRESHOLD, canny};

use serde::{Deserialize, Serialize};

use crate::common::{Mask, round_half_up};
use crate::labeling::{ComponentStats, LabelMap};
use crate::raster::GrayImage;

/// Dish circle in source image pixels. `radius` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub center_x: usize,
    pub center_y: usize,
    pub radius: usize,
}

impl Dish {
    /// Centered dish used when no edge is found.
    pub fn fallback(width: usize, height: usize) -> Self {
        Self {
            center_x: width / 2,
            center_y: height / 2,
            radius: (width.min(height) / 2).max(1),
        }
    }

    /// Filled disk of the dish over an image of the given size.
    pub fn mask(&self, width: usize, height: usize) -> Mask {
        Mask::circle(
            width,
            height,
            self.center_x as i64,
            self.center_y as i64,
            self.radius as i64,
        )
    }
}

/// Finds the dish in an already blurred gray image. Never fails.
pub fn locate_dish(blurred: &GrayImage) -> Dish {
    let width = blurred.width();
    let height = blurred.height();

    let edges = canny(blurred, LOW_THRESHOLD, HIGH_THRESHOLD);
    let labels = LabelMap::from_mask(&edges);
    // First component wins ties.
    let largest = labels
        .component_stats()
        .into_iter()
        .fold(None, |best: Option<ComponentStats>, c| match best {
            Some(b) if b.bbox.area() >= c.bbox.area() => Some(b),
            _ => Some(c),
        });

    let Some(component) = largest else {
        let dish = Dish::fallback(width, height);
        tracing::debug!(?dish, "No dish edges, using fallback");
        return dish;
    };

    let bbox = component.bbox;
    let center_x = bbox.x as i64 + round_half_up(bbox.width as f64 / 2.0);
    let center_y = bbox.y as i64 + round_half_up(bbox.height as f64 / 2.0);
    let radius = round_half_up(bbox.width.max(bbox.height) as f64 / 2.0).max(1);

    let dish = Dish {
        center_x: center_x.clamp(0, width as i64 - 1) as usize,
        center_y: center_y.clamp(0, height as i64 - 1) as usize,
        radius: radius as usize,
    };
    tracing::debug!(
        edge_components = labels.num_labels(),
        ?bbox,
        ?dish,
        "Dish located"
    );
    dish
}

/// Copy of `gray` with every pixel outside the dish disk set to zero.
pub fn mask_outside_dish(gray: &GrayImage, dish: &Dish) -> GrayImage {
    let inside = dish.mask(gray.width(), gray.height());
    gray.zip_map(&inside, |&v, &keep| if keep { v } else { 0 })
}

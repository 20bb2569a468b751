//! Square crop around the dish.

use crate::common::{Rect, round_half_up};
use crate::dish::Dish;

/// Side margin around the dish diameter.
const ROI_MARGIN: f64 = 1.05;

/// Square of side `min(width, height, round(2.1 * radius))` centered on the
/// dish, clipped to the image. The result always fits inside the image.
pub fn roi_rect(dish: &Dish, width: usize, height: usize) -> Rect {
    let diameter = round_half_up(dish.radius as f64 * 2.0 * ROI_MARGIN).max(0) as usize;
    let size = diameter.min(width).min(height);
    let half = size as f64 / 2.0;

    let x = round_half_up(dish.center_x as f64 - half).max(0) as usize;
    let y = round_half_up(dish.center_y as f64 - half).max(0) as usize;
    let x = x.min(width);
    let y = y.min(height);

    Rect::new(x, y, size.min(width - x), size.min(height - y))
}

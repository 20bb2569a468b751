//! Canny edge detection on 8-bit gray images.

use crate::common::{Buffer2, Mask};
use crate::raster::GrayImage;

pub const LOW_THRESHOLD: i32 = 50;
pub const HIGH_THRESHOLD: i32 = 150;

// tan(22.5°) and tan(67.5°) in 15-bit fixed point.
const TAN_22_5: i64 = 13573;
const TAN_67_5: i64 = 79109;
const SHIFT: u32 = 15;

/// Edge mask using Sobel 3x3 gradients and L1 magnitude.
pub fn canny(gray: &GrayImage, low: i32, high: i32) -> Mask {
    let width = gray.width();
    let height = gray.height();
    if width == 0 || height == 0 {
        return Mask::new_filled(width, height, false);
    }

    let (gx, gy) = sobel(gray);
    let magnitude = gx.zip_map(&gy, |&dx, &dy| dx.abs() + dy.abs());
    let mag_at = |x: isize, y: isize| magnitude.get_signed(x, y).copied().unwrap_or(0);

    // 0 = suppressed, 1 = weak, 2 = strong
    let mut state = Buffer2::new_filled(width, height, 0u8);
    let mut stack = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let m = magnitude[(x, y)];
            if m <= low {
                continue;
            }
            let dx = gx[(x, y)] as i64;
            let dy = gy[(x, y)] as i64;
            let ax = dx.abs();
            let ay = dy.abs() << SHIFT;
            let (xi, yi) = (x as isize, y as isize);

            let is_max = if ay < ax * TAN_22_5 {
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else if ay > ax * TAN_67_5 {
                m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
            } else {
                let s: isize = if (dx < 0) != (dy < 0) { -1 } else { 1 };
                m > mag_at(xi - s, yi - 1) && m > mag_at(xi + s, yi + 1)
            };
            if !is_max {
                continue;
            }

            if m > high {
                state[(x, y)] = 2;
                stack.push((x, y));
            } else {
                state[(x, y)] = 1;
            }
        }
    }

    // Hysteresis: grow strong edges through 8-connected weak pixels.
    while let Some((x, y)) = stack.pop() {
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if state.get_signed(nx, ny) == Some(&1) {
                    let (nx, ny) = (nx as usize, ny as usize);
                    state[(nx, ny)] = 2;
                    stack.push((nx, ny));
                }
            }
        }
    }

    state.map(|&s| s == 2)
}

/// Sobel derivatives with a replicated border.
fn sobel(gray: &GrayImage) -> (Buffer2<i32>, Buffer2<i32>) {
    let width = gray.width() as isize;
    let height = gray.height() as isize;
    let at = |x: isize, y: isize| gray[(x.clamp(0, width - 1) as usize, y.clamp(0, height - 1) as usize)] as i32;

    let gx = Buffer2::from_fn(gray.width(), gray.height(), |x, y| {
        let (x, y) = (x as isize, y as isize);
        (at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1))
            - (at(x - 1, y - 1) + 2 * at(x - 1, y) + at(x - 1, y + 1))
    });
    let gy = Buffer2::from_fn(gray.width(), gray.height(), |x, y| {
        let (x, y) = (x as isize, y as isize);
        (at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1))
            - (at(x - 1, y - 1) + 2 * at(x, y - 1) + at(x + 1, y - 1))
    });
    (gx, gy)
}

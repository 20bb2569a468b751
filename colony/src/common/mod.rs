//! Common pixel containers and small numeric helpers.

mod buffer2;

#[cfg(test)]
mod tests;

pub use buffer2::{Buffer2, Mask};

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn fits_inside(&self, width: usize, height: usize) -> bool {
        self.x + self.width <= width && self.y + self.height <= height
    }
}

/// Rounds half-way cases towards positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
#[inline]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Forces `n` odd by setting the low bit: even values move up by one,
/// odd values are kept. Negative inputs keep the same law (`-2 -> -1`).
#[inline]
pub fn ensure_odd(n: i32) -> i32 {
    n | 1
}

/// Odd kernel size of at least `min` (`min` itself must be odd and positive).
#[inline]
pub fn kernel_size(n: i32, min: i32) -> usize {
    debug_assert!(min > 0 && min % 2 == 1, "kernel minimum must be odd, got {}", min);
    ensure_odd(n).max(min) as usize
}

//! Marker-driven watershed flooding on a color image.
//!
//! Priority-flood with 256 FIFO queues keyed by the largest per-channel
//! difference between neighboring pixels, 4-connected. Labels must be
//! positive; `0` marks pixels still to be flooded. On return every pixel
//! holds a basin label or [`WATERSHED_LINE`], and the 1-pixel image frame
//! is always a line.

use std::collections::VecDeque;

use crate::common::Buffer2;
use crate::raster::ColorImage;

pub const WATERSHED_LINE: i32 = -1;
const IN_QUEUE: i32 = -2;
const LEVELS: usize = 256;

pub type Markers = Buffer2<i32>;

#[inline]
fn color_diff(a: [u8; 3], b: [u8; 3]) -> usize {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| x.abs_diff(y))
        .max()
        .unwrap_or(0) as usize
}

struct PriorityQueues {
    queues: Vec<VecDeque<usize>>,
    active: usize,
}

impl PriorityQueues {
    fn new() -> Self {
        Self {
            queues: (0..LEVELS).map(|_| VecDeque::new()).collect(),
            active: 0,
        }
    }

    fn push(&mut self, level: usize, idx: usize) {
        self.queues[level].push_back(idx);
        self.active = self.active.min(level);
    }

    fn pop(&mut self) -> Option<usize> {
        while self.active < LEVELS {
            if let Some(idx) = self.queues[self.active].pop_front() {
                return Some(idx);
            }
            self.active += 1;
        }
        None
    }
}

/// Floods `markers` in place over `image`.
pub fn watershed(image: &ColorImage, markers: &mut Markers) {
    assert!(image.same_size(markers), "image and markers must have the same size");
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return;
    }

    for x in 0..width {
        markers[(x, 0)] = WATERSHED_LINE;
        markers[(x, height - 1)] = WATERSHED_LINE;
    }
    for y in 0..height {
        markers[(0, y)] = WATERSHED_LINE;
        markers[(width - 1, y)] = WATERSHED_LINE;
    }
    if width < 3 || height < 3 {
        return;
    }

    let pixels = image.pixels();
    let neighbors = |idx: usize| [idx - 1, idx + 1, idx - width, idx + width];
    let mut queues = PriorityQueues::new();

    // Seed the queues with unlabeled pixels bordering a marker.
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = y * width + x;
            if markers[idx] < 0 {
                markers[idx] = 0;
            }
            if markers[idx] != 0 {
                continue;
            }
            let level = neighbors(idx)
                .into_iter()
                .filter(|&n| markers[n] > 0)
                .map(|n| color_diff(pixels[idx], pixels[n]))
                .min();
            if let Some(level) = level {
                queues.push(level, idx);
                markers[idx] = IN_QUEUE;
            }
        }
    }

    while let Some(idx) = queues.pop() {
        let mut label = 0;
        for n in neighbors(idx) {
            let t = markers[n];
            if t > 0 {
                if label == 0 {
                    label = t;
                } else if t != label {
                    label = WATERSHED_LINE;
                }
            }
        }
        debug_assert!(label != 0, "queued pixel without a labeled neighbor");
        markers[idx] = label;
        if label == WATERSHED_LINE {
            continue;
        }

        for n in neighbors(idx) {
            if markers[n] == 0 {
                queues.push(color_diff(pixels[idx], pixels[n]), n);
                markers[n] = IN_QUEUE;
            }
        }
    }
}

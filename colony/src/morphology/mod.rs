//! Binary and gray-level morphology with small structuring elements.
//!
//! Pixels outside the image never influence the result: erosion treats
//! them as set, dilation as unset.

#[cfg(test)]
mod tests;

use crate::common::{Buffer2, Mask, kernel_size};
use crate::raster::GrayImage;

/// Structuring element stored as offsets from its center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    size: usize,
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// Elliptical element inscribed in a `size x size` square.
    ///
    /// Row half-widths are `round(c * sqrt(1 - dy² / r²))`, which yields a
    /// cross for size 3 and a rounded square for size 5.
    pub fn ellipse(size: usize) -> Self {
        assert!(size % 2 == 1, "structuring element size must be odd, got {}", size);
        let r = (size / 2) as isize;
        let c = r;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        let mut offsets = Vec::new();
        for dy in -r..=r {
            let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as isize;
            for x in -dx..=dx {
                offsets.push((x, dy));
            }
        }
        Self { size, offsets }
    }

    pub fn rect(size: usize) -> Self {
        assert!(size % 2 == 1, "structuring element size must be odd, got {}", size);
        let r = (size / 2) as isize;
        let offsets = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .collect();
        Self { size, offsets }
    }

    /// Ellipse from a user-facing size, forced odd and at least 1.
    pub fn ellipse_from_setting(size: i32) -> Self {
        Self::ellipse(kernel_size(size, 1))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    pub fn is_identity(&self) -> bool {
        self.size <= 1
    }
}

fn morph_binary(mask: &Mask, element: &StructuringElement, erode: bool) -> Mask {
    if element.is_identity() {
        return mask.clone();
    }
    Mask::from_fn(mask.width(), mask.height(), |x, y| {
        let hit = |&(dx, dy): &(isize, isize)| {
            mask.get_signed(x as isize + dx, y as isize + dy)
                .copied()
                .unwrap_or(erode)
        };
        if erode {
            element.offsets().iter().all(hit)
        } else {
            element.offsets().iter().any(hit)
        }
    })
}

pub fn erode(mask: &Mask, element: &StructuringElement) -> Mask {
    morph_binary(mask, element, true)
}

pub fn dilate(mask: &Mask, element: &StructuringElement) -> Mask {
    morph_binary(mask, element, false)
}

/// Erodes `iterations` times with the same element.
pub fn erode_n(mask: &Mask, element: &StructuringElement, iterations: u32) -> Mask {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = erode(&out, element);
    }
    out
}

/// Opening: erosion followed by dilation.
pub fn open(mask: &Mask, element: &StructuringElement) -> Mask {
    dilate(&erode(mask, element), element)
}

/// Gray-level dilation (neighborhood maximum).
pub fn dilate_gray(image: &GrayImage, element: &StructuringElement) -> GrayImage {
    Buffer2::from_fn(image.width(), image.height(), |x, y| {
        element
            .offsets()
            .iter()
            .filter_map(|&(dx, dy)| image.get_signed(x as isize + dx, y as isize + dy))
            .copied()
            .max()
            .unwrap_or(0)
    })
}

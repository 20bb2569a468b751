//! Color raster type and the color-space conversions the pipeline needs.
//!
//! All conversions follow 8-bit conventions: gray uses the fixed-point
//! BT.601 luma weights, HSV packs hue into `[0, 180)` so it fits a byte.


use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};

use crate::common::Buffer2;
use crate::error::ImageLoadError;

/// Hue axis length in 8-bit HSV (degrees / 2).
pub const HUE_RANGE: u8 = 180;

/// RGB source image.
pub type ColorImage = Buffer2<[u8; 3]>;

/// Single-channel 8-bit image.
pub type GrayImage = Buffer2<u8>;

/// Pixel in 8-bit HSV: `h` in `[0, 180)`, `s` and `v` in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

pub type HsvImage = Buffer2<Hsv>;

impl ColorImage {
    /// Decodes any format the `image` crate understands.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageLoadError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| ImageLoadError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(ImageLoadError::Empty {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "Loaded image"
        );
        Ok(Self::from_dynamic(&decoded))
    }

    /// Converts a decoded image, dropping any alpha channel.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::from_rgb(&image.to_rgb8())
    }

    pub fn from_rgb(image: &RgbImage) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let pixels = image.pixels().map(|p| p.0).collect();
        Buffer2::new(width, height, pixels)
    }

    /// Gray image replicated into three channels.
    pub fn from_gray(gray: &GrayImage) -> Self {
        gray.map(|&v| [v, v, v])
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            Rgb(*self.get(x as usize, y as usize))
        })
    }

    pub fn to_gray(&self) -> GrayImage {
        self.map(|&rgb| luma(rgb))
    }

    pub fn to_hsv(&self) -> HsvImage {
        self.map(|&rgb| rgb_to_hsv(rgb))
    }
}

/// BT.601 luma with 14-bit fixed-point weights (0.299, 0.587, 0.114).
#[inline]
pub fn luma([r, g, b]: [u8; 3]) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    ((r as u32 * R + g as u32 * G + b as u32 * B + (1 << 13)) >> 14) as u8
}

pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let h_deg = if diff == 0.0 {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / diff
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };

    let mut h = (h_deg / 2.0).round() as u32;
    if h >= HUE_RANGE as u32 {
        h -= HUE_RANGE as u32;
    }

    Hsv {
        h: h as u8,
        s: s.round().min(255.0) as u8,
        v: v as u8,
    }
}

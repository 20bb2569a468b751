//! Separable smoothing filters on 8-bit gray images.
//!
//! Gaussian kernels up to size 7 use the classic binomial tables; larger
//! kernels derive sigma from the size as `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.


use crate::raster::GrayImage;

/// How samples outside the image are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    /// `gfedcb|abcdefgh|gfedcba`
    #[default]
    Reflect101,
    /// `aaaaaa|abcdefgh|hhhhhhh`
    Replicate,
}

impl Border {
    #[inline]
    fn resolve(self, i: isize, len: usize) -> usize {
        let n = len as isize;
        if (0..n).contains(&i) {
            return i as usize;
        }
        match self {
            Border::Replicate => i.clamp(0, n - 1) as usize,
            Border::Reflect101 => {
                if n == 1 {
                    return 0;
                }
                let period = 2 * (n - 1);
                let mut j = i.rem_euclid(period);
                if j >= n {
                    j = period - j;
                }
                j as usize
            }
        }
    }
}

/// Normalized 1-D Gaussian kernel of odd `size`.
pub fn gaussian_kernel(size: usize) -> Vec<f32> {
    assert!(size % 2 == 1, "gaussian kernel size must be odd, got {}", size);

    match size {
        1 => return vec![1.0],
        3 => return vec![0.25, 0.5, 0.25],
        5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => {
            return vec![
                0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
            ];
        }
        _ => {}
    }

    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let scale = -0.5 / (sigma * sigma);
    let center = (size / 2) as f64;
    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Gaussian blur with an odd square kernel; size 1 returns a copy.
pub fn gaussian_blur(image: &GrayImage, size: usize, border: Border) -> GrayImage {
    if size <= 1 {
        return image.clone();
    }
    let kernel = gaussian_kernel(size);
    convolve_separable(image, &kernel, border)
}

/// Mean over a `size x size` window.
pub fn box_mean(image: &GrayImage, size: usize, border: Border) -> GrayImage {
    assert!(size % 2 == 1, "box size must be odd, got {}", size);
    let kernel = vec![1.0 / size as f32; size];
    convolve_separable(image, &kernel, border)
}

fn convolve_separable(image: &GrayImage, kernel: &[f32], border: Border) -> GrayImage {
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return image.clone();
    }
    let radius = (kernel.len() / 2) as isize;

    // Horizontal pass keeps full precision for the vertical pass.
    let mut horizontal = vec![0.0f32; width * height];
    for y in 0..height {
        let row = image.row(y);
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = border.resolve(x as isize + k as isize - radius, width);
                acc += w * row[sx] as f32;
            }
            horizontal[y * width + x] = acc;
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        let mut acc = 0.0f32;
        for (k, &w) in kernel.iter().enumerate() {
            let sy = border.resolve(y as isize + k as isize - radius, height);
            acc += w * horizontal[sy * width + x];
        }
        acc.round().clamp(0.0, 255.0) as u8
    })
}

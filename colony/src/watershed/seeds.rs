//! Seed masks for the watershed.

use crate::common::{Mask, kernel_size};
use crate::distance::{DistanceMetric, MaskSize, distance_transform, normalize_to_u8};
use crate::labeling::LabelMap;
use crate::morphology::{StructuringElement, dilate_gray, erode_n, open};

use super::DtThreshold;

/// Repeated erosion followed by a 3x3 elliptical opening.
pub fn erosion_seeds(foreground: &Mask, kernel: i32, iterations: u32) -> Mask {
    let element = StructuringElement::ellipse_from_setting(kernel);
    let eroded = erode_n(foreground, &element, iterations);
    open(&eroded, &StructuringElement::ellipse(3))
}

/// 8-bit threshold for the alpha-relative cut, `round((0.02 + 0.38 alpha) * 255)`.
pub fn alpha_threshold(alpha: f32) -> u8 {
    let level = ((0.02 + alpha as f64 * 0.38) * 255.0).round();
    level.clamp(0.0, 255.0) as u8
}

/// Regional maxima of the normalized distance map gated by `threshold`.
pub fn distance_seeds(
    foreground: &Mask,
    metric: DistanceMetric,
    mask_size: MaskSize,
    threshold: DtThreshold,
    peak_cleanup: i32,
) -> Mask {
    let dist = distance_transform(foreground, metric, mask_size);
    let quantized = normalize_to_u8(&dist);
    let dilated = dilate_gray(&quantized, &StructuringElement::rect(3));
    let maxima = quantized.zip_map(&dilated, |&v, &d| v == d);

    let gate = match threshold {
        DtThreshold::Absolute(level) => quantized.map(|&v| v > level),
        DtThreshold::Alpha(alpha) => {
            let level = alpha_threshold(alpha);
            quantized.map(|&v| v > level)
        }
        DtThreshold::RelativePerComponent(alpha) => {
            let labels = LabelMap::from_mask(foreground);
            let mut component_max = vec![0.0f32; labels.num_labels() + 1];
            for (&label, &d) in labels.labels().pixels().iter().zip(dist.pixels()) {
                let slot = &mut component_max[label as usize];
                *slot = slot.max(d);
            }
            let ratio = 0.2 + alpha * 0.5;
            labels.labels().zip_map(&dist, |&label, &d| {
                label != 0 && d >= component_max[label as usize] * ratio
            })
        }
    };

    let peaks = maxima.and(&gate);
    let cleanup = kernel_size(peak_cleanup, 1);
    if cleanup >= 3 {
        open(&peaks, &StructuringElement::ellipse(cleanup))
    } else {
        peaks
    }
}

//! The full counting pass: blur, dish, ROI, binarize, open, optional
//! split, count.
//!
//! [`process_image`] is pure: it validates the config, recomputes every
//! stage from the source image and only returns a result once all stages
//! have succeeded.


use serde::{Serialize, Serializer};

use crate::color::{ClassCounts, filter_consistent};
use crate::common::{Mask, Rect, kernel_size};
use crate::config::PipelineConfig;
use crate::counting::{InnerCircle, Region, count_regions, label_regions};
use crate::dish::{Dish, locate_dish, mask_outside_dish};
use crate::error::Result;
use crate::filter::{Border, gaussian_blur};
use crate::morphology::{StructuringElement, open};
use crate::raster::{ColorImage, GrayImage};
use crate::roi::roi_rect;
use crate::threshold::binarize;
use crate::watershed::split_touching;

/// Stage outputs that depend only on the blur size: the dish, the ROI and
/// the dish-masked gray ROI.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub dish: Dish,
    pub roi: Rect,
    /// Blurred gray ROI with everything outside the dish zeroed.
    pub gray: GrayImage,
    /// Unblurred color ROI.
    pub color: ColorImage,
}

impl PreparedImage {
    pub fn new(image: &ColorImage, blur_size: i32) -> Self {
        let blurred = gaussian_blur(&image.to_gray(), kernel_size(blur_size, 1), Border::Reflect101);
        let dish = locate_dish(&blurred);
        let roi = roi_rect(&dish, image.width(), image.height());
        let gray = mask_outside_dish(&blurred, &dish).crop(roi);
        let color = image.crop(roi);
        tracing::debug!(?dish, ?roi, "Prepared image");
        Self {
            dish,
            roi,
            gray,
            color,
        }
    }

    pub fn inner_circle(&self, radius_percent: f32) -> InnerCircle {
        InnerCircle::new(&self.dish, self.roi, radius_percent)
    }

    /// Binarized and opened ROI mask.
    pub fn foreground(&self, config: &PipelineConfig) -> (Mask, Mask) {
        let binary = binarize(&self.gray, &config.binarization);
        let opened = open(
            &binary,
            &StructuringElement::ellipse_from_setting(config.morph_size),
        );
        (binary, opened)
    }
}

/// Intermediate masks, all in ROI coordinates.
#[derive(Debug, Clone)]
pub struct StageMasks {
    pub binary: Mask,
    pub opened: Mask,
    /// Pixels that went into component labeling.
    pub counted: Mask,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub count: usize,
    /// Every counted colony, in source image coordinates.
    pub regions: Vec<Region>,
    /// Per-class regions when color splitting is on. Serialized as the
    /// per-class counts.
    #[serde(
        rename = "class_counts",
        serialize_with = "serialize_class_counts",
        skip_serializing_if = "Option::is_none"
    )]
    pub classes: Option<ClassCounts>,
    pub dish: Dish,
    pub roi: Rect,
    /// Counting circle in source image coordinates.
    pub inner_circle: InnerCircle,
    #[serde(skip)]
    pub masks: StageMasks,
}

impl ProcessResult {
    pub fn count_a(&self) -> Option<usize> {
        self.classes.as_ref().map(|c| c.regions_a.len())
    }

    pub fn count_b(&self) -> Option<usize> {
        self.classes.as_ref().map(|c| c.regions_b.len())
    }
}

#[derive(Serialize)]
struct ClassTotals {
    count_a: usize,
    count_b: usize,
}

fn serialize_class_counts<S: Serializer>(
    classes: &Option<ClassCounts>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    classes
        .as_ref()
        .map(|c| ClassTotals {
            count_a: c.regions_a.len(),
            count_b: c.regions_b.len(),
        })
        .serialize(serializer)
}

pub fn process_image(config: &PipelineConfig, image: &ColorImage) -> Result<ProcessResult> {
    config.validate()?;
    let prepared = PreparedImage::new(image, config.blur_size);
    Ok(process_prepared(config, &prepared))
}

/// Runs the stages after blur and dish detection; `prepared` must come from
/// the same blur size as `config`.
pub fn process_prepared(config: &PipelineConfig, prepared: &PreparedImage) -> ProcessResult {
    let (binary, opened) = prepared.foreground(config);
    let roi = prepared.roi;
    let inner = prepared.inner_circle(config.effective_radius_pct);
    let inner_mask = inner.mask(roi.width, roi.height);
    let min_area = config.min_area.pixels();

    let (counted, regions, classes) = match &config.color_split {
        Some(split) => {
            let hsv = prepared.color.to_hsv();
            let seeds_a = split.class_a.seeds(&hsv, &inner_mask);
            let seeds_b = split.class_b.seeds(&hsv, &inner_mask);
            let classes = ClassCounts {
                regions_a: translate(count_regions(&seeds_a, min_area), roi),
                regions_b: translate(count_regions(&seeds_b, min_area), roi),
            };
            let regions = classes
                .regions_a
                .iter()
                .chain(&classes.regions_b)
                .copied()
                .collect();
            (seeds_a.or(&seeds_b), regions, Some(classes))
        }
        None => {
            let to_label = match &config.watershed {
                Some(strategy) => split_touching(&prepared.color, &opened, strategy),
                None => opened.clone(),
            };
            let counted = to_label.and(&inner_mask);
            let (labels, mut regions) = label_regions(&counted, min_area);
            if let Some(consistency) = &config.color_consistency {
                regions = filter_consistent(&prepared.color, &labels, regions, consistency);
            }
            (counted, translate(regions, roi), None)
        }
    };

    let count = regions.len();
    tracing::debug!(
        count,
        foreground = opened.count_set(),
        min_area,
        "Counted colonies"
    );

    ProcessResult {
        count,
        regions,
        classes,
        dish: prepared.dish,
        roi,
        inner_circle: InnerCircle {
            center_x: inner.center_x + roi.x as i64,
            center_y: inner.center_y + roi.y as i64,
            radius: inner.radius,
        },
        masks: StageMasks {
            binary,
            opened,
            counted,
        },
    }
}

fn translate(regions: Vec<Region>, roi: Rect) -> Vec<Region> {
    regions
        .into_iter()
        .map(|r| r.translated(roi.x, roi.y))
        .collect()
}

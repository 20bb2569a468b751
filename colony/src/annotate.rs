//! Annotated output images: colony markers, the dish and the counting circle.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;

use crate::config::PipelineConfig;
use crate::counting::Region;
use crate::pipeline::ProcessResult;
use crate::raster::ColorImage;

pub mod colors {
    use image::Rgb;

    pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
    pub const ORANGE: Rgb<u8> = Rgb([255, 128, 0]);
    pub const CYAN: Rgb<u8> = Rgb([0, 255, 255]);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationStyle {
    pub marker_radius: i32,
    pub marker_thickness: i32,
    /// Marker color for single-channel counts.
    pub marker_color: Rgb<u8>,
    /// Per-class marker colors when color split is on.
    pub class_colors: Option<(Rgb<u8>, Rgb<u8>)>,
    pub dish_color: Rgb<u8>,
    pub dish_thickness: i32,
    pub inner_color: Rgb<u8>,
    pub inner_thickness: i32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            marker_radius: 5,
            marker_thickness: 2,
            marker_color: colors::GREEN,
            class_colors: None,
            dish_color: colors::ORANGE,
            dish_thickness: 3,
            inner_color: colors::CYAN,
            inner_thickness: 1,
        }
    }
}

impl AnnotationStyle {
    /// Default style with the class marker colors of `config`.
    pub fn for_config(config: &PipelineConfig) -> Self {
        Self {
            class_colors: config
                .color_split
                .map(|split| (Rgb(split.class_a.marker_color), Rgb(split.class_b.marker_color))),
            ..Self::default()
        }
    }
}

/// Draws the result over a copy of the source image.
pub fn annotate(image: &ColorImage, result: &ProcessResult, style: &AnnotationStyle) -> RgbImage {
    let mut canvas = image.to_rgb_image();

    match (&result.classes, style.class_colors) {
        (Some(classes), Some((color_a, color_b))) => {
            draw_markers(&mut canvas, &classes.regions_a, color_a, style);
            draw_markers(&mut canvas, &classes.regions_b, color_b, style);
        }
        _ => draw_markers(&mut canvas, &result.regions, style.marker_color, style),
    }

    let dish = result.dish;
    draw_ring(
        &mut canvas,
        (dish.center_x as i32, dish.center_y as i32),
        dish.radius as i32,
        style.dish_thickness,
        style.dish_color,
    );

    let inner = result.inner_circle;
    draw_ring(
        &mut canvas,
        (inner.center_x as i32, inner.center_y as i32),
        inner.radius as i32,
        style.inner_thickness,
        style.inner_color,
    );

    canvas
}

fn draw_markers(canvas: &mut RgbImage, regions: &[Region], color: Rgb<u8>, style: &AnnotationStyle) {
    for region in regions {
        let cx = region.centroid.0.round() as i32;
        let cy = region.centroid.1.round() as i32;
        draw_ring(canvas, (cx, cy), style.marker_radius.max(1), style.marker_thickness, color);
    }
}

/// Concentric hollow circles centered on `radius`.
fn draw_ring(canvas: &mut RgbImage, center: (i32, i32), radius: i32, thickness: i32, color: Rgb<u8>) {
    let thickness = thickness.max(1);
    let first = radius - thickness / 2;
    for r in first..first + thickness {
        if r >= 0 {
            draw_hollow_circle_mut(canvas, center, r, color);
        }
    }
}

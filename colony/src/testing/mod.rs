//! Synthetic plate images for tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::raster::ColorImage;

pub const PLATE_SIZE: usize = 200;
pub const DISH_RADIUS: i64 = 90;
pub const COLONY_RADIUS: i64 = 8;

pub const OUTSIDE: [u8; 3] = [20, 20, 20];
pub const AGAR: [u8; 3] = [200, 200, 200];
pub const DARK_COLONY: [u8; 3] = [60, 60, 60];
/// Saturated colonies for color separation (hue 0 and hue 120 in 8-bit HSV).
pub const RED_COLONY: [u8; 3] = [150, 20, 20];
pub const BLUE_COLONY: [u8; 3] = [20, 20, 150];

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn fill_disk(image: &mut ColorImage, cx: i64, cy: i64, radius: i64, color: [u8; 3]) {
    for y in 0..image.height() {
        for x in 0..image.width() {
            let dx = x as i64 - cx;
            let dy = y as i64 - cy;
            if dx * dx + dy * dy <= radius * radius {
                image[(x, y)] = color;
            }
        }
    }
}

pub fn fill_rect(image: &mut ColorImage, x0: usize, y0: usize, x1: usize, y1: usize, color: [u8; 3]) {
    for y in y0..y1 {
        for x in x0..x1 {
            image[(x, y)] = color;
        }
    }
}

/// Dark frame with a bright, centered dish of radius 90.
pub fn empty_plate() -> ColorImage {
    let mut image = ColorImage::new_filled(PLATE_SIZE, PLATE_SIZE, OUTSIDE);
    let c = PLATE_SIZE as i64 / 2;
    fill_disk(&mut image, c, c, DISH_RADIUS, AGAR);
    image
}

/// Two well separated dark colonies of about 200 px each.
pub fn two_colony_plate() -> ColorImage {
    let mut image = empty_plate();
    fill_disk(&mut image, 70, 100, COLONY_RADIUS, DARK_COLONY);
    fill_disk(&mut image, 130, 100, COLONY_RADIUS, DARK_COLONY);
    image
}

/// Two colonies joined by a short bar, about 470 px in total.
pub fn dumbbell_plate() -> ColorImage {
    let mut image = empty_plate();
    fill_disk(&mut image, 87, 100, COLONY_RADIUS, DARK_COLONY);
    fill_disk(&mut image, 113, 100, COLONY_RADIUS, DARK_COLONY);
    fill_rect(&mut image, 87, 97, 114, 104, DARK_COLONY);
    image
}

/// One red and one blue colony.
pub fn two_color_plate() -> ColorImage {
    let mut image = empty_plate();
    fill_disk(&mut image, 70, 100, COLONY_RADIUS, RED_COLONY);
    fill_disk(&mut image, 130, 100, COLONY_RADIUS, BLUE_COLONY);
    image
}

pub fn noise_image(width: usize, height: usize, seed: u64) -> ColorImage {
    let mut rng = StdRng::seed_from_u64(seed);
    ColorImage::from_fn(width, height, |_, _| {
        let v: u8 = rng.random();
        [v, v, v]
    })
}

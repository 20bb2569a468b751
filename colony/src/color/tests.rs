use super::*;
use crate::counting::label_regions;
use crate::raster::Hsv;
use crate::testing;

fn class(center: u8, tolerance: u8) -> HueClass {
    HueClass {
        hue_center: center,
        hue_tolerance: tolerance,
        ..HueClass::default()
    }
}

// ============================================================================
// Hue geometry
// ============================================================================

#[test]
fn test_circular_hue_dist() {
    assert_eq!(circular_hue_dist(170, 10), 20);
    assert_eq!(circular_hue_dist(10, 10), 0);
    assert_eq!(circular_hue_dist(0, 90), 90);
    assert_eq!(circular_hue_dist(179, 0), 1);
    for a in (0..180).step_by(7) {
        for b in (0..180).step_by(11) {
            assert_eq!(circular_hue_dist(a, b), circular_hue_dist(b, a));
            assert!(circular_hue_dist(a, b) <= 90);
        }
    }
}

#[test]
fn test_hue_ranges() {
    assert_eq!(class(60, 15).hue_ranges(), vec![(45, 75)]);
    assert_eq!(class(5, 10).hue_ranges(), vec![(0, 15), (175, 179)]);
    assert_eq!(class(175, 10).hue_ranges(), vec![(0, 5), (165, 179)]);
    assert_eq!(class(15, 15).hue_ranges(), vec![(0, 30)]);
}

#[test]
fn test_mask_applies_sat_and_val_floors() {
    let hsv = HsvImage::new(
        4,
        1,
        vec![
            Hsv { h: 2, s: 200, v: 200 },
            Hsv { h: 178, s: 200, v: 200 },
            Hsv { h: 2, s: 10, v: 200 },
            Hsv { h: 2, s: 200, v: 10 },
        ],
    );
    let mask = class(0, 5).mask(&hsv);
    assert_eq!(mask.pixels(), &[true, true, false, false]);
}

// ============================================================================
// Class counting
// ============================================================================

#[test]
fn test_two_color_plate_counts_each_class() {
    let image = testing::two_color_plate();
    let hsv = image.to_hsv();
    let inner = Mask::circle(image.width(), image.height(), 100, 100, 76);
    let config = ColorSplitConfig {
        class_a: class(0, 10),
        class_b: class(120, 10),
    }
    .with_seed_sizes(3, 3);

    let counts = count_classes(&config, &hsv, &inner, 30);
    assert_eq!(counts.regions_a.len(), 1);
    assert_eq!(counts.regions_b.len(), 1);
    assert_eq!(counts.total(), 2);
    assert!((counts.regions_a[0].centroid.0 - 70.0).abs() < 1.0);
    assert!((counts.regions_b[0].centroid.0 - 130.0).abs() < 1.0);
}

#[test]
fn test_overlapping_windows_double_count() {
    let image = testing::two_color_plate();
    let hsv = image.to_hsv();
    let inner = Mask::new_filled(image.width(), image.height(), true);
    let config = ColorSplitConfig {
        class_a: class(0, 10),
        class_b: class(5, 10),
    }
    .with_seed_sizes(1, 1);
    let counts = count_classes(&config, &hsv, &inner, 30);
    assert_eq!(counts.regions_a.len(), 1);
    assert_eq!(counts.regions_b.len(), 1);
}

#[test]
fn test_inner_circle_excludes_outside_colonies() {
    let image = testing::two_color_plate();
    let hsv = image.to_hsv();
    // Covers the red colony at x = 70 only.
    let inner = Mask::circle(image.width(), image.height(), 70, 100, 20);
    let counts = class(120, 10).count(&hsv, &inner, 10);
    assert!(counts.is_empty());
}

// ============================================================================
// Color consistency
// ============================================================================

#[test]
fn test_consistency_drops_the_odd_colony() {
    let mut image = ColorImage::new_filled(60, 20, [200, 200, 200]);
    let mut mask = Mask::new_filled(60, 20, false);
    for (cx, color) in [(8, [60, 60, 60]), (22, [62, 58, 60]), (36, [58, 60, 64]), (50, [220, 30, 30])] {
        testing::fill_disk(&mut image, cx, 10, 4, color);
        mask.fill_circle(cx, 10, 4);
    }
    let (labels, regions) = label_regions(&mask, 1);
    assert_eq!(regions.len(), 4);

    let strict = ColorConsistencyConfig { tolerance: 0.2 };
    let kept = filter_consistent(&image, &labels, regions.clone(), &strict);
    assert_eq!(kept.len(), 3);
    assert!(kept.iter().all(|r| r.centroid.0 < 40.0));

    let loose = ColorConsistencyConfig { tolerance: 1.0 };
    assert_eq!(filter_consistent(&image, &labels, regions, &loose).len(), 4);
}

#[test]
fn test_consistency_keeps_single_region() {
    let image = ColorImage::new_filled(10, 10, [10, 200, 10]);
    let mut mask = Mask::new_filled(10, 10, false);
    mask.fill_circle(5, 5, 2);
    let (labels, regions) = label_regions(&mask, 1);
    let kept = filter_consistent(&image, &labels, regions, &ColorConsistencyConfig { tolerance: 0.0 });
    assert_eq!(kept.len(), 1);
}

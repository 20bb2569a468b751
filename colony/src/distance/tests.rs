use strum::IntoEnumIterator;

use super::*;

fn square_mask(size: usize, margin: usize) -> Mask {
    Mask::from_fn(size, size, |x, y| {
        (margin..size - margin).contains(&x) && (margin..size - margin).contains(&y)
    })
}

#[test]
fn test_background_is_zero() {
    let mask = square_mask(9, 2);
    for metric in DistanceMetric::iter() {
        for mask_size in MaskSize::iter() {
            let dist = distance_transform(&mask, metric, mask_size);
            assert_eq!(dist[(0, 0)], 0.0);
            assert_eq!(dist[(1, 4)], 0.0);
        }
    }
}

#[test]
fn test_l1_and_chebyshev_on_square() {
    // 5x5 block inside a 9x9 image, center is 3 steps from background.
    let mask = square_mask(9, 2);
    let l1 = distance_transform(&mask, DistanceMetric::L1, MaskSize::Three);
    assert_eq!(l1[(4, 4)], 3.0);
    assert_eq!(l1[(2, 2)], 1.0);
    assert_eq!(l1[(3, 3)], 2.0);

    let c = distance_transform(&mask, DistanceMetric::Chebyshev, MaskSize::Three);
    assert_eq!(c[(4, 4)], 3.0);
    assert_eq!(c[(3, 2)], 1.0);
}

#[test]
fn test_l2_weights() {
    let mask = square_mask(9, 2);
    let three = distance_transform(&mask, DistanceMetric::L2, MaskSize::Three);
    assert!((three[(2, 4)] - 0.955).abs() < 1e-5);
    assert!((three[(4, 4)] - 3.0 * 0.955).abs() < 1e-5);

    let five = distance_transform(&mask, DistanceMetric::L2, MaskSize::Five);
    assert!((five[(2, 4)] - 1.0).abs() < 1e-5);
    assert!((five[(4, 4)] - 3.0).abs() < 1e-5);
}

#[test]
fn test_image_border_is_not_background() {
    // Foreground touching the left edge measures distance from the right only.
    let mask = Mask::from_fn(6, 1, |x, _| x < 4);
    let dist = distance_transform(&mask, DistanceMetric::L1, MaskSize::Three);
    assert_eq!(dist[(0, 0)], 4.0);
    assert_eq!(dist[(3, 0)], 1.0);
}

#[test]
fn test_normalize_spans_full_range() {
    let mask = square_mask(9, 2);
    let dist = distance_transform(&mask, DistanceMetric::L1, MaskSize::Three);
    let quantized = normalize_to_u8(&dist);
    assert_eq!(quantized[(0, 0)], 0);
    assert_eq!(quantized[(4, 4)], 255);
    // 1/3 of the peak
    assert_eq!(quantized[(2, 2)], 85);
}

#[test]
fn test_normalize_constant_map_is_zero() {
    let map = DistanceMap::new_filled(4, 4, 2.5);
    assert!(normalize_to_u8(&map).pixels().iter().all(|&v| v == 0));
}

#[test]
fn test_enum_names() {
    assert_eq!(DistanceMetric::Chebyshev.to_string(), "C");
    assert_eq!(MaskSize::Five.to_string(), "5");
    assert_eq!("L1".parse::<DistanceMetric>().unwrap(), DistanceMetric::L1);
    assert_eq!(MaskSize::try_from(3).unwrap(), MaskSize::Three);
    assert!(MaskSize::try_from(7).is_err());
}

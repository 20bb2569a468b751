use super::*;

// =============================================================================
// Odd kernel sizes
// =============================================================================

#[test]
fn test_ensure_odd_examples() {
    assert_eq!(ensure_odd(4), 5);
    assert_eq!(ensure_odd(5), 5);
    assert_eq!(ensure_odd(0), 1);
    assert_eq!(ensure_odd(-2), -1);
}

#[test]
fn test_ensure_odd_is_odd_and_not_smaller() {
    for n in -50..50 {
        let odd = ensure_odd(n);
        assert_eq!(odd.rem_euclid(2), 1, "ensure_odd({}) = {} is even", n, odd);
        assert!(odd >= n, "ensure_odd({}) = {} shrank", n, odd);
    }
}

#[test]
fn test_kernel_size_clamps_non_positive_sizes() {
    assert_eq!(kernel_size(-7, 1), 1);
    assert_eq!(kernel_size(0, 3), 3);
    assert_eq!(kernel_size(2, 3), 3);
    assert_eq!(kernel_size(8, 3), 9);
}

#[test]
fn test_round_half_up() {
    assert_eq!(round_half_up(2.5), 3);
    assert_eq!(round_half_up(2.49), 2);
    assert_eq!(round_half_up(-2.5), -2);
    assert_eq!(round_half_up(94.5), 95);
}

// =============================================================================
// Buffer2 / Mask
// =============================================================================

#[test]
fn test_crop_copies_the_window() {
    let buffer = Buffer2::from_fn(4, 3, |x, y| (y * 10 + x) as u8);
    let cropped = buffer.crop(Rect::new(1, 1, 2, 2));
    assert_eq!(cropped.width(), 2);
    assert_eq!(cropped.height(), 2);
    assert_eq!(cropped.pixels(), &[11, 12, 21, 22]);
}

#[test]
#[should_panic(expected = "exceeds")]
fn test_crop_outside_panics() {
    let buffer = Buffer2::new_filled(4, 4, 0u8);
    let _ = buffer.crop(Rect::new(3, 0, 2, 2));
}

#[test]
fn test_get_signed_outside_is_none() {
    let buffer = Buffer2::new_filled(3, 3, 7u8);
    assert_eq!(buffer.get_signed(-1, 0), None);
    assert_eq!(buffer.get_signed(0, 3), None);
    assert_eq!(buffer.get_signed(2, 2), Some(&7));
}

#[test]
fn test_double_invert_restores_mask() {
    let mask = Mask::from_fn(9, 7, |x, y| (x * 7 + y * 3) % 5 < 2);
    assert_eq!(mask.invert().invert(), mask);
    assert_ne!(mask.invert(), mask);
}

#[test]
fn test_and_or() {
    let a = Mask::new(2, 2, vec![true, true, false, false]);
    let b = Mask::new(2, 2, vec![true, false, true, false]);
    assert_eq!(a.and(&b).pixels(), &[true, false, false, false]);
    assert_eq!(a.or(&b).pixels(), &[true, true, true, false]);
}

#[test]
fn test_circle_area_close_to_pi_r_squared() {
    let mask = Mask::circle(101, 101, 50, 50, 30);
    let expected = std::f64::consts::PI * 30.0 * 30.0;
    let area = mask.count_set() as f64;
    assert!((area - expected).abs() / expected < 0.02, "area {}", area);
    assert!(mask[(50, 20)]);
    assert!(!mask[(50, 19)]);
}

#[test]
fn test_circle_clipped_at_border() {
    let mask = Mask::circle(10, 10, 0, 0, 3);
    assert!(mask[(0, 0)]);
    assert!(mask[(3, 0)]);
    assert!(!mask[(3, 3)]);
}

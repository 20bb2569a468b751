//! Tests for morphology.

use super::*;

fn render(element: &StructuringElement) -> Vec<String> {
    let r = (element.size() / 2) as isize;
    (-r..=r)
        .map(|dy| {
            (-r..=r)
                .map(|dx| {
                    if element.offsets().contains(&(dx, dy)) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_ellipse_shapes() {
    assert_eq!(render(&StructuringElement::ellipse(1)), vec!["#"]);
    assert_eq!(render(&StructuringElement::ellipse(3)), vec![".#.", "###", ".#."]);
    assert_eq!(
        render(&StructuringElement::ellipse(5)),
        vec!["..#..", "#####", "#####", "#####", "..#.."]
    );
}

#[test]
fn test_ellipse_from_setting_clamps() {
    assert_eq!(StructuringElement::ellipse_from_setting(-4).size(), 1);
    assert_eq!(StructuringElement::ellipse_from_setting(4).size(), 5);
}

#[test]
fn test_rect_has_all_offsets() {
    assert_eq!(StructuringElement::rect(3).offsets().len(), 9);
}

#[test]
fn test_open_removes_speckle_and_keeps_square() {
    let mut mask = Mask::new_filled(20, 20, false);
    for y in 5..12 {
        for x in 5..12 {
            mask[(x, y)] = true;
        }
    }
    mask[(16, 16)] = true;

    let opened = open(&mask, &StructuringElement::ellipse(3));
    assert!(!opened[(16, 16)]);
    assert!(opened[(8, 8)]);
    assert!(opened[(6, 6)]);
    // Cross opening rounds the square's corners.
    assert!(!opened[(5, 5)]);
}

#[test]
fn test_open_breaks_thin_bridge() {
    let mut mask = Mask::new_filled(30, 12, false);
    for y in 2..10 {
        for x in 2..10 {
            mask[(x, y)] = true;
            mask[(x + 18, y)] = true;
        }
    }
    for x in 10..20 {
        mask[(x, 6)] = true;
    }
    let opened = open(&mask, &StructuringElement::ellipse(3));
    assert!(!opened[(15, 6)]);
    assert!(opened[(5, 5)]);
    assert!(opened[(24, 5)]);
}

#[test]
fn test_erosion_ignores_outside_pixels() {
    let mask = Mask::new_filled(4, 4, true);
    let eroded = erode(&mask, &StructuringElement::ellipse(3));
    assert_eq!(eroded, mask);
}

#[test]
fn test_erode_n_shrinks_disk() {
    let disk = Mask::circle(41, 41, 20, 20, 10);
    let once = erode_n(&disk, &StructuringElement::ellipse(5), 1);
    let twice = erode_n(&disk, &StructuringElement::ellipse(5), 2);
    assert!(once.count_set() < disk.count_set());
    assert!(twice.count_set() < once.count_set());
    assert!(twice[(20, 20)]);
    assert!(!twice[(20, 12)]);
}

#[test]
fn test_dilate_grows_point_into_element() {
    let mut mask = Mask::new_filled(7, 7, false);
    mask[(3, 3)] = true;
    let element = StructuringElement::ellipse(5);
    let dilated = dilate(&mask, &element);
    assert_eq!(dilated.count_set(), element.offsets().len());
}

#[test]
fn test_dilate_gray_takes_neighborhood_max() {
    let mut image = GrayImage::new_filled(5, 5, 10);
    image[(2, 2)] = 200;
    let dilated = dilate_gray(&image, &StructuringElement::rect(3));
    assert_eq!(dilated[(1, 1)], 200);
    assert_eq!(dilated[(3, 3)], 200);
    assert_eq!(dilated[(0, 0)], 10);
    assert_eq!(dilated[(4, 2)], 10);
}

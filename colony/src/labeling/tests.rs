//! Tests for connected component labeling.

use super::*;

fn mask_from_rows(rows: &[&str]) -> Mask {
    let height = rows.len();
    let width = rows[0].len();
    Mask::from_fn(width, height, |x, y| rows[y].as_bytes()[x] == b'#')
}

#[test]
fn test_empty_mask_has_no_labels() {
    let mask = Mask::new_filled(5, 4, false);
    let labels = LabelMap::from_mask(&mask);
    assert_eq!(labels.num_labels(), 0);
    assert!(labels.component_stats().is_empty());
}

#[test]
fn test_zero_sized_mask() {
    let mask = Mask::new(0, 0, vec![]);
    let labels = LabelMap::from_mask(&mask);
    assert_eq!(labels.num_labels(), 0);
}

#[test]
fn test_diagonal_pixels_are_connected() {
    let mask = mask_from_rows(&[
        "#..", //
        ".#.", //
        "..#",
    ]);
    assert_eq!(LabelMap::from_mask(&mask).num_labels(), 1);

    // A one-column gap keeps diagonal neighbors apart.
    let mask = mask_from_rows(&[
        "#..", //
        "..#",
    ]);
    assert_eq!(LabelMap::from_mask(&mask).num_labels(), 2);
}

#[test]
fn test_u_shape_merges_into_one_component() {
    let mask = mask_from_rows(&[
        "#...#", //
        "#...#", //
        "#...#", //
        "#####",
    ]);
    let labels = LabelMap::from_mask(&mask);
    assert_eq!(labels.num_labels(), 1);
    assert_eq!(labels.labels()[(0, 0)], labels.labels()[(4, 0)]);
}

#[test]
fn test_labels_follow_raster_order() {
    let mask = mask_from_rows(&[
        "...##", //
        ".....", //
        "##...",
    ]);
    let labels = LabelMap::from_mask(&mask);
    assert_eq!(labels.num_labels(), 2);
    assert_eq!(labels.labels()[(3, 0)], 1);
    assert_eq!(labels.labels()[(0, 2)], 2);
    assert_eq!(labels.labels()[(2, 1)], 0);
}

#[test]
fn test_component_stats() {
    let mask = mask_from_rows(&[
        "##....", //
        "##....", //
        "....##", //
        "...###",
    ]);
    let stats = LabelMap::from_mask(&mask).component_stats();
    assert_eq!(stats.len(), 2);

    assert_eq!(stats[0].area, 4);
    assert_eq!(stats[0].bbox, Rect::new(0, 0, 2, 2));
    assert_eq!(stats[0].centroid, (0.5, 0.5));

    assert_eq!(stats[1].label, 2);
    assert_eq!(stats[1].area, 5);
    assert_eq!(stats[1].bbox, Rect::new(3, 2, 3, 2));
    let (cx, cy) = stats[1].centroid;
    assert!((cx - 4.2).abs() < 1e-9);
    assert!((cy - 2.6).abs() < 1e-9);
}

#[test]
fn test_many_merges_keep_sequential_labels() {
    // Comb: separate teeth joined by a bottom bar, plus an isolated dot.
    let mask = mask_from_rows(&[
        "#.#.#.#..#", //
        "#.#.#.#...", //
        "#######...",
    ]);
    let labels = LabelMap::from_mask(&mask);
    assert_eq!(labels.num_labels(), 2);
    let max = labels.labels().pixels().iter().copied().max().unwrap();
    assert_eq!(max, 2);
    assert_eq!(labels.labels()[(9, 0)], 2);
}

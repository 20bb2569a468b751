//! Connected component labeling using run-length encoding and union-find.
//!
//! Each mask row is split into horizontal runs of foreground pixels. Runs
//! overlapping or diagonally touching a run on the previous row are merged
//! through a union-find (8-connectivity); a final flattening pass
//! assigns sequential labels `1..=n` in raster order of each component's
//! first pixel. Background stays `0`.

#[cfg(test)]
mod tests;

use crate::common::{Buffer2, Mask, Rect};

// ============================================================================
// Run-Length Encoding
// ============================================================================

/// A horizontal run of foreground pixels.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: u32, // inclusive
    end: u32,   // exclusive
    label: u32,
}

impl Run {
    /// Window on the previous row that may touch this run, end exclusive.
    #[inline]
    fn search_window(&self) -> (u32, u32) {
        (self.start.saturating_sub(1), self.end + 1)
    }
}

#[inline]
fn runs_connected(prev: &Run, curr: &Run) -> bool {
    prev.start < curr.end + 1 && prev.end + 1 > curr.start
}

fn extract_runs(row: &[bool], runs: &mut Vec<Run>) {
    let mut x = 0;
    while x < row.len() {
        if !row[x] {
            x += 1;
            continue;
        }
        let start = x;
        while x < row.len() && row[x] {
            x += 1;
        }
        runs.push(Run {
            start: start as u32,
            end: x as u32,
            label: 0,
        });
    }
}

/// Merges the current row's runs with overlapping runs of the previous row.
/// Runs without overlap open a new provisional label.
fn merge_runs_with_prev(
    curr_runs: &mut [Run],
    prev_runs: &[Run],
    uf: &mut UnionFind,
) {
    let mut prev_idx = 0;
    for run in curr_runs.iter_mut() {
        let (search_start, search_end) = run.search_window();

        while prev_idx < prev_runs.len() && prev_runs[prev_idx].end <= search_start {
            prev_idx += 1;
        }

        let mut assigned_label = None;
        let mut check_idx = prev_idx;
        while check_idx < prev_runs.len() && prev_runs[check_idx].start < search_end {
            let prev_run = &prev_runs[check_idx];
            if runs_connected(prev_run, run) {
                match assigned_label {
                    Some(label) if label != prev_run.label => uf.union(label, prev_run.label),
                    None => assigned_label = Some(prev_run.label),
                    _ => {}
                }
            }
            check_idx += 1;
        }

        run.label = assigned_label.unwrap_or_else(|| uf.make_set());
    }
}

// ============================================================================
// LabelMap
// ============================================================================

/// Per-component statistics gathered in a single pass over the label map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentStats {
    pub label: u32,
    pub area: usize,
    pub bbox: Rect,
    /// Mean pixel position `(x, y)`.
    pub centroid: (f64, f64),
}

/// A 2-D label map from connected component analysis.
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: Buffer2<u32>,
    num_labels: usize,
}

impl LabelMap {
    /// Labels 8-connected foreground components.
    pub fn from_mask(mask: &Mask) -> Self {
        let width = mask.width();
        let height = mask.height();
        let mut labels = Buffer2::new_filled(width, height, 0u32);

        let mut uf = UnionFind::new();
        let mut prev_runs: Vec<Run> = Vec::with_capacity(width / 4 + 1);
        let mut curr_runs: Vec<Run> = Vec::with_capacity(width / 4 + 1);

        for y in 0..height {
            curr_runs.clear();
            extract_runs(mask.row(y), &mut curr_runs);

            if curr_runs.is_empty() {
                prev_runs.clear();
                continue;
            }

            merge_runs_with_prev(&mut curr_runs, &prev_runs, &mut uf);

            let row_start = y * width;
            for run in &curr_runs {
                for x in run.start..run.end {
                    labels[row_start + x as usize] = run.label;
                }
            }

            std::mem::swap(&mut prev_runs, &mut curr_runs);
        }

        let num_labels = uf.flatten_labels(labels.pixels_mut());
        Self { labels, num_labels }
    }

    #[inline]
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.labels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.labels.height()
    }

    #[inline]
    pub fn labels(&self) -> &Buffer2<u32> {
        &self.labels
    }

    /// Stats for labels `1..=num_labels`, index `i` holds label `i + 1`.
    pub fn component_stats(&self) -> Vec<ComponentStats> {
        struct Acc {
            area: usize,
            sum_x: f64,
            sum_y: f64,
            min_x: usize,
            min_y: usize,
            max_x: usize,
            max_y: usize,
        }

        let mut accs: Vec<Acc> = (0..self.num_labels)
            .map(|_| Acc {
                area: 0,
                sum_x: 0.0,
                sum_y: 0.0,
                min_x: usize::MAX,
                min_y: usize::MAX,
                max_x: 0,
                max_y: 0,
            })
            .collect();

        let width = self.labels.width();
        for (idx, &label) in self.labels.pixels().iter().enumerate() {
            if label == 0 {
                continue;
            }
            let (x, y) = (idx % width, idx / width);
            let acc = &mut accs[(label - 1) as usize];
            acc.area += 1;
            acc.sum_x += x as f64;
            acc.sum_y += y as f64;
            acc.min_x = acc.min_x.min(x);
            acc.min_y = acc.min_y.min(y);
            acc.max_x = acc.max_x.max(x);
            acc.max_y = acc.max_y.max(y);
        }

        accs.iter()
            .enumerate()
            .map(|(i, acc)| ComponentStats {
                label: i as u32 + 1,
                area: acc.area,
                bbox: Rect::new(
                    acc.min_x,
                    acc.min_y,
                    acc.max_x - acc.min_x + 1,
                    acc.max_y - acc.min_y + 1,
                ),
                centroid: (acc.sum_x / acc.area as f64, acc.sum_y / acc.area as f64),
            })
            .collect()
    }
}

// ============================================================================
// Union-Find
// ============================================================================

#[derive(Debug)]
struct UnionFind {
    parent: Vec<u32>,
    next_label: u32,
}

impl UnionFind {
    fn new() -> Self {
        Self {
            parent: Vec::with_capacity(256),
            next_label: 1,
        }
    }

    #[inline]
    fn make_set(&mut self) -> u32 {
        let label = self.next_label;
        self.parent.push(label);
        self.next_label += 1;
        label
    }

    /// Find root with path compression.
    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[(root - 1) as usize] != root {
            root = self.parent[(root - 1) as usize];
        }

        let mut current = label;
        while current != root {
            let next = self.parent[(current - 1) as usize];
            self.parent[(current - 1) as usize] = root;
            current = next;
        }

        root
    }

    #[inline]
    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            let (smaller, larger) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[(larger - 1) as usize] = smaller;
        }
    }

    /// Rewrites provisional labels to sequential `1..=n`; returns `n`.
    fn flatten_labels(&mut self, labels: &mut [u32]) -> usize {
        if self.parent.is_empty() {
            return 0;
        }

        let len = self.parent.len();
        let mut label_map = vec![0u32; len + 1];
        let mut num_labels = 0u32;

        for i in 1..=len as u32 {
            let root = self.find(i);
            if label_map[root as usize] == 0 {
                num_labels += 1;
                label_map[root as usize] = num_labels;
            }
            label_map[i as usize] = label_map[root as usize];
        }

        for l in labels.iter_mut() {
            if *l != 0 {
                *l = label_map[*l as usize];
            }
        }

        num_labels as usize
    }
}

use std::ops::{Index, IndexMut};

use super::Rect;

/// Row-major 2-D pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer2<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Buffer2<T> {
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        debug_assert!(x < self.width && y < self.height);
        &self.pixels[y * self.width + x]
    }

    /// Bounds-checked access with signed coordinates; `None` outside the grid.
    #[inline]
    pub fn get_signed(&self, x: isize, y: isize) -> Option<&T> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(&self.pixels[y as usize * self.width + x as usize])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn same_size<U>(&self, other: &Buffer2<U>) -> bool {
        self.width == other.width() && self.height == other.height()
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Buffer2<U> {
        Buffer2::new(self.width, self.height, self.pixels.iter().map(f).collect())
    }

    /// Combines two equally sized buffers pixel by pixel.
    pub fn zip_map<U, V>(&self, other: &Buffer2<U>, mut f: impl FnMut(&T, &U) -> V) -> Buffer2<V> {
        assert!(self.same_size(other), "buffer size mismatch");
        let pixels = self
            .pixels
            .iter()
            .zip(other.pixels())
            .map(|(a, b)| f(a, b))
            .collect();
        Buffer2::new(self.width, self.height, pixels)
    }
}

impl<T: Clone> Buffer2<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }

    /// Copies the pixels under `rect`, which must lie inside the buffer.
    pub fn crop(&self, rect: Rect) -> Self {
        assert!(
            rect.x + rect.width <= self.width && rect.y + rect.height <= self.height,
            "crop rect {:?} exceeds {}x{}",
            rect,
            self.width,
            self.height
        );
        let mut pixels = Vec::with_capacity(rect.width * rect.height);
        for y in rect.y..rect.y + rect.height {
            let start = y * self.width + rect.x;
            pixels.extend_from_slice(&self.pixels[start..start + rect.width]);
        }
        Self::new(rect.width, rect.height, pixels)
    }
}

impl<T> Index<(usize, usize)> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.pixels[y * self.width + x]
    }
}

impl<T> Index<usize> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.pixels[idx]
    }
}

impl<T> IndexMut<usize> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.pixels[idx]
    }
}

/// Binary image; `true` marks foreground.
pub type Mask = Buffer2<bool>;

impl Buffer2<bool> {
    pub fn count_set(&self) -> usize {
        self.pixels.iter().filter(|&&v| v).count()
    }

    pub fn invert(&self) -> Self {
        self.map(|&v| !v)
    }

    pub fn and(&self, other: &Self) -> Self {
        self.zip_map(other, |&a, &b| a && b)
    }

    pub fn or(&self, other: &Self) -> Self {
        self.zip_map(other, |&a, &b| a || b)
    }

    /// Sets every pixel within `radius` of `(cx, cy)` (filled disk).
    pub fn fill_circle(&mut self, cx: i64, cy: i64, radius: i64) {
        if radius < 0 {
            return;
        }
        let r2 = radius * radius;
        let y0 = (cy - radius).max(0);
        let y1 = (cy + radius).min(self.height as i64 - 1);
        for y in y0..=y1 {
            let dy = y - cy;
            let x0 = (cx - radius).max(0);
            let x1 = (cx + radius).min(self.width as i64 - 1);
            for x in x0..=x1 {
                let dx = x - cx;
                if dx * dx + dy * dy <= r2 {
                    self.pixels[y as usize * self.width + x as usize] = true;
                }
            }
        }
    }

    /// Mask of the given size with a filled disk and nothing else.
    pub fn circle(width: usize, height: usize, cx: i64, cy: i64, radius: i64) -> Self {
        let mut mask = Self::new_filled(width, height, false);
        mask.fill_circle(cx, cy, radius);
        mask
    }
}

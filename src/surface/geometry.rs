//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in CSS pixels (origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BBox {
    /// Create a box from its edges.
    #[inline]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a box from origin and size.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    #[inline]
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Check if a point is inside the box (edges inclusive).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Shift the box by `(-dx, -dy)`.
    #[inline]
    pub fn relative_to(&self, dx: f64, dy: f64) -> BBox {
        BBox::new(self.left - dx, self.top - dy, self.right - dx, self.bottom - dy)
    }

    /// Grow the box vertically by `margin` on both edges.
    #[inline]
    pub fn expand_vertical(&self, margin: f64) -> BBox {
        BBox::new(self.left, self.top - margin, self.right, self.bottom + margin)
    }

    /// Length of the shared vertical span (0 when disjoint).
    #[inline]
    pub fn vertical_overlap(&self, other: &BBox) -> f64 {
        (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0)
    }

    /// Length of the shared horizontal span (0 when disjoint).
    #[inline]
    pub fn horizontal_overlap(&self, other: &BBox) -> f64 {
        (self.right.min(other.right) - self.left.max(other.left)).max(0.0)
    }

    /// Vertical overlap as a fraction of the shorter box's height.
    pub fn vertical_overlap_ratio(&self, other: &BBox) -> f64 {
        let shorter = self.height().min(other.height());
        if shorter <= 0.0 {
            return 0.0;
        }
        self.vertical_overlap(other) / shorter
    }

    /// Horizontal overlap as a fraction of the narrower box's width.
    ///
    /// A zero-width box counts as fully overlapping when it lies within the
    /// other box's horizontal span.
    pub fn horizontal_overlap_ratio(&self, other: &BBox) -> f64 {
        let narrower = self.width().min(other.width());
        if narrower <= 0.0 {
            let (thin, wide) = if self.width() <= other.width() {
                (self, other)
            } else {
                (other, self)
            };
            return if thin.left >= wide.left && thin.left <= wide.right {
                1.0
            } else {
                0.0
            };
        }
        self.horizontal_overlap(other) / narrower
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Horizontal slice `index` of `count` equal slices.
    pub fn horizontal_slice(&self, index: usize, count: usize) -> BBox {
        if count == 0 {
            return *self;
        }
        let step = self.width() / count as f64;
        let left = self.left + step * index as f64;
        BBox::new(left, self.top, left + step, self.bottom)
    }
}

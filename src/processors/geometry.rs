//! Geometric primitives for OCR fragments.
//!
//! Fragment rectangles are axis-aligned and expressed in integer pixel
//! coordinates of the rendered page image. The y axis grows downward, so
//! `top < bottom` for every valid rectangle.

use crate::core::ReflowResult;
use crate::core::validation::validate_rect;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl PixelRect {
    /// Creates a rectangle, rejecting empty or inverted extents.
    ///
    /// # Arguments
    ///
    /// * `left`, `top`, `right`, `bottom` - Edge coordinates.
    ///
    /// # Returns
    ///
    /// A `PixelRect`, or `InvalidInput` when `left >= right` or `top >= bottom`.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> ReflowResult<Self> {
        validate_rect(left, top, right, bottom, "PixelRect")?;
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    #[inline]
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    #[inline]
    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// Area in square pixels.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Horizontal midpoint.
    #[inline]
    pub fn center_x(&self) -> f64 {
        (f64::from(self.left) + f64::from(self.right)) / 2.0
    }

    /// Vertical midpoint.
    #[inline]
    pub fn center_y(&self) -> f64 {
        (f64::from(self.top) + f64::from(self.bottom)) / 2.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x(), self.center_y())
    }

    /// Returns true if `(x, y)` lies strictly inside the rectangle.
    ///
    /// Points on an edge are outside.
    pub fn strictly_contains(&self, x: f64, y: f64) -> bool {
        f64::from(self.left) < x
            && x < f64::from(self.right)
            && f64::from(self.top) < y
            && y < f64::from(self.bottom)
    }
}

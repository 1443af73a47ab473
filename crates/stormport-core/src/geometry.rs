//! Bounding boxes and the diagram-to-canvas coordinate transform.
//!
//! # Coordinate systems
//!
//! Source diagrams position shapes by geometric center in page-length
//! units, with the origin at the page's bottom-left corner and y increasing
//! upward:
//!
//! ```text
//!    +Y
//!     ▲
//!     │
//!     │
//!   (0,0) ────────► +X
//! ```
//!
//! The target canvas uses a top-left origin with y increasing downward, in
//! pixels. [`CanvasSpec::to_target_box`] converts between the two.

use serde::{Deserialize, Serialize};

use crate::shape::FlattenedShape;

/// Default page height in page-length units.
pub const DEFAULT_PAGE_HEIGHT: f64 = 11.70;

/// Default scale factor from page-length units to target pixels.
pub const DEFAULT_PIXELS_PER_UNIT: f64 = 96.0;

/// An axis-aligned box on the target canvas, in pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl BoundingBox {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }
}

/// Fixed properties of the target canvas.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CanvasSpec {
    /// Source page height, used to flip the vertical axis.
    page_height: f64,
    /// Pixels per page-length unit.
    pixels_per_unit: f64,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            page_height: DEFAULT_PAGE_HEIGHT,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
        }
    }
}

impl CanvasSpec {
    pub fn new(page_height: f64, pixels_per_unit: f64) -> Self {
        Self {
            page_height,
            pixels_per_unit,
        }
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    /// Convert a flattened shape's center-based geometry into a target
    /// canvas bounding box.
    ///
    /// The operation order is load-bearing: `right` and `bottom` are formed
    /// by adding the extent to the unscaled corner and then scaling, while
    /// `left` and `top` are scaled afterwards. Diagrams already imported
    /// with this arithmetic depend on it bit-for-bit, so the asymmetry must
    /// not be "simplified".
    pub fn to_target_box(&self, shape: &FlattenedShape) -> BoundingBox {
        // Page-length units until the scaling steps below.
        let mut left = shape.x() - shape.width() / 2.0;
        let mut top = self.page_height - (shape.y() + shape.height() / 2.0);

        let right = (left + shape.width()) * self.pixels_per_unit;
        let bottom = (top + shape.height()) * self.pixels_per_unit;
        left *= self.pixels_per_unit;
        top *= self.pixels_per_unit;

        BoundingBox::new(left, right, top, bottom)
    }
}

#![forbid(unsafe_code)]

//! Geometric primitives in logical pixel space.

use serde::{Deserialize, Serialize};

/// A measured extent in logical pixels.
///
/// Both components are non-negative; constructors clamp negative input
/// to zero rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent in pixels.
    pub width: f64,
    /// Vertical extent in pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size, clamping negative components to zero.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// The zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if either component is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// A point in logical pixel space (origin at top-left, y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Signed change between two measurements. Components may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeDelta {
    pub width: f64,
    pub height: f64,
}

impl SizeDelta {
    /// Whether both components are exactly zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Current and immediately-previous measured size of a region.
///
/// # Invariants
///
/// 1. `last_width`/`last_height` hold the measurement preceding
///    `width`/`height`.
/// 2. All four fields are non-negative.
/// 3. Updated only through [`Dimensions::advance`]; the previous pair is
///    never mutated independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub last_width: f64,
    pub last_height: f64,
}

impl Dimensions {
    /// Dimensions where the given size is both current and previous.
    ///
    /// Used for the mount measurement of a region: a visible region is
    /// immediately comparable (zero diff), while a hidden one measures
    /// `(0, 0)` and stays a baseline until it first shows real extent.
    #[must_use]
    pub fn measured(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            last_width: size.width,
            last_height: size.height,
        }
    }

    /// Current size.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Previous size.
    #[inline]
    #[must_use]
    pub fn last_size(&self) -> Size {
        Size::new(self.last_width, self.last_height)
    }

    /// Shift current to previous and store a new current measurement.
    pub fn advance(&mut self, size: Size) {
        self.last_width = self.width;
        self.last_height = self.height;
        self.width = size.width.max(0.0);
        self.height = size.height.max(0.0);
    }

    /// Signed change from the previous to the current measurement.
    #[must_use]
    pub fn diff(&self) -> SizeDelta {
        SizeDelta {
            width: self.width - self.last_width,
            height: self.height - self.last_height,
        }
    }

    /// Whether the previous measurement was `(0, 0)`.
    ///
    /// A true result means there is no comparable prior size yet: the
    /// current value establishes the baseline and must not be treated
    /// as a change.
    #[inline]
    #[must_use]
    pub fn is_baseline(&self) -> bool {
        self.last_width == 0.0 && self.last_height == 0.0
    }
}

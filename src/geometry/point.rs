//! Points in map and screen space.

/// A point in map (mercator) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PointD {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl PointD {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);
}

/// A single-precision point, used for symbol sizes and screen offsets.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PointF {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl PointF {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

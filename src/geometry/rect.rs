//! RectD: An axis-aligned rectangle in map (mercator) coordinates.

use super::point::PointD;

/// An axis-aligned rectangle defined by its min and max corners.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct RectD {
    /// Minimum X (left edge).
    pub min_x: f64,
    /// Minimum Y (bottom edge).
    pub min_y: f64,
    /// Maximum X (right edge).
    pub max_x: f64,
    /// Maximum Y (top edge).
    pub max_y: f64,
}

impl RectD {
    /// Create a new rectangle. Corners are normalized so that min <= max.
    #[inline]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Create a rectangle from two corner points.
    #[inline]
    pub fn from_points(a: PointD, b: PointD) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Zero-sized rectangle at the origin.
    pub const ZERO: Self = Self {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    };

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> PointD {
        PointD::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Check if a point is inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, point: PointD) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    /// Check if this rectangle intersects with another.
    ///
    /// Rectangles that only share an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }
}

impl std::fmt::Debug for RectD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RectD([{}, {}] - [{}, {}])",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let rect = RectD::new(10.0, 5.0, 0.0, -5.0);
        assert_eq!(rect.min_x, 0.0);
        assert_eq!(rect.max_y, 5.0);
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 10.0);
    }

    #[test]
    fn test_rect_intersects() {
        let a = RectD::new(0.0, 0.0, 10.0, 10.0);
        let b = RectD::new(5.0, 5.0, 15.0, 15.0);
        let c = RectD::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_contains() {
        let rect = RectD::new(0.0, 0.0, 1.0, 1.0);
        assert!(rect.contains(PointD::new(0.5, 0.5)));
        assert!(rect.contains(PointD::new(1.0, 1.0)));
        assert!(!rect.contains(PointD::new(1.5, 0.5)));
        assert_eq!(rect.center(), PointD::new(0.5, 0.5));
    }
}

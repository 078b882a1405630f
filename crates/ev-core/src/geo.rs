//! Planar coordinates.
//!
//! The road map is a flat 2-D plane (screen or projected units), so plain
//! Euclidean distance is exact here; no geodesic correction is applied.

/// A point in the plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Squared Euclidean distance.  Cheaper when only ordering matters.
    #[inline]
    pub fn distance_2(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Hashable key for exact-coordinate lookup.
    ///
    /// `-0.0` is folded into `0.0` so the two spellings of the origin map to
    /// the same waypoint.
    #[inline]
    pub fn bits(self) -> (u64, u64) {
        let norm = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
        (norm(self.x), norm(self.y))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

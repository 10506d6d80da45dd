use serde::{Deserialize, Serialize};

/// A 2d coordinate in destination-canvas space.
///
/// Serialized as a `[x, y]` pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2d {
    /// horizontal coordinate, growing to the right
    pub x: f64,
    /// vertical coordinate, growing downwards
    pub y: f64,
}

impl Point2d {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point2d) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Point2d {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<Point2d> for [f64; 2] {
    fn from(p: Point2d) -> Self {
        [p.x, p.y]
    }
}

/// z component of the cross product of `b - a` and `c - a`.
pub(crate) fn cross(a: &Point2d, b: &Point2d, c: &Point2d) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

use serde::{Deserialize, Serialize};

use crate::{
    error::GeometryError,
    point::{cross, Point2d},
};

/// Relative tolerance for the collinearity test, scaled by the squared extent.
const COLLINEAR_EPS: f64 = 1e-9;

/// Axis-aligned bounds of a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// smallest x coordinate
    pub min_x: f64,
    /// smallest y coordinate
    pub min_y: f64,
    /// largest x coordinate
    pub max_x: f64,
    /// largest y coordinate
    pub max_y: f64,
}

impl Bounds {
    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Four corners in the order top-left, top-right, bottom-right, bottom-left.
///
/// Serialized as `[[x, y], [x, y], [x, y], [x, y]]`.
///
/// # Examples
///
/// ```
/// use lastra_geometry::{Point2d, Quad};
///
/// let quad = Quad::from_rect(10.0, 20.0, 100.0, 50.0);
/// assert_eq!(quad.corners()[2], Point2d::new(110.0, 70.0));
/// assert!(quad.contains(&Point2d::new(50.0, 40.0)));
/// assert!(!quad.contains(&Point2d::new(5.0, 40.0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quad {
    corners: [Point2d; 4],
}

impl Quad {
    /// Create a quadrilateral from its corners (top-left, top-right, bottom-right, bottom-left).
    pub const fn new(corners: [Point2d; 4]) -> Self {
        Self { corners }
    }

    /// The axis-aligned rectangle with top-left corner at `(x, y)`.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new([
            Point2d::new(x, y),
            Point2d::new(x + width, y),
            Point2d::new(x + width, y + height),
            Point2d::new(x, y + height),
        ])
    }

    /// The corners in winding order.
    pub fn corners(&self) -> &[Point2d; 4] {
        &self.corners
    }

    /// Top-left corner.
    pub fn top_left(&self) -> Point2d {
        self.corners[0]
    }

    /// Top-right corner.
    pub fn top_right(&self) -> Point2d {
        self.corners[1]
    }

    /// Bottom-right corner.
    pub fn bottom_right(&self) -> Point2d {
        self.corners[2]
    }

    /// Bottom-left corner.
    pub fn bottom_left(&self) -> Point2d {
        self.corners[3]
    }

    /// The same quadrilateral shifted by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        let mut corners = self.corners;
        for p in corners.iter_mut() {
            p.x += dx;
            p.y += dy;
        }
        Self::new(corners)
    }

    /// Axis-aligned bounds of the four corners.
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in &self.corners {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        b
    }

    /// Signed area (shoelace formula); positive for clockwise corners in y-down space.
    pub fn signed_area(&self) -> f64 {
        let c = &self.corners;
        let mut acc = 0.0;
        for i in 0..4 {
            let (p, q) = (c[i], c[(i + 1) % 4]);
            acc += p.x * q.y - q.x * p.y;
        }
        0.5 * acc
    }

    /// Check the quadrilateral can anchor a homography.
    ///
    /// # Errors
    ///
    /// * [`GeometryError::NonFiniteCorner`] if a coordinate is NaN or infinite.
    /// * [`GeometryError::CollinearCorners`] if any three corners are collinear,
    ///   which includes duplicated corners.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if let Some(i) = self.corners.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::NonFiniteCorner(i));
        }

        let bounds = self.bounds();
        let extent = bounds.width().max(bounds.height());
        let tol = COLLINEAR_EPS * extent * extent;

        const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
        for (a, b, c) in TRIPLES {
            let area = cross(&self.corners[a], &self.corners[b], &self.corners[c]);
            if extent == 0.0 || area.abs() <= tol {
                return Err(GeometryError::CollinearCorners(a, b, c));
            }
        }

        Ok(())
    }

    /// Crossing-number point-in-polygon test.
    ///
    /// Works for convex and concave corner sets; points exactly on the left or
    /// top edge count as inside, points on the right or bottom edge as outside.
    pub fn contains(&self, p: &Point2d) -> bool {
        let c = &self.corners;
        let mut inside = false;
        let mut j = 3;
        for i in 0..4 {
            let (pi, pj) = (c[i], c[j]);
            if (pi.y > p.y) != (pj.y > p.y) {
                let x_cross = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::Quad;
    use crate::{GeometryError, Point2d};

    fn trapezoid() -> Quad {
        Quad::new([
            Point2d::new(386.0, 624.0),
            Point2d::new(1145.0, 624.0),
            Point2d::new(1237.0, 660.0),
            Point2d::new(294.0, 660.0),
        ])
    }

    #[test]
    fn validate_accepts_trapezoid() -> Result<(), GeometryError> {
        trapezoid().validate()
    }

    #[test]
    fn validate_rejects_collinear() {
        let quad = Quad::new([
            Point2d::new(0.0, 0.0),
            Point2d::new(50.0, 0.0),
            Point2d::new(100.0, 0.0),
            Point2d::new(0.0, 100.0),
        ]);
        assert_eq!(
            quad.validate(),
            Err(GeometryError::CollinearCorners(0, 1, 2))
        );
    }

    #[test]
    fn validate_rejects_duplicates_and_nan() {
        let p = Point2d::new(10.0, 10.0);
        let quad = Quad::new([p, p, Point2d::new(20.0, 30.0), Point2d::new(0.0, 30.0)]);
        assert!(matches!(
            quad.validate(),
            Err(GeometryError::CollinearCorners(..))
        ));

        let quad = Quad::new([
            Point2d::new(f64::NAN, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(0.0, 1.0),
        ]);
        assert_eq!(quad.validate(), Err(GeometryError::NonFiniteCorner(0)));
    }

    #[test]
    fn bounds_and_area() {
        let quad = trapezoid();
        let b = quad.bounds();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (294.0, 624.0, 1237.0, 660.0));

        let rect = Quad::from_rect(0.0, 0.0, 4.0, 2.0);
        assert_eq!(rect.signed_area(), 8.0);
    }

    #[test]
    fn contains_edges_and_concave() {
        let rect = Quad::from_rect(0.0, 0.0, 4.0, 4.0);
        assert!(rect.contains(&Point2d::new(0.5, 0.5)));
        assert!(rect.contains(&Point2d::new(3.5, 3.5)));
        assert!(!rect.contains(&Point2d::new(4.5, 0.5)));
        assert!(!rect.contains(&Point2d::new(0.5, -0.5)));

        // arrow head pointing down, notch at (2, 2)
        let concave = Quad::new([
            Point2d::new(0.0, 0.0),
            Point2d::new(2.0, 2.0),
            Point2d::new(4.0, 0.0),
            Point2d::new(2.0, 4.0),
        ]);
        assert!(!concave.contains(&Point2d::new(2.0, 1.0)));
        assert!(concave.contains(&Point2d::new(2.0, 3.0)));
    }

    #[test]
    fn serde_as_pairs() -> Result<(), Box<dyn std::error::Error>> {
        let quad: Quad = serde_json::from_str("[[0, 0], [10, 0], [10, 5], [0, 5]]")?;
        assert_eq!(quad, Quad::from_rect(0.0, 0.0, 10.0, 5.0));
        assert_eq!(serde_json::to_string(&quad)?, "[[0.0,0.0],[10.0,0.0],[10.0,5.0],[0.0,5.0]]");
        Ok(())
    }
}

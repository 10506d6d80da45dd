use faer::prelude::SpSolver;

use crate::{
    error::GeometryError,
    linalg::{self, Mat33},
    point::Point2d,
    quad::Quad,
};

/// Determinant floor after scaling the matrix so its largest entry is one.
const DET_EPS: f64 = 1e-12;

/// A planar projective transform.
///
/// Maps `(x, y, 1)` to `(x', y', w')` with the row-major matrix `m` and projects
/// back with `(x' / w', y' / w')`. Matrices produced by the solver carry
/// `m[2][2] == 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    m: Mat33,
}

impl Default for Homography {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Homography {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Wrap a raw row-major matrix.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotInvertible`] when the matrix is singular or
    /// holds non-finite values.
    pub fn from_matrix(m: Mat33) -> Result<Self, GeometryError> {
        let h = Self { m };
        h.check_invertible()?;
        Ok(h)
    }

    /// Solve the homography mapping four source points onto four destination points.
    ///
    /// The eight unknowns `[a b c d e f g h]` satisfy, for every correspondence
    /// `(x, y) -> (X, Y)`:
    ///
    /// ```text
    /// [x y 1 0 0 0 -x*X -y*X] [a .. h]^T = X
    /// [0 0 0 x y 1 -x*Y -y*Y] [a .. h]^T = Y
    /// ```
    ///
    /// # Errors
    ///
    /// Fails with a [`GeometryError`] when either point set is degenerate or the
    /// system has no unique finite solution.
    pub fn from_correspondences(
        src: &[Point2d; 4],
        dst: &[Point2d; 4],
    ) -> Result<Self, GeometryError> {
        Quad::new(*src).validate()?;
        Quad::new(*dst).validate()?;

        // construct matrix A and vector b
        let mut mat_a = faer::Mat::<f64>::zeros(8, 8);
        let mut vec_b = faer::Mat::<f64>::zeros(8, 1);
        for i in 0..4 {
            let (s, d) = (src[i], dst[i]);
            let (r0, r1) = (2 * i, 2 * i + 1);

            mat_a.write(r0, 0, s.x);
            mat_a.write(r0, 1, s.y);
            mat_a.write(r0, 2, 1.0);
            mat_a.write(r0, 6, -d.x * s.x);
            mat_a.write(r0, 7, -d.x * s.y);
            vec_b.write(r0, 0, d.x);

            mat_a.write(r1, 3, s.x);
            mat_a.write(r1, 4, s.y);
            mat_a.write(r1, 5, 1.0);
            mat_a.write(r1, 6, -d.y * s.x);
            mat_a.write(r1, 7, -d.y * s.y);
            vec_b.write(r1, 0, d.y);
        }

        // solve -> h_mat: 8x1
        let h_mat = mat_a.as_ref().partial_piv_lu().solve(vec_b);
        let h = h_mat.col(0);

        let m = [[h[0], h[1], h[2]], [h[3], h[4], h[5]], [h[6], h[7], 1.0]];
        if m.iter().flatten().any(|v| !v.is_finite()) {
            return Err(GeometryError::SingularSystem);
        }

        let homo = Self { m };
        homo.check_invertible()?;
        Ok(homo)
    }

    /// Homography taking the unit square `(0,0)-(1,1)` onto `quad`.
    ///
    /// # Example
    ///
    /// ```
    /// use lastra_geometry::{Homography, Point2d, Quad};
    ///
    /// let quad = Quad::from_rect(10.0, 20.0, 100.0, 50.0);
    /// let h = Homography::from_unit_square(&quad).unwrap();
    /// let p = h.transform_point(Point2d::new(0.5, 0.5));
    /// assert!((p.x - 60.0).abs() < 1e-9 && (p.y - 45.0).abs() < 1e-9);
    /// ```
    pub fn from_unit_square(quad: &Quad) -> Result<Self, GeometryError> {
        Self::from_rect_to_quad(0.0, 0.0, 1.0, 1.0, quad)
    }

    /// Homography taking the source rectangle `(x, y, width, height)` onto `quad`.
    ///
    /// # Errors
    ///
    /// [`GeometryError::EmptySourceRect`] when the rectangle has no area, otherwise
    /// the errors of [`Homography::from_correspondences`].
    pub fn from_rect_to_quad(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        quad: &Quad,
    ) -> Result<Self, GeometryError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(GeometryError::EmptySourceRect(width, height));
        }
        let src = Quad::from_rect(x, y, width, height);
        Self::from_correspondences(src.corners(), quad.corners())
    }

    /// The underlying row-major matrix.
    pub fn matrix(&self) -> &Mat33 {
        &self.m
    }

    /// Determinant of the matrix.
    pub fn determinant(&self) -> f64 {
        linalg::det_mat33(&self.m)
    }

    fn check_invertible(&self) -> Result<(), GeometryError> {
        let scale = linalg::max_abs_mat33(&self.m);
        let det = self.determinant();
        if !scale.is_finite() || !det.is_finite() || scale == 0.0 {
            return Err(GeometryError::NotInvertible(det));
        }
        if (det / (scale * scale * scale)).abs() < DET_EPS {
            return Err(GeometryError::NotInvertible(det));
        }
        Ok(())
    }

    /// Invert the homography through its adjugate.
    ///
    /// The result is rescaled so that its bottom-right entry is one whenever
    /// that entry is not vanishing.
    pub fn inverse(&self) -> Result<Self, GeometryError> {
        self.check_invertible()?;
        let det = self.determinant();

        let adj = linalg::adjugate_mat33(&self.m);
        let mut inv = [[0.0; 3]; 3];
        for (row_inv, row_adj) in inv.iter_mut().zip(adj.iter()) {
            for (v, a) in row_inv.iter_mut().zip(row_adj.iter()) {
                *v = a / det;
            }
        }

        let scale = linalg::max_abs_mat33(&inv);
        if inv[2][2].abs() > scale * 1e-12 {
            let w = inv[2][2];
            inv.iter_mut().flatten().for_each(|v| *v /= w);
        }

        Ok(Self { m: inv })
    }

    /// Compose two transforms: the result applies `other` first, then `self`.
    pub fn compose(&self, other: &Homography) -> Homography {
        Homography {
            m: linalg::mul_mat33(&self.m, &other.m),
        }
    }

    /// Map a point, returning `None` when it lands on the line at infinity.
    pub fn try_transform_point(&self, p: Point2d) -> Option<Point2d> {
        let [x, y, w] = linalg::mat33_mul_vec3(&self.m, &[p.x, p.y, 1.0]);
        if w.abs() < f64::EPSILON {
            return None;
        }
        Some(Point2d::new(x / w, y / w))
    }

    /// Map a point; points on the line at infinity come back non-finite.
    pub fn transform_point(&self, p: Point2d) -> Point2d {
        let [x, y, w] = linalg::mat33_mul_vec3(&self.m, &[p.x, p.y, 1.0]);
        Point2d::new(x / w, y / w)
    }
}

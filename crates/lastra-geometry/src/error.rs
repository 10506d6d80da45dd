/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A corner coordinate is NaN or infinite.
    #[error("Quadrilateral corner {0} is not finite")]
    NonFiniteCorner(usize),

    /// Three of the four corners lie on a common line (or coincide).
    #[error("Quadrilateral corners {0}, {1} and {2} are collinear")]
    CollinearCorners(usize, usize, usize),

    /// The source rectangle has no area.
    #[error("Source rectangle {0}x{1} has no area")]
    EmptySourceRect(f64, f64),

    /// The 8x8 correspondence system has no unique solution.
    #[error("Point correspondences do not determine a homography")]
    SingularSystem,

    /// The 3x3 matrix cannot be inverted.
    #[error("Homography is not invertible (det = {0:e})")]
    NotInvertible(f64),
}

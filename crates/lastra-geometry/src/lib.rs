#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the geometry module.
pub mod error;

/// 3x3 projective transforms solved from point correspondences.
pub mod homography;

/// small fixed-size linear algebra helpers.
pub mod linalg;

/// 2d points in canvas space.
pub mod point;

/// four-sided polygons with a fixed winding order.
pub mod quad;

pub use crate::error::GeometryError;
pub use crate::homography::Homography;
pub use crate::point::Point2d;
pub use crate::quad::{Bounds, Quad};

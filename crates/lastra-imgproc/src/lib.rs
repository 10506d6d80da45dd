#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// alpha blending of RGBA8 layers.
pub mod composite;

/// image cropping module.
pub mod crop;

/// utilities to draw on images.
pub mod draw;

/// error types for the raster operations.
pub mod error;

/// image flipping module.
pub mod flip;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing images.
pub mod resize;

/// perspective warp of an image into a quadrilateral.
pub mod warp;

pub use error::ImgprocError;

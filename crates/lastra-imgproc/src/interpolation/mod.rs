//! Pixel interpolation methods for image transformations.
//!
//! Sample coordinates are continuous pixel coordinates with texel centres at
//! integer positions, so `(0.0, 0.0)` is the centre of the top-left pixel.
//! Coordinates past the border are clamped to the edge texels.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between the four adjacent pixels

mod bilinear;
mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};

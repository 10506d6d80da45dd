#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for compositing purposes.
pub mod image;

/// rectangular regions in pixel space.
pub mod rect;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize, Rgba8Image};
pub use crate::rect::Rect;

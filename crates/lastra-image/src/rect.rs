use serde::{Deserialize, Serialize};

use crate::{error::ImageError, image::ImageSize};

/// Axis-aligned rectangle in pixel space, anchored at its top-left corner.
///
/// # Examples
///
/// ```
/// use lastra_image::{ImageSize, Rect};
///
/// let rect = Rect::new(10, 20, 30, 40);
/// assert_eq!(rect.right(), 40);
/// assert_eq!(rect.bottom(), 60);
/// assert!(rect.check_within(ImageSize { width: 40, height: 60 }).is_ok());
/// assert!(rect.check_within(ImageSize { width: 39, height: 60 }).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// left edge in pixels
    pub x: usize,
    /// top edge in pixels
    pub y: usize,
    /// width in pixels
    pub width: usize,
    /// height in pixels
    pub height: usize,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle covering an entire image of the given size.
    pub fn from_size(size: ImageSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// The size of the rectangle.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Exclusive right edge, saturating on overflow.
    pub fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating on overflow.
    pub fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    /// Check that the rectangle has a positive extent and lies inside an image.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidRegion`] when the width or height is zero or
    /// when the rectangle crosses the image bounds.
    pub fn check_within(&self, size: ImageSize) -> Result<(), ImageError> {
        let overflows = self.x.checked_add(self.width).is_none()
            || self.y.checked_add(self.height).is_none();
        if self.width == 0
            || self.height == 0
            || overflows
            || self.right() > size.width
            || self.bottom() > size.height
        {
            return Err(ImageError::InvalidRegion {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                image_width: size.width,
                image_height: size.height,
            });
        }
        Ok(())
    }
}

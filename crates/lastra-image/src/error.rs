/// An error type for the image module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the pixel buffer of a size cannot be addressed.
    #[error("Image size {0}x{1} overflows the addressable buffer length")]
    SizeOverflow(usize, usize),

    /// Error when two images are expected to share a size.
    #[error("Image size mismatch: ({0}x{1}) vs expected ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a rectangle has no area or leaves the image.
    #[error("Region {x},{y} {width}x{height} is invalid for a {image_width}x{image_height} image")]
    InvalidRegion {
        /// left edge of the region
        x: usize,
        /// top edge of the region
        y: usize,
        /// width of the region
        width: usize,
        /// height of the region
        height: usize,
        /// width of the image the region was checked against
        image_width: usize,
        /// height of the image the region was checked against
        image_height: usize,
    },

    /// Error when casting pixel data fails.
    #[error("Failed to cast image data")]
    CastError,
}

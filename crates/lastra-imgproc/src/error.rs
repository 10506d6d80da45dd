use lastra_geometry::GeometryError;
use lastra_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the raster operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImgprocError {
    /// Error coming from the image buffers, e.g. an out of bounds region.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The destination quadrilateral cannot anchor a homography.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The execution strategy could not be honoured.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// The operation needs an image with at least one pixel.
    #[error("Image has no pixels ({0}x{1})")]
    EmptyImage(usize, usize),

    /// Two buffers that must share a size do not.
    #[error("Image size mismatch: ({0}x{1}) vs ({2}x{3})")]
    SizeMismatch(usize, usize, usize, usize),
}

impl ImgprocError {
    /// Whether the error stems from a rectangle that is empty or leaves the image.
    pub fn is_invalid_region(&self) -> bool {
        matches!(self, ImgprocError::Image(ImageError::InvalidRegion { .. }))
    }
}

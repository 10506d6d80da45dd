/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// The input holds no bytes.
    #[error("Input buffer is empty")]
    EmptyInput,

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] lastra_image::ImageError),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[source] image::ImageError),

    /// Error to encode the image.
    #[error("Failed to encode the image. {0}")]
    ImageEncodeError(#[source] image::ImageError),

    /// JPEG quality outside 1..=100.
    #[error("Jpeg quality must be in 1..=100, got {0}")]
    InvalidQuality(u8),

    /// The image is larger than the codecs can describe.
    #[error("Image of {0}x{1} pixels is too large to encode")]
    ImageTooLarge(usize, usize),
}

use lastra_image::{ImageSize, Rgba8Image};

use crate::error::IoError;

/// Decode an encoded image (PNG, JPEG or WebP) into a straight-alpha RGBA8 buffer.
///
/// The format is guessed from the content; images without alpha come back opaque.
///
/// # Errors
///
/// [`IoError::EmptyInput`] for an empty buffer and [`IoError::ImageDecodeError`]
/// when the bytes are not a supported image.
pub fn decode_rgba8(bytes: &[u8]) -> Result<Rgba8Image, IoError> {
    if bytes.is_empty() {
        return Err(IoError::EmptyInput);
    }

    let img = image::load_from_memory(bytes).map_err(IoError::ImageDecodeError)?;
    log::debug!(
        "decoded {}x{} image with color type {:?}",
        img.width(),
        img.height(),
        img.color()
    );

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    Ok(Rgba8Image::new(size, img.into_rgba8().into_raw())?)
}

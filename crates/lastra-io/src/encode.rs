use image::{
    codecs::{jpeg::JpegEncoder, png::PngEncoder, webp::WebPEncoder},
    ExtendedColorType, ImageEncoder,
};
use lastra_image::Rgba8Image;
use serde::{Deserialize, Serialize};

use crate::error::IoError;

/// How finished variants are handed back to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "format")]
pub enum OutputEncoding {
    /// Packed RGBA8 pixels, no container.
    #[default]
    Raw,
    /// Lossless PNG with alpha.
    Png,
    /// Baseline JPEG; transparent pixels are flattened onto white.
    Jpeg {
        /// quality in 1..=100
        quality: u8,
    },
    /// Lossless WebP with alpha.
    WebpLossless,
}

impl OutputEncoding {
    /// Media type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputEncoding::Raw => "application/octet-stream",
            OutputEncoding::Png => "image/png",
            OutputEncoding::Jpeg { .. } => "image/jpeg",
            OutputEncoding::WebpLossless => "image/webp",
        }
    }
}

/// Drop alpha by blending every pixel over an opaque white matte.
fn flatten_on_white(image: &Rgba8Image) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.size().area() * 3);
    for px in image.as_slice().chunks_exact(4) {
        let a = u32::from(px[3]);
        for &c in &px[..3] {
            let v = (u32::from(c) * a + 255 * (255 - a) + 127) / 255;
            rgb.push(v as u8);
        }
    }
    rgb
}

/// Encode an RGBA8 buffer.
///
/// # Errors
///
/// [`IoError::InvalidQuality`] for a JPEG quality outside `1..=100`,
/// [`IoError::ImageEncodeError`] when the codec fails.
pub fn encode(image: &Rgba8Image, encoding: OutputEncoding) -> Result<Vec<u8>, IoError> {
    let (width, height) = match (u32::try_from(image.width()), u32::try_from(image.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(IoError::ImageTooLarge(image.width(), image.height())),
    };

    let mut buf = Vec::new();
    match encoding {
        OutputEncoding::Raw => buf.extend_from_slice(image.as_slice()),
        OutputEncoding::Png => PngEncoder::new(&mut buf)
            .write_image(image.as_slice(), width, height, ExtendedColorType::Rgba8)
            .map_err(IoError::ImageEncodeError)?,
        OutputEncoding::Jpeg { quality } => {
            if !(1..=100).contains(&quality) {
                return Err(IoError::InvalidQuality(quality));
            }
            let rgb = flatten_on_white(image);
            JpegEncoder::new_with_quality(&mut buf, quality)
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                .map_err(IoError::ImageEncodeError)?
        }
        OutputEncoding::WebpLossless => WebPEncoder::new_lossless(&mut buf)
            .write_image(image.as_slice(), width, height, ExtendedColorType::Rgba8)
            .map_err(IoError::ImageEncodeError)?,
    }

    log::debug!(
        "encoded {}x{} variant as {} ({} bytes)",
        width,
        height,
        encoding.mime_type(),
        buf.len()
    );
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::{encode, OutputEncoding};
    use crate::{decode::decode_rgba8, error::IoError};
    use lastra_image::{ImageSize, Rgba8Image};

    fn checker() -> Result<Rgba8Image, IoError> {
        let size = ImageSize {
            width: 6,
            height: 4,
        };
        let mut data = Vec::with_capacity(size.area() * 4);
        for y in 0..size.height {
            for x in 0..size.width {
                let alpha = if x == 0 { 0 } else { 255 };
                data.extend_from_slice(&[(x * 40) as u8, (y * 60) as u8, 90, alpha]);
            }
        }
        Ok(Rgba8Image::new(size, data)?)
    }

    #[test]
    fn raw_is_packed_pixels() -> Result<(), IoError> {
        let image = checker()?;
        assert_eq!(encode(&image, OutputEncoding::Raw)?, image.as_slice());
        Ok(())
    }

    #[test]
    fn png_keeps_alpha() -> Result<(), IoError> {
        let image = checker()?;
        let bytes = encode(&image, OutputEncoding::Png)?;
        assert_eq!(&bytes[1..4], b"PNG");
        assert_eq!(decode_rgba8(&bytes)?, image);
        Ok(())
    }

    #[test]
    fn webp_lossless_keeps_pixels() -> Result<(), IoError> {
        let image = Rgba8Image::from_size_pixel([5, 3].into(), [10, 200, 30, 255])?;
        let bytes = encode(&image, OutputEncoding::WebpLossless)?;
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(decode_rgba8(&bytes)?, image);
        Ok(())
    }

    #[test]
    fn jpeg_is_opaque() -> Result<(), IoError> {
        let image = checker()?;
        let bytes = encode(&image, OutputEncoding::Jpeg { quality: 90 })?;
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = decode_rgba8(&bytes)?;
        assert_eq!(decoded.size(), image.size());
        assert!(decoded.as_slice().chunks_exact(4).all(|px| px[3] == 255));
        Ok(())
    }

    #[test]
    fn jpeg_quality_range() -> Result<(), IoError> {
        let image = checker()?;
        let res = encode(&image, OutputEncoding::Jpeg { quality: 0 });
        assert!(matches!(res, Err(IoError::InvalidQuality(0))));
        Ok(())
    }

    #[test]
    fn encoding_serde() -> Result<(), Box<dyn std::error::Error>> {
        let enc: OutputEncoding = serde_json::from_str(r#"{"format": "jpeg", "quality": 80}"#)?;
        assert_eq!(enc, OutputEncoding::Jpeg { quality: 80 });
        assert_eq!(serde_json::to_string(&OutputEncoding::Png)?, r#"{"format":"png"}"#);
        Ok(())
    }
}

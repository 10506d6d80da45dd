use lastra_image::{Image, ImageSize, Rect};

use crate::error::ImgprocError;

/// Crop an image to a specified region.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `rect` - The region to extract, in source pixel coordinates.
///
/// # Errors
///
/// Fails with [`lastra_image::ImageError::InvalidRegion`] when the rectangle has no
/// area or is not fully inside the source image.
///
/// # Examples
///
/// ```rust
/// use lastra_image::{Image, ImageSize, Rect};
/// use lastra_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let cropped = crop_image(&image, &Rect::new(1, 1, 2, 2)).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    rect: &Rect,
) -> Result<Image<T, C>, ImgprocError>
where
    T: Copy,
{
    rect.check_within(src.size())?;

    let src_stride = src.cols() * C;
    let row_len = rect.width * C;
    let mut data = Vec::with_capacity(rect.height * row_len);
    for y in rect.y..rect.bottom() {
        // get the slice at the left edge of the region
        let offset = y * src_stride + rect.x * C;
        data.extend_from_slice(&src.as_slice()[offset..offset + row_len]);
    }

    let size = ImageSize {
        width: rect.width,
        height: rect.height,
    };
    Ok(Image::new(size, data)?)
}

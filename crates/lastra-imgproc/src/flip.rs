use lastra_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

/// Flip the input image horizontally.
///
/// Column order within each row is reversed; the input is left untouched.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
///
/// # Returns
///
/// The flipped image.
///
/// # Example
///
/// ```
/// use lastra_image::{Image, ImageSize};
/// use lastra_imgproc::flip::horizontal_flip;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 3,
///         height: 1,
///     },
///     vec![1, 2, 3],
/// )
/// .unwrap();
///
/// let flipped = horizontal_flip(&image);
///
/// assert_eq!(flipped.as_slice(), &[3, 2, 1]);
/// ```
pub fn horizontal_flip<T, const C: usize>(src: &Image<T, C>) -> Image<T, C>
where
    T: Copy + Send + Sync,
{
    let mut dst = src.clone();
    let cols = src.cols();
    if cols < 2 {
        return dst;
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .for_each(|row| {
            let mut i = 0;
            let mut j = cols - 1;
            while i < j {
                for c in 0..C {
                    row.swap(i * C + c, j * C + c);
                }
                i += 1;
                j -= 1;
            }
        });

    dst
}

/// Flip the input image vertically.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
///
/// # Returns
///
/// The flipped image.
///
/// # Example
///
/// ```
/// use lastra_image::{Image, ImageSize};
/// use lastra_imgproc::flip::vertical_flip;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 1,
///         height: 3,
///     },
///     vec![1, 2, 3],
/// )
/// .unwrap();
///
/// assert_eq!(vertical_flip(&image).as_slice(), &[3, 2, 1]);
/// ```
pub fn vertical_flip<T, const C: usize>(src: &Image<T, C>) -> Image<T, C>
where
    T: Copy + Send + Sync,
{
    let mut dst = src.clone();
    let stride = src.cols() * C;
    if stride == 0 {
        return dst;
    }
    dst.as_slice_mut()
        .par_chunks_exact_mut(stride)
        .zip(src.as_slice().par_chunks_exact(stride).rev())
        .for_each(|(dst_row, src_row)| dst_row.copy_from_slice(src_row));

    dst
}

/// Rotate the input image by 180 degrees.
///
/// Equivalent to a horizontal and a vertical flip: pixel `(x, y)` moves to
/// `(W - 1 - x, H - 1 - y)`.
pub fn rotate_180<T, const C: usize>(src: &Image<T, C>) -> Image<T, C>
where
    T: Copy + Send + Sync,
{
    let mut dst = src.clone();
    let data = dst.as_slice_mut();
    let num_pixels = src.size().area();
    for i in 0..num_pixels / 2 {
        let j = num_pixels - 1 - i;
        for c in 0..C {
            data.swap(i * C + c, j * C + c);
        }
    }
    dst
}

/// Rotate the input image by 90 degrees counter-clockwise.
///
/// The output has the input's width and height swapped: the top row becomes the
/// left column read bottom-up, so pixel `(x, y)` moves to `(y, W - 1 - x)`.
///
/// # Errors
///
/// Only if the output buffer cannot be allocated.
///
/// # Example
///
/// ```
/// use lastra_image::{Image, ImageSize};
/// use lastra_imgproc::flip::rotate_90;
///
/// let image = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![1, 2]).unwrap();
/// let rotated = rotate_90(&image).unwrap();
///
/// assert_eq!(rotated.size(), ImageSize { width: 1, height: 2 });
/// assert_eq!(rotated.as_slice(), &[2, 1]);
/// ```
pub fn rotate_90<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default,
{
    let (w, h) = (src.cols(), src.rows());
    rotate_quarter(src, |x, y| (w - 1 - x) * h + y)
}

/// Rotate the input image by 90 degrees clockwise, i.e. 270 counter-clockwise.
///
/// Pixel `(x, y)` moves to `(H - 1 - y, x)`.
pub fn rotate_270<T, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default,
{
    let h = src.rows();
    rotate_quarter(src, |x, y| x * h + (h - 1 - y))
}

/// Copy every source pixel `(x, y)` to the flat pixel index `dst_index(x, y)` of
/// an image with the width and height swapped.
fn rotate_quarter<T, const C: usize>(
    src: &Image<T, C>,
    dst_index: impl Fn(usize, usize) -> usize,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default,
{
    let (w, h) = (src.cols(), src.rows());
    let mut dst = Image::from_size_val([h, w].into(), T::default())?;
    if w == 0 {
        return Ok(dst);
    }

    let data = dst.as_slice_mut();
    for (y, row) in src.as_slice().chunks_exact(w * C).enumerate() {
        for (x, px) in row.chunks_exact(C).enumerate() {
            let i = dst_index(x, y) * C;
            data[i..i + C].copy_from_slice(px);
        }
    }
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use lastra_image::{Image, ImageError, ImageSize};

    #[rustfmt::skip]
    fn grid() -> Result<Image<u8, 2>, ImageError> {
        Image::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![
                0, 1, 2, 3, 4, 5,
                6, 7, 8, 9, 10, 11,
            ],
        )
    }

    #[test]
    fn test_hflip() -> Result<(), ImageError> {
        let flipped = super::horizontal_flip(&grid()?);
        assert_eq!(flipped.as_slice(), &[4, 5, 2, 3, 0, 1, 10, 11, 8, 9, 6, 7]);
        Ok(())
    }

    #[test]
    fn test_vflip() -> Result<(), ImageError> {
        let flipped = super::vertical_flip(&grid()?);
        assert_eq!(flipped.as_slice(), &[6, 7, 8, 9, 10, 11, 0, 1, 2, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_rotate_180() -> Result<(), ImageError> {
        let image = grid()?;
        let rotated = super::rotate_180(&image);
        assert_eq!(rotated.as_slice(), &[10, 11, 8, 9, 6, 7, 4, 5, 2, 3, 0, 1]);
        assert_eq!(
            rotated,
            super::vertical_flip(&super::horizontal_flip(&image))
        );
        Ok(())
    }

    #[test]
    fn test_rotate_quarters() -> Result<(), ImageError> {
        let image = grid()?;

        let ccw = super::rotate_90(&image)?;
        assert_eq!(ccw.size(), ImageSize { width: 2, height: 3 });
        assert_eq!(ccw.as_slice(), &[4, 5, 10, 11, 2, 3, 8, 9, 0, 1, 6, 7]);

        let cw = super::rotate_270(&image)?;
        assert_eq!(cw.size(), ImageSize { width: 2, height: 3 });
        assert_eq!(cw.as_slice(), &[6, 7, 0, 1, 8, 9, 2, 3, 10, 11, 4, 5]);
        Ok(())
    }

    #[test]
    fn test_quarter_turns_compose() -> Result<(), ImageError> {
        let data = (0..7 * 5 * 4).map(|v| (v % 251) as u8).collect();
        let image = Image::<u8, 4>::new([7, 5].into(), data)?;

        let mut turned = image.clone();
        for _ in 0..4 {
            turned = super::rotate_90(&turned)?;
        }
        assert_eq!(turned, image);

        assert_eq!(super::rotate_270(&super::rotate_90(&image)?)?, image);
        assert_eq!(super::rotate_90(&super::rotate_90(&image)?)?, super::rotate_180(&image));
        assert_eq!(
            super::rotate_270(&super::rotate_270(&image)?)?,
            super::rotate_180(&image)
        );
        Ok(())
    }

    #[test]
    fn test_rotate_empty() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([0, 4].into(), vec![])?;
        assert_eq!(super::rotate_90(&image)?.size(), ImageSize { width: 4, height: 0 });
        Ok(())
    }

    #[test]
    fn test_flips_are_involutions() -> Result<(), ImageError> {
        let data = (0..7 * 5 * 4).map(|v| (v % 251) as u8).collect();
        let image = Image::<u8, 4>::new([7, 5].into(), data)?;
        assert_eq!(super::horizontal_flip(&super::horizontal_flip(&image)), image);
        assert_eq!(super::vertical_flip(&super::vertical_flip(&image)), image);
        assert_eq!(super::rotate_180(&super::rotate_180(&image)), image);
        Ok(())
    }
}

use lastra_image::{Image, ImageDtype, ImageSize};

use crate::{
    error::ImgprocError,
    interpolation::{interpolate_pixel, InterpolationMode},
    parallel::{self, ExecutionStrategy},
};

/// Resize an image to a new size.
///
/// Pixel centres are aligned: destination pixel `(x, y)` samples the source at
/// `((x + 0.5) * W / w - 0.5, (y + 0.5) * H / h - 0.5)`.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `new_size` - The size of the output image.
/// * `interpolation` - The interpolation mode to use.
/// * `strategy` - How the output rows are distributed over threads.
///
/// # Example
///
/// ```
/// use lastra_image::{Image, ImageSize};
/// use lastra_imgproc::interpolation::InterpolationMode;
/// use lastra_imgproc::parallel::ExecutionStrategy;
/// use lastra_imgproc::resize::resize;
///
/// let image = Image::<u8, 4>::from_size_val(ImageSize { width: 4, height: 5 }, 7).unwrap();
///
/// let resized = resize(
///     &image,
///     ImageSize { width: 2, height: 3 },
///     InterpolationMode::Bilinear,
///     ExecutionStrategy::Serial,
/// )
/// .unwrap();
///
/// assert_eq!(resized.size(), ImageSize { width: 2, height: 3 });
/// assert!(resized.as_slice().iter().all(|&v| v == 7));
/// ```
pub fn resize<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    new_size: ImageSize,
    interpolation: InterpolationMode,
    strategy: ExecutionStrategy,
) -> Result<Image<T, C>, ImgprocError> {
    if src.size().area() == 0 {
        return Err(ImgprocError::EmptyImage(src.width(), src.height()));
    }
    if new_size.area() == 0 {
        return Err(ImgprocError::EmptyImage(new_size.width, new_size.height));
    }
    if new_size == src.size() {
        return Ok(src.clone());
    }

    let scale_x = src.width() as f32 / new_size.width as f32;
    let scale_y = src.height() as f32 / new_size.height as f32;

    let mut dst = Image::<T, C>::from_size_val(new_size, T::default())?;
    parallel::par_rows_mut(strategy, dst.as_slice_mut(), new_size.width * C, |y, row| {
        let v = (y as f32 + 0.5) * scale_y - 0.5;
        for (x, dst_pixel) in row.chunks_exact_mut(C).enumerate() {
            let u = (x as f32 + 0.5) * scale_x - 0.5;
            let pixel = interpolate_pixel(src, u, v, interpolation);
            for (d, p) in dst_pixel.iter_mut().zip(pixel.iter()) {
                *d = T::from_f32(*p);
            }
        }
    })?;

    Ok(dst)
}

/// Largest size with the same aspect ratio whose longest side is at most `max_side`.
///
/// Sizes already within the limit are returned unchanged. Each side is at least one pixel.
pub fn fit_longest_side(size: ImageSize, max_side: usize) -> ImageSize {
    let longest = size.longest_side();
    if longest <= max_side || longest == 0 {
        return size;
    }
    let scale = max_side as f64 / longest as f64;
    ImageSize {
        width: ((size.width as f64 * scale).round() as usize).clamp(1, max_side.max(1)),
        height: ((size.height as f64 * scale).round() as usize).clamp(1, max_side.max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::{fit_longest_side, resize};
    use crate::{
        error::ImgprocError, interpolation::InterpolationMode, parallel::ExecutionStrategy,
    };
    use lastra_image::{Image, ImageSize};

    #[test]
    fn resize_upscale_nearest() -> Result<(), ImgprocError> {
        let image = Image::<u8, 1>::new([2, 1].into(), vec![10, 20])?;
        let resized = resize(
            &image,
            [4, 2].into(),
            InterpolationMode::Nearest,
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(resized.as_slice(), &[10, 10, 20, 20, 10, 10, 20, 20]);
        Ok(())
    }

    #[test]
    fn resize_downscale_bilinear() -> Result<(), ImgprocError> {
        let image = Image::<u8, 1>::new([4, 1].into(), vec![0, 100, 200, 250])?;
        let resized = resize(
            &image,
            [2, 1].into(),
            InterpolationMode::Bilinear,
            ExecutionStrategy::ParallelRows,
        )?;
        // samples land halfway between texel pairs
        assert_eq!(resized.as_slice(), &[50, 225]);
        Ok(())
    }

    #[test]
    fn resize_same_size_is_copy() -> Result<(), ImgprocError> {
        let image = Image::<u8, 4>::from_size_pixel([3, 3].into(), [9, 8, 7, 6])?;
        let resized = resize(
            &image,
            image.size(),
            InterpolationMode::Bilinear,
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(resized, image);
        Ok(())
    }

    #[test]
    fn resize_empty() -> Result<(), ImgprocError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let res = resize(
            &image,
            [0, 2].into(),
            InterpolationMode::Bilinear,
            ExecutionStrategy::Serial,
        );
        assert_eq!(res, Err(ImgprocError::EmptyImage(0, 2)));
        Ok(())
    }

    #[test]
    fn fit_longest() {
        let size = ImageSize {
            width: 3102,
            height: 1247,
        };
        assert_eq!(
            fit_longest_side(size, 1600),
            ImageSize {
                width: 1600,
                height: 643
            }
        );
        assert_eq!(fit_longest_side(size, 4000), size);
    }
}

use lastra_geometry::{Homography, Point2d, Quad};
use lastra_image::{Image, ImageDtype, ImageSize};

use crate::{
    error::ImgprocError,
    interpolation::{interpolate_pixel, InterpolationMode},
    parallel::{self, ExecutionStrategy},
};

/// Inclusive-exclusive pixel ranges covered by the quad bounds, clamped to the canvas.
fn pixel_bounds(quad: &Quad, canvas: ImageSize) -> Option<(usize, usize, usize, usize)> {
    let b = quad.bounds();
    let x0 = b.min_x.floor().max(0.0);
    let y0 = b.min_y.floor().max(0.0);
    let x1 = b.max_x.ceil().min(canvas.width as f64);
    let y1 = b.max_y.ceil().min(canvas.height as f64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
}

/// Render `src` as if glued onto the quadrilateral `quad` of a `canvas` sized plane.
///
/// The source is treated as the unit square; every destination pixel whose centre
/// lies inside `quad` is mapped back through the inverse homography and sampled
/// with `interpolation`. Pixels outside the quad, or mapping outside `[0, 1]`, keep
/// the default value (fully transparent for RGBA).
///
/// # Arguments
///
/// * `src` - The image to warp, at least one pixel.
/// * `canvas` - Size of the output buffer.
/// * `quad` - Destination corners in canvas coordinates.
/// * `interpolation` - The interpolation mode to use.
/// * `strategy` - How the output rows are distributed over threads.
///
/// # Errors
///
/// [`ImgprocError::Geometry`] when `quad` is degenerate.
///
/// # Example
///
/// ```
/// use lastra_geometry::Quad;
/// use lastra_image::{Image, ImageSize};
/// use lastra_imgproc::interpolation::InterpolationMode;
/// use lastra_imgproc::parallel::ExecutionStrategy;
/// use lastra_imgproc::warp::warp_into_quad;
///
/// let src = Image::<u8, 4>::from_size_pixel(ImageSize { width: 8, height: 8 }, [255, 0, 0, 255]).unwrap();
/// let quad = Quad::from_rect(2.0, 2.0, 4.0, 4.0);
///
/// let dst = warp_into_quad(
///     &src,
///     ImageSize { width: 10, height: 10 },
///     &quad,
///     InterpolationMode::Bilinear,
///     ExecutionStrategy::Serial,
/// )
/// .unwrap();
///
/// assert_eq!(dst.pixel(3, 3).unwrap(), &[255, 0, 0, 255]);
/// assert_eq!(dst.pixel(0, 0).unwrap(), &[0, 0, 0, 0]);
/// ```
pub fn warp_into_quad<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    canvas: ImageSize,
    quad: &Quad,
    interpolation: InterpolationMode,
    strategy: ExecutionStrategy,
) -> Result<Image<T, C>, ImgprocError> {
    if src.size().area() == 0 {
        return Err(ImgprocError::EmptyImage(src.width(), src.height()));
    }
    if canvas.area() == 0 {
        return Err(ImgprocError::EmptyImage(canvas.width, canvas.height));
    }

    let homography = Homography::from_unit_square(quad)?;
    let inv = homography.inverse()?;

    let mut dst = Image::<T, C>::from_size_val(canvas, T::default())?;
    let Some((x0, y0, x1, y1)) = pixel_bounds(quad, canvas) else {
        log::debug!("quad {quad:?} lies outside the {canvas} canvas");
        return Ok(dst);
    };

    let (src_w, src_h) = (src.width() as f64, src.height() as f64);

    parallel::par_rows_mut(strategy, dst.as_slice_mut(), canvas.width * C, |y, row| {
        if y < y0 || y >= y1 {
            return;
        }
        let cy = y as f64 + 0.5;
        for x in x0..x1 {
            let centre = Point2d::new(x as f64 + 0.5, cy);
            if !quad.contains(&centre) {
                continue;
            }

            // normalized source coordinates
            let uv = inv.transform_point(centre);
            if !uv.is_finite() || !(0.0..=1.0).contains(&uv.x) || !(0.0..=1.0).contains(&uv.y) {
                continue;
            }

            let u = (uv.x * src_w - 0.5) as f32;
            let v = (uv.y * src_h - 0.5) as f32;
            let pixel = interpolate_pixel(src, u, v, interpolation);

            let dst_pixel = &mut row[x * C..(x + 1) * C];
            for (d, p) in dst_pixel.iter_mut().zip(pixel.iter()) {
                *d = T::from_f32(*p);
            }
        }
    })?;

    Ok(dst)
}

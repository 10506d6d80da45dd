//! Straight (non-premultiplied) alpha compositing of RGBA8 layers.

use lastra_image::Rgba8Image;

use crate::{
    error::ImgprocError,
    parallel::{self, ExecutionStrategy},
};

/// Blend one straight-alpha RGBA8 pixel over another.
///
/// # Example
///
/// ```
/// use lastra_imgproc::composite::over;
///
/// assert_eq!(over([0, 0, 255, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
/// assert_eq!(over([0, 0, 255, 255], [255, 0, 0, 0]), [0, 0, 255, 255]);
/// assert_eq!(over([0, 0, 0, 255], [255, 255, 255, 128]), [128, 128, 128, 255]);
/// ```
pub fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    // weights scaled by 255 * 255
    let sw = sa * 255;
    let dw = u32::from(dst[3]) * (255 - sa);
    let total = sw + dw;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let acc = u32::from(src[i]) * sw + u32::from(dst[i]) * dw;
        out[i] = ((acc + total / 2) / total) as u8;
    }
    out[3] = ((total + 127) / 255) as u8;
    out
}

/// Draw `src` over `dst` in place; both buffers must have the same size.
///
/// # Errors
///
/// [`ImgprocError::SizeMismatch`] when the sizes differ.
pub fn alpha_over(
    dst: &mut Rgba8Image,
    src: &Rgba8Image,
    strategy: ExecutionStrategy,
) -> Result<(), ImgprocError> {
    if dst.size() != src.size() {
        return Err(ImgprocError::SizeMismatch(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    if dst.size().area() == 0 {
        return Ok(());
    }

    let stride = dst.width() * 4;
    let src_data = src.as_slice();
    parallel::par_rows_mut(strategy, dst.as_slice_mut(), stride, |y, dst_row| {
        let src_row = &src_data[y * stride..(y + 1) * stride];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            if s[3] == 0 {
                continue;
            }
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    })?;

    Ok(())
}

/// Draw `src` over `dst` with its top-left corner at `offset`, clipping at the borders.
pub fn draw_over(dst: &mut Rgba8Image, src: &Rgba8Image, offset: (i64, i64)) {
    let (ox, oy) = offset;
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    let (sw, sh) = (src.width() as i64, src.height() as i64);

    let x_start = ox.max(0);
    let y_start = oy.max(0);
    let x_end = (ox + sw).min(dw);
    let y_end = (oy + sh).min(dh);
    if x_start >= x_end || y_start >= y_end {
        return;
    }

    let src_data = src.as_slice();
    let dst_cols = dst.cols();
    let dst_data = dst.as_slice_mut();
    for y in y_start..y_end {
        let sy = (y - oy) as usize;
        for x in x_start..x_end {
            let sx = (x - ox) as usize;
            let si = (sy * src.cols() + sx) * 4;
            let di = (y as usize * dst_cols + x as usize) * 4;
            let s = &src_data[si..si + 4];
            if s[3] == 0 {
                continue;
            }
            let d = &mut dst_data[di..di + 4];
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

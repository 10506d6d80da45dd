use lastra_image::Image;

/// Helper function to set a pixel's color, ignoring coordinates outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Clip the segment `p0`-`p1` to the box `min`-`max` (Liang-Barsky).
///
/// An endpoint moved onto a box edge takes the edge coordinate exactly. Returns
/// `None` when no part of the segment lies inside the box.
fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let mut enter = (0.0f64, None);
    let mut leave = (1.0f64, None);

    for (p, q, edge) in [
        (-dx, p0.0 - min.0, (0, min.0)),
        (dx, max.0 - p0.0, (0, max.0)),
        (-dy, p0.1 - min.1, (1, min.1)),
        (dy, max.1 - p0.1, (1, max.1)),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > leave.0 {
                return None;
            }
            if r > enter.0 {
                enter = (r, Some(edge));
            }
        } else {
            if r < enter.0 {
                return None;
            }
            if r < leave.0 {
                leave = (r, Some(edge));
            }
        }
    }

    let at = |(t, edge): (f64, Option<(usize, f64)>)| {
        let mut point = [p0.0 + t * dx, p0.1 + t * dy];
        if let Some((axis, value)) = edge {
            point[axis] = value;
        }
        (point[0].clamp(min.0, max.0), point[1].clamp(min.1, max.1))
    };
    Some((at(enter), at(leave)))
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// Every visited point is stamped with a `thickness` x `thickness` square, so
/// horizontal and vertical strokes are exactly `thickness` pixels wide. The
/// segment is clipped to the image, padded by the brush, before stepping, so the
/// work is bounded by the image size whatever the endpoints.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line, zero draws nothing.
///
/// # Example
///
/// ```
/// use lastra_image::{Image, ImageSize};
/// use lastra_imgproc::draw::draw_line;
///
/// let mut img = Image::<u8, 1>::from_size_val(ImageSize { width: 5, height: 1 }, 0).unwrap();
/// draw_line(&mut img, (1, 0), (3, 0), [9], 1);
/// assert_eq!(img.as_slice(), &[0, 9, 9, 9, 0]);
/// ```
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    if thickness == 0 || img.cols() == 0 || img.rows() == 0 {
        return;
    }

    let cols = img.cols() as i64;
    let rows = img.rows() as i64;
    let thickness = thickness.min(img.cols().max(img.rows())) as i64;

    let pad = thickness as f64;
    let Some((c0, c1)) = clip_segment(
        (p0.0 as f64, p0.1 as f64),
        (p1.0 as f64, p1.1 as f64),
        (-pad, -pad),
        ((cols - 1) as f64 + pad, (rows - 1) as f64 + pad),
    ) else {
        return;
    };

    let (mut x0, mut y0) = (c0.0.round() as i64, c0.1.round() as i64);
    let (x1, y1) = (c1.0.round() as i64, c1.1.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let lo = -((thickness - 1) / 2);
    let hi = lo + thickness - 1;

    loop {
        let (xs, xe) = ((x0 + lo).max(0), (x0 + hi).min(cols - 1));
        let (ys, ye) = ((y0 + lo).max(0), (y0 + hi).min(rows - 1));
        for y in ys..=ye {
            for x in xs..=xe {
                set_pixel(img, x, y, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

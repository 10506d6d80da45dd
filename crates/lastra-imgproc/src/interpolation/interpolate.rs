use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use lastra_image::{Image, ImageDtype};

/// Interpolation mode for the resampling operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C), not empty.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated channel values, in the value range of `T`.
pub fn interpolate_pixel<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
) -> [f32; C] {
    match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v),
    }
}

#[cfg(test)]
mod tests {
    use super::{interpolate_pixel, InterpolationMode};
    use approx::assert_relative_eq;
    use lastra_image::{Image, ImageError, ImageSize};

    fn ramp() -> Result<Image<u8, 1>, ImageError> {
        Image::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![0, 100, 200, 50, 150, 250],
        )
    }

    #[test]
    fn bilinear_at_texel_centres() -> Result<(), ImageError> {
        let image = ramp()?;
        assert_eq!(interpolate_pixel(&image, 1.0, 1.0, InterpolationMode::Bilinear), [150.0]);
        assert_eq!(interpolate_pixel(&image, 2.0, 0.0, InterpolationMode::Bilinear), [200.0]);
        Ok(())
    }

    #[test]
    fn bilinear_between_texels() -> Result<(), ImageError> {
        let image = ramp()?;
        let [val] = interpolate_pixel(&image, 0.5, 0.5, InterpolationMode::Bilinear);
        assert_relative_eq!(val, 75.0, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn samples_clamp_to_border() -> Result<(), ImageError> {
        let image = ramp()?;
        assert_eq!(interpolate_pixel(&image, -0.5, -0.5, InterpolationMode::Bilinear), [0.0]);
        assert_eq!(interpolate_pixel(&image, 2.5, 1.5, InterpolationMode::Bilinear), [250.0]);
        assert_eq!(interpolate_pixel(&image, 9.0, -3.0, InterpolationMode::Nearest), [200.0]);
        Ok(())
    }

    #[test]
    fn nearest_rounds() -> Result<(), ImageError> {
        let image = ramp()?;
        assert_eq!(interpolate_pixel(&image, 0.6, 0.4, InterpolationMode::Nearest), [100.0]);
        assert_eq!(interpolate_pixel(&image, 1.4, 0.6, InterpolationMode::Nearest), [150.0]);
        Ok(())
    }
}

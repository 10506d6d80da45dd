use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use lastra_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by this size, saturating at `usize::MAX`.
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Number of values a buffer of `channels` interleaved values per pixel needs,
    /// `None` when it does not fit in a `usize`.
    pub fn checked_len(&self, channels: usize) -> Option<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|area| area.checked_mul(channels))
    }

    /// Length of the longest side.
    pub fn longest_side(&self) -> usize {
        self.width.max(self.height)
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Trait for image data types.
///
/// Send and Sync is required to split rows across the rayon pool.
pub trait ImageDtype: Copy + Default + Into<f32> + Send + Sync {
    /// Convert a f32 value to the image data type.
    fn from_f32(x: f32) -> Self;
}

impl ImageDtype for f32 {
    fn from_f32(x: f32) -> Self {
        x
    }
}

impl ImageDtype for u8 {
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored row-major with `CHANNELS` interleaved values per pixel,
/// i.e. a buffer of shape (H, W, C).
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

/// Straight-alpha RGBA image with 8 bits per channel, the working format of the engine.
pub type Rgba8Image = Image<u8, 4>;

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, or the size
    /// cannot be addressed at all, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastra_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        // check if the data length matches the image size
        let expected = Self::buffer_len(size)?;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastra_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 4>::from_size_val(
    ///   ImageSize {
    ///     width: 10,
    ///     height: 20,
    ///   }, 0u8).unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 10 * 20 * 4);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; Self::buffer_len(size)?];
        Image::new(size, data)
    }

    /// Create a new image where every pixel holds the same channel values.
    pub fn from_size_pixel(size: ImageSize, pixel: [T; CHANNELS]) -> Result<Self, ImageError>
    where
        T: Copy,
    {
        let mut data = Vec::with_capacity(Self::buffer_len(size)?);
        for _ in 0..size.area() {
            data.extend_from_slice(&pixel);
        }
        Image::new(size, data)
    }

    fn buffer_len(size: ImageSize) -> Result<usize, ImageError> {
        size.checked_len(CHANNELS)
            .ok_or(ImageError::SizeOverflow(size.width, size.height))
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Returns
    ///
    /// A new image with the pixel data cast to the given type.
    pub fn cast<U>(&self) -> Result<Image<U, CHANNELS>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return its pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get the channel values of the pixel at the given coordinates.
    ///
    /// # Errors
    ///
    /// If the coordinates are out of bounds, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use lastra_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 2>::new(
    ///     ImageSize { width: 2, height: 1 },
    ///     vec![1, 2, 3, 4],
    /// ).unwrap();
    ///
    /// assert_eq!(image.pixel(1, 0).unwrap(), &[3, 4]);
    /// assert!(image.pixel(2, 0).is_err());
    /// ```
    pub fn pixel(&self, x: usize, y: usize) -> Result<&[T], ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        let offset = (y * self.cols() + x) * CHANNELS;
        Ok(&self.data[offset..offset + CHANNELS])
    }

    /// Get the mutable channel values of the pixel at the given coordinates.
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Result<&mut [T], ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        let offset = (y * self.cols() + x) * CHANNELS;
        Ok(&mut self.data[offset..offset + CHANNELS])
    }

    /// Get a single row of the image as a flat slice.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height() {
            return None;
        }
        let stride = self.cols() * CHANNELS;
        Some(&self.data[y * stride..(y + 1) * stride])
    }
}

#[cfg(test)]
mod tests {
    use super::{Image, ImageSize};
    use crate::ImageError;

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(image_size.area(), 200);
        assert_eq!(image_size.longest_side(), 20);
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0u8; 10 * 20 * 3],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.num_channels(), 3);
        Ok(())
    }

    #[test]
    fn image_wrong_data_length() {
        let res = Image::<u8, 4>::new([2, 2].into(), vec![0u8; 15]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(15, 16)));
    }

    #[test]
    fn image_size_overflow() {
        let huge = ImageSize {
            width: 1 << 32,
            height: 1 << 32,
        };
        assert_eq!(huge.area(), usize::MAX);
        assert_eq!(huge.checked_len(1), None);
        assert_eq!(ImageSize::from([3, 2]).checked_len(4), Some(24));

        let err = Some(ImageError::SizeOverflow(1 << 32, 1 << 32));
        assert_eq!(Image::<u8, 4>::from_size_pixel(huge, [0; 4]).err(), err);
        assert_eq!(Image::<u8, 1>::from_size_val(huge, 0).err(), err);
        assert_eq!(Image::<u8, 1>::new(huge, vec![]).err(), err);

        // the area fits, the interleaved buffer does not
        let wide = ImageSize {
            width: usize::MAX / 2,
            height: 1,
        };
        assert!(matches!(
            Image::<u8, 4>::from_size_val(wide, 0),
            Err(ImageError::SizeOverflow(..))
        ));
    }

    #[test]
    fn image_from_size_pixel() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::from_size_pixel([2, 1].into(), [1, 2, 3, 4])?;
        assert_eq!(image.as_slice(), &[1, 2, 3, 4, 1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn image_pixel_mut() -> Result<(), ImageError> {
        let mut image = Image::<u8, 1>::from_size_val([3, 2].into(), 0)?;
        image.pixel_mut(2, 1)?[0] = 9;
        assert_eq!(image.as_slice(), &[0, 0, 0, 0, 0, 9]);
        assert_eq!(image.row(1), Some(&[0u8, 0, 9][..]));
        assert_eq!(image.row(2), None);
        Ok(())
    }

    #[test]
    fn image_cast() -> Result<(), ImageError> {
        let data = vec![0u8, 0, 255, 0, 0, 255];
        let image_u8 = Image::<_, 3>::new(
            ImageSize {
                height: 2,
                width: 1,
            },
            data,
        )?;
        let image_f32 = image_u8.cast::<f32>()?;
        assert_eq!(image_f32.pixel(0, 1)?[2], 255.0f32);
        Ok(())
    }

    #[test]
    fn image_size_serde() -> Result<(), Box<dyn std::error::Error>> {
        let size: ImageSize = serde_json::from_str(r#"{"width": 3, "height": 4}"#)?;
        assert_eq!(size, ImageSize { width: 3, height: 4 });
        Ok(())
    }
}

use crate::{
    error::{LowPolyError, Result},
    Scalar,
};
use serde::{Deserialize, Serialize};

/// 8 bit RGB color.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rec. 601 luma in range from 0 to 1.
    #[inline]
    pub fn luma(self) -> Scalar {
        (0.299 * self.r as Scalar + 0.587 * self.g as Scalar + 0.114 * self.b as Scalar) / 255.0
    }

    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(value: Rgb) -> Self {
        value.channels()
    }
}

/// Read-only RGB pixel grid the pipeline works on.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SourceImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl SourceImage {
    /// Create new source image from raw row-major RGB triplets.
    ///
    /// # Arguments
    /// * `width` - Columns.
    /// * `height` - Rows.
    /// * `data` - Raw pixel data, three bytes per pixel.
    ///
    /// # Returns
    /// Source image or error.
    ///
    /// # Examples
    /// ```
    /// use lowpoly_core::prelude::*;
    ///
    /// assert!(SourceImage::new(2, 1, vec![0, 1, 2, 3, 4, 5]).is_ok());
    /// assert_eq!(
    ///     SourceImage::new(2, 2, vec![0, 1, 2]),
    ///     Err(LowPolyError::WrongDataLength(3, 12)),
    /// );
    /// ```
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() == width * height * 3 {
            let pixels = data
                .chunks_exact(3)
                .map(|c| Rgb::new(c[0], c[1], c[2]))
                .collect::<Vec<_>>();
            Ok(Self {
                width,
                height,
                pixels,
            })
        } else {
            Err(LowPolyError::WrongDataLength(data.len(), width * height * 3))
        }
    }

    /// Create new source image from pixels.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        if pixels.len() == width * height {
            Ok(Self {
                width,
                height,
                pixels,
            })
        } else {
            Err(LowPolyError::WrongDataLength(pixels.len(), width * height))
        }
    }

    /// Create new source image filled with single color.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Create new source image by evaluating function per pixel.
    ///
    /// # Arguments
    /// * `f` - Callback with `(column, row)` arguments.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        let pixels = (0..(width * height))
            .map(|i| f(i % width, i / width))
            .collect::<Vec<_>>();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Returns pixel at given column and row.
    ///
    /// # Panics
    /// When position is out of bounds.
    #[inline]
    pub fn pixel(&self, col: usize, row: usize) -> Rgb {
        self.pixels[row * self.width + col]
    }

    /// Returns pixel nearest to given position, clamped to image bounds.
    #[inline]
    pub fn pixel_clamped(&self, col: isize, row: isize) -> Rgb {
        let col = col.clamp(0, self.width as isize - 1) as usize;
        let row = row.clamp(0, self.height as isize - 1) as usize;
        self.pixel(col, row)
    }

    /// Returns luma buffer in range from 0 to 1.
    pub fn luma_values(&self) -> Vec<Scalar> {
        self.pixels.iter().map(|p| p.luma()).collect()
    }

    /// Returns single channel buffer in range from 0 to 1.
    ///
    /// # Arguments
    /// * `channel` - 0 for red, 1 for green, 2 for blue.
    pub fn channel_values(&self, channel: usize) -> Vec<Scalar> {
        self.pixels
            .iter()
            .map(|p| p.channels()[channel] as Scalar / 255.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_range() {
        assert_eq!(Rgb::new(0, 0, 0).luma(), 0.0);
        assert!((Rgb::new(255, 255, 255).luma() - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn test_pixel_layout() {
        let image = SourceImage::new(2, 2, (0..12).collect()).unwrap();
        assert_eq!(image.pixel(0, 0), Rgb::new(0, 1, 2));
        assert_eq!(image.pixel(1, 0), Rgb::new(3, 4, 5));
        assert_eq!(image.pixel(0, 1), Rgb::new(6, 7, 8));
        assert_eq!(image.pixel_clamped(5, -3), Rgb::new(3, 4, 5));
    }

    #[test]
    fn test_from_fn() {
        let image = SourceImage::from_fn(3, 2, |x, y| Rgb::new(x as u8, y as u8, 0));
        assert_eq!(image.pixel(2, 1), Rgb::new(2, 1, 0));
        let red = image.channel_values(0);
        assert_eq!(red.len(), 6);
        assert_eq!(red[0], 0.0);
        assert_eq!(red[5], 2.0 / 255.0);
    }

    #[test]
    fn test_zero_area_is_empty() {
        let image = SourceImage::new(0, 10, vec![]).unwrap();
        assert!(image.is_empty());
    }
}

//! Dense 2D pixel grid.

use super::pixel::{ColorSpace, Interleaved, Pixel};
use crate::api::EnhanceError;

/// A dense, row-major 2D grid of pixels.
///
/// The pixel type fixes both the channel count and the color space, so a
/// `PixelBuffer<Lab>` and a `PixelBuffer<Hsv>` cannot be confused even
/// though both hold three floats per pixel.
///
/// Stages borrow their input and return a freshly allocated buffer; no
/// buffer is mutated once another stage can observe it.
///
/// # Example
///
/// ```
/// use chroma_enhance::Rgb8Image;
///
/// let image = Rgb8Image::filled(4, 2, [10, 20, 30]);
/// assert_eq!(image.dimensions(), (4, 2));
/// assert_eq!(image.get(3, 1), [10, 20, 30]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<P> {
    width: usize,
    height: usize,
    pixels: Vec<P>,
}

impl<P: Pixel> PixelBuffer<P> {
    /// Buffer of `width * height` copies of `value`.
    pub fn filled(width: usize, height: usize, value: P) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    /// Buffer whose pixel at `(x, y)` is `f(x, y)`.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> P) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap an existing row-major pixel vector.
    ///
    /// # Errors
    ///
    /// [`EnhanceError::BufferLength`] if `pixels.len() != width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<P>) -> Result<Self, EnhanceError> {
        if pixels.len() != width * height {
            return Err(EnhanceError::BufferLength {
                width,
                height,
                channels: P::CHANNELS,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn color_space(&self) -> ColorSpace {
        P::SPACE
    }

    #[inline]
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    #[inline]
    pub fn into_pixels(self) -> Vec<P> {
        self.pixels
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the buffer.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> P {
        self.pixels[y * self.width + x]
    }

    /// Pixel at `(x, y)` with coordinates clamped to the nearest edge.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> P {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.get(x, y)
    }

    /// Row `y` as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[P] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// New buffer of the same dimensions with `f` applied to every pixel.
    pub fn map<Q: Pixel>(&self, f: impl FnMut(P) -> Q) -> PixelBuffer<Q> {
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().copied().map(f).collect(),
        }
    }

    /// # Errors
    ///
    /// [`EnhanceError::EmptyInput`] if either dimension is zero.
    pub fn ensure_not_empty(&self) -> Result<(), EnhanceError> {
        if self.width == 0 || self.height == 0 {
            return Err(EnhanceError::EmptyInput {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl<P: Interleaved> PixelBuffer<P> {
    /// Build a buffer from a raw interleaved slice.
    ///
    /// `channels` is the caller's claim about the slice layout; it must
    /// match the pixel type.
    ///
    /// # Errors
    ///
    /// - [`EnhanceError::InvalidChannelCount`] if `channels != P::CHANNELS`
    /// - [`EnhanceError::BufferLength`] if `data.len() != width * height * channels`
    ///
    /// ```
    /// use chroma_enhance::{ChromaPlanes, EnhanceError};
    ///
    /// let ab = ChromaPlanes::from_interleaved(2, 1, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(ab.get(1, 0), [3.0, 4.0]);
    ///
    /// let err = ChromaPlanes::from_interleaved(2, 1, 3, &[0.0; 6]).unwrap_err();
    /// assert!(matches!(err, EnhanceError::InvalidChannelCount { .. }));
    /// ```
    pub fn from_interleaved(
        width: usize,
        height: usize,
        channels: usize,
        data: &[P::Component],
    ) -> Result<Self, EnhanceError> {
        if channels != P::CHANNELS {
            return Err(EnhanceError::InvalidChannelCount {
                space: P::SPACE,
                expected: P::CHANNELS,
                actual: channels,
            });
        }
        if data.len() != width * height * channels {
            return Err(EnhanceError::BufferLength {
                width,
                height,
                channels,
                actual: data.len(),
            });
        }
        let pixels = data.chunks_exact(channels).map(P::from_components).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Flatten to a raw interleaved vector.
    pub fn to_interleaved(&self) -> Vec<P::Component> {
        let mut out = Vec::with_capacity(self.pixels.len() * P::CHANNELS);
        for &p in &self.pixels {
            p.extend_components(&mut out);
        }
        out
    }
}

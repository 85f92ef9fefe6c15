//! sRGB color type
//!
//! sRGB is the working color space of the pipeline: composition produces
//! it, every 8-bit stage consumes and returns it.

use super::linear_rgb::LinearRgb;
use super::lut::linear_to_srgb;

/// A color in gamma-encoded sRGB, channels nominally in 0.0..=1.0.
///
/// Values are not clamped on construction. Lab colors outside the sRGB
/// gamut convert to components below 0.0 or above 1.0; [`Srgb::clip`]
/// brings them back into the displayable range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    /// Red channel (gamma-encoded)
    pub r: f32,
    /// Green channel (gamma-encoded)
    pub g: f32,
    /// Blue channel (gamma-encoded)
    pub b: f32,
}

impl Srgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create an Srgb color from 8-bit code values.
    ///
    /// ```
    /// use chroma_enhance::Srgb;
    /// let red = Srgb::from_u8(255, 0, 0);
    /// assert_eq!(red.r, 1.0);
    /// ```
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_u8(bytes[0], bytes[1], bytes[2])
    }

    /// Clip every channel into 0.0..=1.0.
    #[inline]
    pub fn clip(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// True when every channel is a finite number.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Convert to 8-bit code values [R, G, B].
    ///
    /// Rounds and clamps to 0..=255.
    ///
    /// ```
    /// use chroma_enhance::Srgb;
    /// let bytes = Srgb::new(1.0, 0.5, -0.2).to_bytes();
    /// assert_eq!(bytes, [255, 128, 0]);
    /// ```
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }
}

impl From<LinearRgb> for Srgb {
    /// Gamma-encode linear light.
    ///
    /// Linear values outside 0.0..=1.0 are clamped by the lookup table,
    /// so the result is always displayable.
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: linear_to_srgb(linear.r),
            g: linear_to_srgb(linear.g),
            b: linear_to_srgb(linear.b),
        }
    }
}

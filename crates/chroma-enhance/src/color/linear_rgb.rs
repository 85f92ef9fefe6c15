//! Linear RGB color type
//!
//! Linear light is the hub between sRGB and CIE Lab: the XYZ matrices are
//! only valid on gamma-decoded values.

use super::lut::{srgb8_to_linear, srgb_to_linear};
use super::srgb::Srgb;

/// A color in linear RGB (sRGB primaries, D65).
///
/// Values are not clamped. Out-of-gamut Lab colors produce components
/// outside 0.0..=1.0 here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Decode 8-bit sRGB code values exactly (no interpolation).
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            r: srgb8_to_linear(bytes[0]),
            g: srgb8_to_linear(bytes[1]),
            b: srgb8_to_linear(bytes[2]),
        }
    }
}

impl From<Srgb> for LinearRgb {
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb_to_linear(srgb.r),
            g: srgb_to_linear(srgb.g),
            b: srgb_to_linear(srgb.b),
        }
    }
}

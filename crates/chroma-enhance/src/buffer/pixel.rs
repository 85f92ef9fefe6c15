//! Pixel trait and color-space tags.

use crate::color::{Hsv, Lab, Lab8, Srgb};

/// Logical color space of a buffer.
///
/// Carried at the type level by each [`Pixel`] implementation; the enum
/// exists for diagnostics and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Single-channel CIE lightness
    Lightness,
    /// Two-channel CIE a/b chrominance
    Chroma,
    /// Gamma-encoded RGB (float or 8-bit)
    Rgb,
    /// CIE L*a*b* (float or 8-bit packed)
    Lab,
    /// Hue / saturation / value
    Hsv,
    /// Binary region mask, values {0, 255}
    Mask,
}

/// A pixel type that can live in a [`PixelBuffer`](super::PixelBuffer).
pub trait Pixel: Copy {
    /// Number of channels per pixel
    const CHANNELS: usize;
    /// Color space this pixel type represents
    const SPACE: ColorSpace;
}

/// A pixel that can be built from and flattened into a raw interleaved
/// slice, as exchanged with collaborators outside the crate.
pub trait Interleaved: Pixel {
    type Component: Copy;

    /// Build one pixel from exactly `CHANNELS` components.
    fn from_components(components: &[Self::Component]) -> Self;

    /// Append this pixel's components to `out`.
    fn extend_components(self, out: &mut Vec<Self::Component>);
}

impl Pixel for f32 {
    const CHANNELS: usize = 1;
    const SPACE: ColorSpace = ColorSpace::Lightness;
}

impl Interleaved for f32 {
    type Component = f32;

    #[inline]
    fn from_components(components: &[f32]) -> Self {
        components[0]
    }

    #[inline]
    fn extend_components(self, out: &mut Vec<f32>) {
        out.push(self);
    }
}

impl Pixel for [f32; 2] {
    const CHANNELS: usize = 2;
    const SPACE: ColorSpace = ColorSpace::Chroma;
}

impl Interleaved for [f32; 2] {
    type Component = f32;

    #[inline]
    fn from_components(components: &[f32]) -> Self {
        [components[0], components[1]]
    }

    #[inline]
    fn extend_components(self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self);
    }
}

impl Pixel for [u8; 3] {
    const CHANNELS: usize = 3;
    const SPACE: ColorSpace = ColorSpace::Rgb;
}

impl Interleaved for [u8; 3] {
    type Component = u8;

    #[inline]
    fn from_components(components: &[u8]) -> Self {
        [components[0], components[1], components[2]]
    }

    #[inline]
    fn extend_components(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self);
    }
}

impl Pixel for u8 {
    const CHANNELS: usize = 1;
    const SPACE: ColorSpace = ColorSpace::Mask;
}

impl Pixel for Srgb {
    const CHANNELS: usize = 3;
    const SPACE: ColorSpace = ColorSpace::Rgb;
}

impl Pixel for Lab {
    const CHANNELS: usize = 3;
    const SPACE: ColorSpace = ColorSpace::Lab;
}

impl Pixel for Lab8 {
    const CHANNELS: usize = 3;
    const SPACE: ColorSpace = ColorSpace::Lab;
}

impl Pixel for Hsv {
    const CHANNELS: usize = 3;
    const SPACE: ColorSpace = ColorSpace::Hsv;
}

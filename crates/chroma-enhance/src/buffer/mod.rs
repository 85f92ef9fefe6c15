//! Pixel buffers.
//!
//! One generic container, [`PixelBuffer`], and aliases naming each role a
//! buffer plays in the pipeline.

mod pixel;
mod pixel_buffer;

pub use pixel::{ColorSpace, Interleaved, Pixel};
pub use pixel_buffer::PixelBuffer;

use crate::color::{Lab, Lab8, Srgb};

/// Single-channel lightness, L in 0.0..=100.0
pub type Plane = PixelBuffer<f32>;

/// Predicted chrominance, `[a, b]` per pixel
pub type ChromaPlanes = PixelBuffer<[f32; 2]>;

/// 8-bit working color image, RGB byte order
pub type Rgb8Image = PixelBuffer<[u8; 3]>;

/// Float sRGB image
pub type SrgbImage = PixelBuffer<Srgb>;

/// Float CIE Lab image
pub type LabImage = PixelBuffer<Lab>;

/// 8-bit packed Lab image
pub type Lab8Image = PixelBuffer<Lab8>;

/// Binary region mask, {0, 255}
pub type Mask = PixelBuffer<u8>;

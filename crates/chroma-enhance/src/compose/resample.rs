//! Bilinear resampling for lightness and chrominance planes.
//!
//! Used on both sides of the model: shrinking lightness to the model's
//! square input, and stretching the predicted chroma back to photo size.

use crate::api::EnhanceError;
use crate::buffer::{ChromaPlanes, Pixel, PixelBuffer, Plane};

/// Pixel types that can be linearly interpolated.
pub(crate) trait Lerp: Pixel {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

impl Lerp for [f32; 2] {
    #[inline]
    fn lerp(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
        [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
    }
}

/// Source coordinate and weight for one destination index, pixel centers aligned.
#[inline]
fn source_position(dst: usize, scale: f32, src_len: usize) -> (usize, usize, f32) {
    let pos = ((dst as f32 + 0.5) * scale - 0.5).clamp(0.0, (src_len - 1) as f32);
    let i0 = pos.floor() as usize;
    let i1 = (i0 + 1).min(src_len - 1);
    (i0, i1, pos - i0 as f32)
}

pub(crate) fn resize_bilinear<P: Lerp>(
    src: &PixelBuffer<P>,
    width: usize,
    height: usize,
) -> Result<PixelBuffer<P>, EnhanceError> {
    src.ensure_not_empty()?;
    if width == 0 || height == 0 {
        return Err(EnhanceError::EmptyInput { width, height });
    }
    if src.dimensions() == (width, height) {
        return Ok(src.clone());
    }

    let scale_x = src.width() as f32 / width as f32;
    let scale_y = src.height() as f32 / height as f32;
    let columns: Vec<_> = (0..width)
        .map(|x| source_position(x, scale_x, src.width()))
        .collect();

    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        let (y0, y1, ty) = source_position(y, scale_y, src.height());
        let (row0, row1) = (src.row(y0), src.row(y1));
        for &(x0, x1, tx) in &columns {
            let top = P::lerp(row0[x0], row0[x1], tx);
            let bottom = P::lerp(row1[x0], row1[x1], tx);
            pixels.push(P::lerp(top, bottom, ty));
        }
    }
    PixelBuffer::from_pixels(width, height, pixels)
}

/// Resize a lightness plane with bilinear interpolation.
pub fn resize_plane(plane: &Plane, width: usize, height: usize) -> Result<Plane, EnhanceError> {
    resize_bilinear(plane, width, height)
}

/// Resize predicted chrominance to `width x height`.
///
/// Predictors call this to bring their fixed-resolution output back to
/// the size of the photograph before handing it to composition.
pub fn resample_chroma(
    chroma: &ChromaPlanes,
    width: usize,
    height: usize,
) -> Result<ChromaPlanes, EnhanceError> {
    resize_bilinear(chroma, width, height)
}

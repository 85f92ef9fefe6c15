//! 2x spatial upscaling with a 4-lobe Lanczos filter.

use std::f32::consts::PI;

use super::kernel::saturate_u8;
use crate::api::EnhanceError;
use crate::buffer::Rgb8Image;
use crate::pipeline::Stage;

const SCALE: usize = 2;
const LOBES: usize = 4;
const TAPS: usize = 2 * LOBES;

/// Doubles width and height.
///
/// Each output pixel center maps back to `(dst + 0.5) / 2 - 0.5` in the
/// source; the eight nearest source samples along each axis are weighted
/// by `sinc(t) * sinc(t / 4)` and normalized. Samples past the edge
/// repeat the edge pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Upscaler;

#[inline]
fn lanczos4(t: f32) -> f32 {
    let t = t.abs();
    if t < 1e-6 {
        return 1.0;
    }
    if t >= LOBES as f32 {
        return 0.0;
    }
    let pt = PI * t;
    LOBES as f32 * pt.sin() * (pt / LOBES as f32).sin() / (pt * pt)
}

/// First source index and normalized weights for one output index.
fn taps(dst: usize) -> (isize, [f32; TAPS]) {
    let pos = (dst as f32 + 0.5) / SCALE as f32 - 0.5;
    let base = pos.floor();
    let frac = pos - base;

    let mut weights = [0.0f32; TAPS];
    for (k, w) in weights.iter_mut().enumerate() {
        let offset = k as f32 - (LOBES - 1) as f32;
        *w = lanczos4(frac - offset);
    }
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    (base as isize - (LOBES as isize - 1), weights)
}

impl Upscaler {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Upscaler {
    fn name(&self) -> &'static str {
        "upscale"
    }

    fn output_dimensions(&self, width: usize, height: usize) -> (usize, usize) {
        (width * SCALE, height * SCALE)
    }

    fn apply(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError> {
        image.ensure_not_empty()?;
        let (w, h) = image.dimensions();
        let (out_w, out_h) = self.output_dimensions(w, h);

        // horizontal pass: w x h -> out_w x h, kept in float
        let mut wide = Vec::with_capacity(out_w * h);
        let columns: Vec<_> = (0..out_w).map(taps).collect();
        for y in 0..h as isize {
            for (start, weights) in &columns {
                let mut acc = [0.0f32; 3];
                for (k, &weight) in weights.iter().enumerate() {
                    let p = image.get_clamped(start + k as isize, y);
                    for c in 0..3 {
                        acc[c] += weight * p[c] as f32;
                    }
                }
                wide.push(acc);
            }
        }

        // vertical pass: out_w x h -> out_w x out_h
        let mut pixels = Vec::with_capacity(out_w * out_h);
        for y in 0..out_h {
            let (start, weights) = taps(y);
            let mut acc = vec![[0.0f32; 3]; out_w];
            for (k, &weight) in weights.iter().enumerate() {
                let sy = (start + k as isize).clamp(0, h as isize - 1) as usize;
                let src = &wide[sy * out_w..(sy + 1) * out_w];
                for (a, s) in acc.iter_mut().zip(src) {
                    for c in 0..3 {
                        a[c] += weight * s[c];
                    }
                }
            }
            pixels.extend(
                acc.iter()
                    .map(|a| [saturate_u8(a[0]), saturate_u8(a[1]), saturate_u8(a[2])]),
            );
        }

        Rgb8Image::from_pixels(out_w, out_h, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_double() {
        let image = Rgb8Image::filled(5, 3, [10, 20, 30]);
        let out = Upscaler.apply(&image).unwrap();
        assert_eq!(out.dimensions(), (10, 6));
    }

    #[test]
    fn test_constant_image_stays_constant() {
        let image = Rgb8Image::filled(6, 4, [200, 100, 7]);
        let out = Upscaler.apply(&image).unwrap();
        assert!(out.pixels().iter().all(|&p| p == [200, 100, 7]));
    }

    #[test]
    fn test_single_pixel() {
        let image = Rgb8Image::filled(1, 1, [1, 2, 3]);
        let out = Upscaler.apply(&image).unwrap();
        assert_eq!(out.dimensions(), (2, 2));
        assert!(out.pixels().iter().all(|&p| p == [1, 2, 3]));
    }

    #[test]
    fn test_single_column_repeats_edge_horizontally() {
        let image = Rgb8Image::from_fn(1, 3, |_, y| [(y * 100) as u8, 50, 200]);
        let out = Upscaler.apply(&image).unwrap();
        assert_eq!(out.dimensions(), (2, 6));
        for y in 0..6 {
            assert_eq!(out.get(0, y), out.get(1, y));
        }
        assert_eq!(out.get(0, 0)[1], 50);
    }

    #[test]
    fn test_taps_are_normalized_and_mirror_phases() {
        let (start_even, even) = taps(4);
        let (start_odd, odd) = taps(5);
        assert_eq!(start_even, -2);
        assert_eq!(start_odd, -1);
        assert!((even.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        // the two phases are reflections of each other
        for k in 0..TAPS {
            assert!((even[k] - odd[TAPS - 1 - k]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_edge_is_preserved_on_step() {
        let image = Rgb8Image::from_fn(8, 1, |x, _| if x < 4 { [0; 3] } else { [255; 3] });
        let out = Upscaler.apply(&image).unwrap();
        assert_eq!(out.get(0, 0), [0, 0, 0]);
        assert_eq!(out.get(15, 1), [255, 255, 255]);
        assert!(out.get(7, 0)[0] < out.get(8, 0)[0]);
    }

    #[test]
    fn test_is_deterministic() {
        let image = Rgb8Image::from_fn(7, 5, |x, y| [(x * 31) as u8, (y * 47) as u8, (x * y) as u8]);
        assert_eq!(Upscaler.apply(&image), Upscaler.apply(&image));
    }
}

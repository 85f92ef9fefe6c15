//! Contrast-limited adaptive histogram equalization on lightness.
//!
//! The image is split into a grid of tiles. Each tile gets its own
//! equalization lookup table built from a clipped histogram, and every
//! pixel is mapped through a bilinear blend of the four nearest tile
//! tables so tile seams never show. Only the L channel of the 8-bit Lab
//! packing is touched; a and b pass through byte-for-byte.

use serde::Deserialize;

use super::kernel::{reflect101, saturate_u8};
use super::{invalid, positive};
use crate::api::EnhanceError;
use crate::buffer::{Lab8Image, Rgb8Image};
use crate::color::Lab8;
use crate::pipeline::Stage;

const BINS: usize = 256;

/// CLAHE on the lightness channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContrastEqualizer {
    /// Histogram clip threshold, relative to a flat histogram
    pub clip_limit: f32,
    /// Number of tiles across and down
    pub tile_grid: (usize, usize),
}

impl Default for ContrastEqualizer {
    fn default() -> Self {
        Self {
            clip_limit: 3.0,
            tile_grid: (8, 8),
        }
    }
}

impl ContrastEqualizer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clip_limit(mut self, limit: f32) -> Self {
        self.clip_limit = limit;
        self
    }

    #[inline]
    pub fn tile_grid(mut self, columns: usize, rows: usize) -> Self {
        self.tile_grid = (columns, rows);
        self
    }

    pub fn validate(&self) -> Result<(), EnhanceError> {
        if !positive(self.clip_limit) {
            return Err(invalid("clahe.clip_limit", "must be positive"));
        }
        if self.tile_grid.0 == 0 || self.tile_grid.1 == 0 {
            return Err(invalid("clahe.tile_grid", "must have at least one tile"));
        }
        Ok(())
    }

    /// Equalize a single 8-bit lightness plane of `width x height`.
    pub fn equalize(&self, lightness: &[u8], width: usize, height: usize) -> Vec<u8> {
        let (tiles_x, tiles_y) = self.tile_grid;
        let tile_w = width.div_ceil(tiles_x);
        let tile_h = height.div_ceil(tiles_y);
        let area = tile_w * tile_h;

        let clip = ((self.clip_limit * area as f32 / BINS as f32) as usize).max(1);
        let lut_scale = 255.0 / area as f32;

        // reflect-pad so that the grid covers the image exactly
        let sample = |x: usize, y: usize| {
            let sx = reflect101(x as isize, width);
            let sy = reflect101(y as isize, height);
            lightness[sy * width + sx]
        };

        let mut luts = vec![[0u8; BINS]; tiles_x * tiles_y];
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let mut hist = [0usize; BINS];
                for y in ty * tile_h..(ty + 1) * tile_h {
                    for x in tx * tile_w..(tx + 1) * tile_w {
                        hist[sample(x, y) as usize] += 1;
                    }
                }
                clip_histogram(&mut hist, clip);

                let lut = &mut luts[ty * tiles_x + tx];
                let mut cumulative = 0usize;
                for (entry, &count) in lut.iter_mut().zip(&hist) {
                    cumulative += count;
                    *entry = saturate_u8(cumulative as f32 * lut_scale);
                }
            }
        }

        let inv_tw = 1.0 / tile_w as f32;
        let inv_th = 1.0 / tile_h as f32;
        let columns: Vec<_> = (0..width)
            .map(|x| tile_neighbors(x as f32 * inv_tw - 0.5, tiles_x))
            .collect();

        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            let (ty1, ty2, ya) = tile_neighbors(y as f32 * inv_th - 0.5, tiles_y);
            for (x, &(tx1, tx2, xa)) in columns.iter().enumerate() {
                let v = lightness[y * width + x] as usize;
                let top = luts[ty1 * tiles_x + tx1][v] as f32 * (1.0 - xa)
                    + luts[ty1 * tiles_x + tx2][v] as f32 * xa;
                let bottom = luts[ty2 * tiles_x + tx1][v] as f32 * (1.0 - xa)
                    + luts[ty2 * tiles_x + tx2][v] as f32 * xa;
                out.push(saturate_u8(top * (1.0 - ya) + bottom * ya));
            }
        }
        out
    }
}

/// Clip every bin at `limit` and hand the excess back evenly; whatever
/// does not divide evenly is spread one count at a time across the range.
fn clip_histogram(hist: &mut [usize; BINS], limit: usize) {
    let mut clipped = 0;
    for count in hist.iter_mut() {
        if *count > limit {
            clipped += *count - limit;
            *count = limit;
        }
    }

    let batch = clipped / BINS;
    let mut residual = clipped - batch * BINS;
    for count in hist.iter_mut() {
        *count += batch;
    }

    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// The two tiles surrounding a position in tile units and the weight of the second.
#[inline]
fn tile_neighbors(pos: f32, tiles: usize) -> (usize, usize, f32) {
    let first = pos.floor();
    let weight = pos - first;
    let first = first as isize;
    let lo = first.max(0) as usize;
    let hi = ((first + 1) as usize).min(tiles - 1);
    (lo, hi, weight)
}

/// Equalize the L channel of a packed Lab image with default settings.
///
/// The a and b bytes of every pixel are returned unchanged.
pub fn equalize_lightness(lab: &Lab8Image) -> Result<Lab8Image, EnhanceError> {
    ContrastEqualizer::default().equalize_lab8(lab)
}

impl ContrastEqualizer {
    pub fn equalize_lab8(&self, lab: &Lab8Image) -> Result<Lab8Image, EnhanceError> {
        lab.ensure_not_empty()?;
        let (w, h) = lab.dimensions();
        let lightness: Vec<u8> = lab.pixels().iter().map(|p| p.l).collect();
        let equalized = self.equalize(&lightness, w, h);

        let pixels = lab
            .pixels()
            .iter()
            .zip(equalized)
            .map(|(p, l)| Lab8 { l, ..*p })
            .collect();
        Lab8Image::from_pixels(w, h, pixels)
    }
}

impl Stage for ContrastEqualizer {
    fn name(&self) -> &'static str {
        "clahe"
    }

    fn apply(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError> {
        image.ensure_not_empty()?;
        let lab = image.map(Lab8::from_bytes);
        Ok(self.equalize_lab8(&lab)?.map(Lab8::to_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let c = ContrastEqualizer::default();
        assert_eq!(c.clip_limit, 3.0);
        assert_eq!(c.tile_grid, (8, 8));
    }

    #[test]
    fn test_validate() {
        assert!(ContrastEqualizer::new().validate().is_ok());
        assert!(ContrastEqualizer::new().clip_limit(0.0).validate().is_err());
        assert!(ContrastEqualizer::new().tile_grid(0, 8).validate().is_err());
    }

    #[test]
    fn test_clip_histogram_preserves_total() {
        let mut hist = [0usize; BINS];
        hist[10] = 900;
        hist[200] = 124;
        clip_histogram(&mut hist, 12);
        assert_eq!(hist.iter().sum::<usize>(), 1024);
        // the excess is spread, so the tallest bin is barely above the limit
        assert!(*hist.iter().max().unwrap() <= 12 + 1024 / BINS + 1);
    }

    #[test]
    fn test_chroma_bytes_untouched() {
        let lab = Lab8Image::from_fn(20, 14, |x, y| {
            Lab8::new((x * 12) as u8, (100 + y) as u8, (150 - x) as u8)
        });
        let out = equalize_lightness(&lab).unwrap();
        for (a, b) in lab.pixels().iter().zip(out.pixels()) {
            assert_eq!((a.a, a.b), (b.a, b.b));
        }
    }

    #[test]
    fn test_low_contrast_ramp_is_stretched() {
        let (w, h) = (64, 64);
        let lightness: Vec<u8> = (0..w * h).map(|i| 100 + ((i % w) / 8) as u8).collect();
        let out = ContrastEqualizer::new().tile_grid(1, 1).equalize(&lightness, w, h);

        let span = |v: &[u8]| v.iter().max().unwrap() - v.iter().min().unwrap();
        assert!(span(&out) > span(&lightness));
    }

    #[test]
    fn test_ordering_within_tile_is_preserved() {
        let lightness: Vec<u8> = (0..16u8).map(|v| v * 10).collect();
        let out = ContrastEqualizer::new().tile_grid(1, 1).equalize(&lightness, 16, 1);
        for pair in out.windows(2) {
            assert!(pair[0] <= pair[1], "{out:?}");
        }
    }

    #[test]
    fn test_tiny_image_smaller_than_grid() {
        let lab = Lab8Image::filled(3, 2, Lab8::new(128, 128, 128));
        let out = equalize_lightness(&lab).unwrap();
        assert_eq!(out.dimensions(), (3, 2));
    }
}

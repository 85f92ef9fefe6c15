//! Non-local means denoising on the 8-bit Lab representation.
//!
//! Lightness is filtered on its own with strength `h`; the two chroma
//! channels are filtered jointly with `h_color`, so a and b always share
//! the same patch weights.
//!
//! For every search offset the squared difference image is computed once
//! and box-summed over the template window with running sums, which keeps
//! the cost at O(search^2 * pixels) regardless of the template size.

use serde::Deserialize;

use super::kernel::{reflect101, saturate_u8};
use super::{invalid, positive};
use crate::api::EnhanceError;
use crate::buffer::{Lab8Image, Rgb8Image};
use crate::color::Lab8;
use crate::pipeline::Stage;

/// Non-local means denoiser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Denoiser {
    /// Filter strength for lightness
    pub h: f32,
    /// Filter strength for the chroma pair
    pub h_color: f32,
    /// Side of the square patch compared between pixels (odd)
    pub template_window: usize,
    /// Side of the square area searched for similar patches (odd)
    pub search_window: usize,
}

impl Default for Denoiser {
    fn default() -> Self {
        Self {
            h: 10.0,
            h_color: 10.0,
            template_window: 7,
            search_window: 21,
        }
    }
}

impl Denoiser {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn h(mut self, h: f32) -> Self {
        self.h = h;
        self
    }

    #[inline]
    pub fn h_color(mut self, h_color: f32) -> Self {
        self.h_color = h_color;
        self
    }

    #[inline]
    pub fn template_window(mut self, size: usize) -> Self {
        self.template_window = size;
        self
    }

    #[inline]
    pub fn search_window(mut self, size: usize) -> Self {
        self.search_window = size;
        self
    }

    pub fn validate(&self) -> Result<(), EnhanceError> {
        if !positive(self.h) {
            return Err(invalid("denoise.h", "must be positive"));
        }
        if !positive(self.h_color) {
            return Err(invalid("denoise.h_color", "must be positive"));
        }
        if self.template_window == 0 || self.template_window % 2 == 0 {
            return Err(invalid("denoise.template_window", "must be odd"));
        }
        if self.search_window == 0 || self.search_window % 2 == 0 {
            return Err(invalid("denoise.search_window", "must be odd"));
        }
        Ok(())
    }

    /// Denoise a packed Lab image.
    pub fn denoise_lab8(&self, lab: &Lab8Image) -> Result<Lab8Image, EnhanceError> {
        let (w, h) = lab.dimensions();
        let lightness: Vec<[u8; 1]> = lab.pixels().iter().map(|p| [p.l]).collect();
        let chroma: Vec<[u8; 2]> = lab.pixels().iter().map(|p| [p.a, p.b]).collect();

        let l = nl_means(&lightness, w, h, self.h, self.template_window, self.search_window);
        let ab = nl_means(&chroma, w, h, self.h_color, self.template_window, self.search_window);

        let pixels = l
            .iter()
            .zip(&ab)
            .map(|(l, ab)| Lab8::new(l[0], ab[0], ab[1]))
            .collect();
        Lab8Image::from_pixels(w, h, pixels)
    }
}

/// Reflect-padded copy of a channel group, as `i32` for exact integer SSDs.
struct Padded<const C: usize> {
    width: usize,
    data: Vec<[i32; C]>,
}

impl<const C: usize> Padded<C> {
    fn new(src: &[[u8; C]], w: usize, h: usize, pad: usize) -> Self {
        let width = w + 2 * pad;
        let height = h + 2 * pad;
        let mut data = Vec::with_capacity(width * height);
        for py in 0..height {
            let sy = reflect101(py as isize - pad as isize, h);
            for px in 0..width {
                let sx = reflect101(px as isize - pad as isize, w);
                data.push(src[sy * w + sx].map(i32::from));
            }
        }
        Self { width, data }
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> [i32; C] {
        self.data[y * self.width + x]
    }
}

fn nl_means<const C: usize>(
    src: &[[u8; C]],
    w: usize,
    h: usize,
    strength: f32,
    template: usize,
    search: usize,
) -> Vec<[u8; C]> {
    let ht = template / 2;
    let hs = search / 2;
    let pad = hs + ht;
    let padded = Padded::new(src, w, h, pad);

    // difference image covers every pixel a template centered in the image touches
    let rw = w + 2 * ht;
    let rh = h + 2 * ht;
    let norm = 1.0 / ((template * template * C) as f32 * strength * strength);

    let mut acc = vec![[0.0f32; C]; w * h];
    let mut weight_sum = vec![0.0f32; w * h];
    let mut diff = vec![0u32; rw * rh];
    let mut rows = vec![0u32; w * rh];

    for dy in -(hs as isize)..=hs as isize {
        for dx in -(hs as isize)..=hs as isize {
            for ry in 0..rh {
                let y0 = hs + ry;
                let y1 = (y0 as isize + dy) as usize;
                for rx in 0..rw {
                    let x0 = hs + rx;
                    let x1 = (x0 as isize + dx) as usize;
                    let (a, b) = (padded.at(x0, y0), padded.at(x1, y1));
                    let mut d = 0u32;
                    for c in 0..C {
                        let e = a[c] - b[c];
                        d += (e * e) as u32;
                    }
                    diff[ry * rw + rx] = d;
                }
            }

            // horizontal running sum over the template width
            for ry in 0..rh {
                let line = &diff[ry * rw..(ry + 1) * rw];
                let mut sum: u32 = line[..template].iter().sum();
                rows[ry * w] = sum;
                for x in 1..w {
                    sum = sum + line[x + template - 1] - line[x - 1];
                    rows[ry * w + x] = sum;
                }
            }

            // vertical running sum, then weight and accumulate
            for x in 0..w {
                let mut ssd: u32 = (0..template).map(|ry| rows[ry * w + x]).sum();
                for y in 0..h {
                    if y > 0 {
                        ssd = ssd + rows[(y + template - 1) * w + x] - rows[(y - 1) * w + x];
                    }
                    let weight = (-(ssd as f32) * norm).exp();
                    let neighbor = padded.at(
                        (pad as isize + x as isize + dx) as usize,
                        (pad as isize + y as isize + dy) as usize,
                    );
                    let i = y * w + x;
                    weight_sum[i] += weight;
                    for c in 0..C {
                        acc[i][c] += weight * neighbor[c] as f32;
                    }
                }
            }
        }
    }

    acc.iter()
        .zip(&weight_sum)
        .map(|(a, &ws)| a.map(|v| saturate_u8(v / ws)))
        .collect()
}

impl Stage for Denoiser {
    fn name(&self) -> &'static str {
        "denoise"
    }

    fn apply(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError> {
        image.ensure_not_empty()?;
        let lab = image.map(Lab8::from_bytes);
        Ok(self.denoise_lab8(&lab)?.map(Lab8::to_bytes))
    }
}

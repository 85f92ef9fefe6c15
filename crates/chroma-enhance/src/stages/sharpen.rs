//! Detail sharpening: unsharp mask blended with a 3x3 high-pass kernel.
//!
//! Two paths run on every channel:
//!
//! - unsharp: the Gaussian residual `x - blur(x)` is stored biased by
//!   mid-gray in an 8-bit intermediate, unbiased, and added back with
//!   weight `amount`
//! - detail: `x + laplacian(x) / 9`, where the Laplacian has center 8 and
//!   neighbors -1, so the taps sum to one
//!
//! The two results are blended and narrowed. Both paths leave a flat
//! region exactly as it was.

use serde::Deserialize;

use super::kernel::{gaussian_kernel, gaussian_size, saturate_u8, split_rgb, Channel};
use super::{invalid, positive};
use crate::api::EnhanceError;
use crate::buffer::Rgb8Image;
use crate::pipeline::Stage;

const MID_GRAY: f32 = 128.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetailSharpener {
    /// Gaussian sigma of the unsharp path
    pub sigma: f32,
    /// Weight of the residual added back by the unsharp path
    pub amount: f32,
    /// Share of the unsharp path in the final blend; the kernel path gets the rest
    pub unsharp_weight: f32,
}

impl Default for DetailSharpener {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            amount: 0.2,
            unsharp_weight: 0.7,
        }
    }
}

impl DetailSharpener {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    #[inline]
    pub fn amount(mut self, amount: f32) -> Self {
        self.amount = amount;
        self
    }

    #[inline]
    pub fn unsharp_weight(mut self, weight: f32) -> Self {
        self.unsharp_weight = weight;
        self
    }

    pub fn validate(&self) -> Result<(), EnhanceError> {
        if !positive(self.sigma) {
            return Err(invalid("sharpen.sigma", "must be positive"));
        }
        if !self.amount.is_finite() {
            return Err(invalid("sharpen.amount", "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.unsharp_weight) {
            return Err(invalid("sharpen.unsharp_weight", "must be within 0.0..=1.0"));
        }
        Ok(())
    }

    fn sharpen_channel(&self, channel: &Channel, kernel: &[f32]) -> Vec<u8> {
        let blurred = channel.convolve_separable(kernel);
        let (w, h) = (channel.width, channel.height);

        let mut out = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let v = channel.at(x, y);

                let biased = saturate_u8(v - blurred.at(x, y) + MID_GRAY) as f32;
                let sharpened = v + self.amount * (biased - MID_GRAY);

                let (xi, yi) = (x as isize, y as isize);
                let mut neighbors = 0.0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if (dx, dy) != (0, 0) {
                            neighbors += channel.at_reflect(xi + dx, yi + dy);
                        }
                    }
                }
                let detail = v + (8.0 * v - neighbors) / 9.0;

                let blended =
                    self.unsharp_weight * sharpened + (1.0 - self.unsharp_weight) * detail;
                out.push(saturate_u8(blended));
            }
        }
        out
    }
}

impl Stage for DetailSharpener {
    fn name(&self) -> &'static str {
        "sharpen"
    }

    fn apply(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError> {
        image.ensure_not_empty()?;
        let kernel = gaussian_kernel(self.sigma, gaussian_size(self.sigma));
        let [r, g, b] = split_rgb(image).map(|c| self.sharpen_channel(&c, &kernel));

        let (w, h) = image.dimensions();
        let pixels = (0..w * h).map(|i| [r[i], g[i], b[i]]).collect();
        Rgb8Image::from_pixels(w, h, pixels)
    }
}

//! Edge-preserving bilateral smoothing.

use serde::Deserialize;

use super::kernel::{reflect101, saturate_u8};
use super::{invalid, positive};
use crate::api::EnhanceError;
use crate::buffer::Rgb8Image;
use crate::pipeline::Stage;

/// Largest possible sum of absolute channel differences between two 8-bit RGB pixels.
const MAX_COLOR_DISTANCE: usize = 3 * 255;

/// Bilateral filter over a circular neighborhood.
///
/// Each neighbor is weighted by its spatial distance and by the sum of
/// absolute channel differences to the center pixel, both through
/// `exp(-d^2 / 2 sigma^2)`. Neighbors across a strong edge receive almost
/// no weight, so flat regions smooth while edges stay put.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BilateralSmoother {
    /// Neighborhood diameter in pixels
    pub diameter: usize,
    pub sigma_color: f32,
    pub sigma_space: f32,
}

impl Default for BilateralSmoother {
    fn default() -> Self {
        Self {
            diameter: 9,
            sigma_color: 75.0,
            sigma_space: 75.0,
        }
    }
}

impl BilateralSmoother {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn diameter(mut self, diameter: usize) -> Self {
        self.diameter = diameter;
        self
    }

    #[inline]
    pub fn sigma_color(mut self, sigma: f32) -> Self {
        self.sigma_color = sigma;
        self
    }

    #[inline]
    pub fn sigma_space(mut self, sigma: f32) -> Self {
        self.sigma_space = sigma;
        self
    }

    pub fn validate(&self) -> Result<(), EnhanceError> {
        if self.diameter == 0 {
            return Err(invalid("bilateral.diameter", "must be at least 1"));
        }
        if !positive(self.sigma_color) {
            return Err(invalid("bilateral.sigma_color", "must be positive"));
        }
        if !positive(self.sigma_space) {
            return Err(invalid("bilateral.sigma_space", "must be positive"));
        }
        Ok(())
    }

    /// Offsets inside the circular support with their spatial weights.
    fn spatial_taps(&self) -> Vec<(isize, isize, f32)> {
        let radius = (self.diameter / 2) as isize;
        let coeff = -0.5 / (self.sigma_space * self.sigma_space);
        let mut taps = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let r2 = (dx * dx + dy * dy) as f32;
                if r2.sqrt() > radius as f32 {
                    continue;
                }
                taps.push((dx, dy, (r2 * coeff).exp()));
            }
        }
        taps
    }

    fn color_weights(&self) -> Vec<f32> {
        let coeff = -0.5 / (self.sigma_color * self.sigma_color);
        (0..=MAX_COLOR_DISTANCE)
            .map(|d| ((d * d) as f32 * coeff).exp())
            .collect()
    }
}

impl Stage for BilateralSmoother {
    fn name(&self) -> &'static str {
        "bilateral"
    }

    fn apply(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError> {
        image.ensure_not_empty()?;
        let (w, h) = image.dimensions();
        let taps = self.spatial_taps();
        let color = self.color_weights();

        let pixels = (0..w * h)
            .map(|i| {
                let (x, y) = ((i % w) as isize, (i / w) as isize);
                let center = image.pixels()[i];
                let mut acc = [0.0f32; 3];
                let mut weight_sum = 0.0f32;
                for &(dx, dy, spatial) in &taps {
                    let p = image.get(reflect101(x + dx, w), reflect101(y + dy, h));
                    let distance: usize = (0..3).map(|c| p[c].abs_diff(center[c]) as usize).sum();
                    let weight = spatial * color[distance];
                    weight_sum += weight;
                    for c in 0..3 {
                        acc[c] += weight * p[c] as f32;
                    }
                }
                acc.map(|v| saturate_u8(v / weight_sum))
            })
            .collect();
        Rgb8Image::from_pixels(w, h, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let b = BilateralSmoother::default();
        assert_eq!(b.diameter, 9);
        assert_eq!((b.sigma_color, b.sigma_space), (75.0, 75.0));
    }

    #[test]
    fn test_support_is_circular() {
        let taps = BilateralSmoother::default().spatial_taps();
        // radius 4 disc on the integer lattice
        assert_eq!(taps.len(), 49);
        assert!(taps.iter().any(|&(dx, dy, _)| (dx, dy) == (4, 0)));
        assert!(!taps.iter().any(|&(dx, dy, _)| (dx, dy) == (4, 4)));
    }

    #[test]
    fn test_constant_image_unchanged() {
        let image = Rgb8Image::filled(7, 5, [33, 66, 99]);
        assert_eq!(BilateralSmoother::default().apply(&image).unwrap(), image);
    }

    #[test]
    fn test_strong_edge_is_kept() {
        let image = Rgb8Image::from_fn(12, 4, |x, _| if x < 6 { [10; 3] } else { [245; 3] });
        let out = BilateralSmoother::new().sigma_color(10.0).apply(&image).unwrap();
        assert_eq!(out.get(5, 2), [10, 10, 10]);
        assert_eq!(out.get(6, 2), [245, 245, 245]);
    }

    #[test]
    fn test_small_noise_is_smoothed() {
        let image = Rgb8Image::from_fn(9, 9, |x, y| if (x + y) % 2 == 0 { [100; 3] } else { [110; 3] });
        let out = BilateralSmoother::default().apply(&image).unwrap();
        let [v, _, _] = out.get(4, 4);
        assert!((102..=108).contains(&v), "got {v}");
    }
}

//! Skin-tone saturation correction.
//!
//! Colorization models tend to wash out skin. Pixels whose HSV falls in a
//! warm, moderately saturated, reasonably bright range are collected into
//! a mask, the mask is cleaned up morphologically, and saturation inside
//! it is boosted proportionally.

use serde::Deserialize;

use super::invalid;
use super::morphology::{close, open, StructuringElement};
use crate::api::EnhanceError;
use crate::buffer::{Mask, Rgb8Image};
use crate::color::Hsv;
use crate::pipeline::Stage;

/// Inclusive bounds on the 8-bit HSV scale (hue 0..180).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }
}

impl Default for HsvRange {
    fn default() -> Self {
        Self {
            lower: [0, 20, 70],
            upper: [20, 255, 255],
        }
    }
}

/// Boosts saturation inside detected skin regions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkinToneCorrector {
    pub range: HsvRange,
    /// Side of the elliptical structuring element
    pub kernel_size: usize,
    /// Extra saturation at full mask strength: 0.15 means +15%
    pub boost: f32,
}

impl Default for SkinToneCorrector {
    fn default() -> Self {
        Self {
            range: HsvRange::default(),
            kernel_size: 5,
            boost: 0.15,
        }
    }
}

impl SkinToneCorrector {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn range(mut self, range: HsvRange) -> Self {
        self.range = range;
        self
    }

    #[inline]
    pub fn kernel_size(mut self, size: usize) -> Self {
        self.kernel_size = size;
        self
    }

    #[inline]
    pub fn boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn validate(&self) -> Result<(), EnhanceError> {
        if self.kernel_size == 0 {
            return Err(invalid("skin.kernel_size", "must be at least 1"));
        }
        if !self.boost.is_finite() || self.boost < 0.0 {
            return Err(invalid("skin.boost", "must be a finite, non-negative number"));
        }
        if (0..3).any(|c| self.range.lower[c] > self.range.upper[c]) {
            return Err(invalid("skin.range", "lower bound exceeds upper bound"));
        }
        Ok(())
    }

    /// Cleaned-up skin mask: 255 inside skin regions, 0 elsewhere.
    pub fn mask(&self, image: &Rgb8Image) -> Mask {
        let raw = image.map(|p| {
            if self.range.contains(Hsv::from_rgb8(p).to_u8_scale()) {
                255u8
            } else {
                0
            }
        });
        let element = StructuringElement::ellipse(self.kernel_size, self.kernel_size);
        open(&close(&raw, &element), &element)
    }
}

/// Skin mask of an 8-bit RGB image with default settings.
pub fn skin_mask(image: &Rgb8Image) -> Mask {
    SkinToneCorrector::default().mask(image)
}

impl Stage for SkinToneCorrector {
    fn name(&self) -> &'static str {
        "skin"
    }

    fn apply(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError> {
        image.ensure_not_empty()?;
        let mask = self.mask(image);
        let (w, h) = image.dimensions();

        let pixels = image
            .pixels()
            .iter()
            .zip(mask.pixels())
            .map(|(&p, &m)| {
                if m == 0 {
                    return p;
                }
                let factor = 1.0 + self.boost * m as f32 / 255.0;
                Hsv::from_rgb8(p).scale_saturation(factor).to_rgb8()
            })
            .collect();
        Rgb8Image::from_pixels(w, h, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKIN: [u8; 3] = [200, 150, 120];
    const SKY: [u8; 3] = [70, 110, 200];

    #[test]
    fn test_default_range() {
        assert!(HsvRange::default().contains([10, 100, 200]));
        assert!(!HsvRange::default().contains([21, 100, 200]));
        assert!(!HsvRange::default().contains([10, 19, 200]));
        assert!(!HsvRange::default().contains([10, 100, 69]));
    }

    #[test]
    fn test_skin_color_is_detected() {
        let hsv = Hsv::from_rgb8(SKIN).to_u8_scale();
        assert!(HsvRange::default().contains(hsv), "{hsv:?}");
        assert!(!HsvRange::default().contains(Hsv::from_rgb8(SKY).to_u8_scale()));
    }

    #[test]
    fn test_no_skin_is_identity() {
        let image = Rgb8Image::filled(10, 10, SKY);
        assert_eq!(SkinToneCorrector::default().apply(&image).unwrap(), image);
    }

    #[test]
    fn test_skin_block_is_boosted() {
        let image = Rgb8Image::filled(10, 10, SKIN);
        let out = SkinToneCorrector::default().apply(&image).unwrap();
        let before = Hsv::from_rgb8(SKIN).s;
        let after = Hsv::from_rgb8(out.get(5, 5)).s;
        assert!(after > before, "{before} -> {after}");
    }

    #[test]
    fn test_isolated_skin_pixel_is_ignored() {
        let image = Rgb8Image::from_fn(9, 9, |x, y| if (x, y) == (4, 4) { SKIN } else { SKY });
        let mask = skin_mask(&image);
        assert!(mask.pixels().iter().all(|&m| m == 0));
        assert_eq!(SkinToneCorrector::default().apply(&image).unwrap(), image);
    }

    #[test]
    fn test_validate() {
        assert!(SkinToneCorrector::default().validate().is_ok());
        assert!(SkinToneCorrector::new().kernel_size(0).validate().is_err());
        let inverted = HsvRange {
            lower: [30, 0, 0],
            upper: [20, 255, 255],
        };
        assert!(SkinToneCorrector::new().range(inverted).validate().is_err());
    }
}

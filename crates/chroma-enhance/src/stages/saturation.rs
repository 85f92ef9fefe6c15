//! Global saturation gain in HSV.

use serde::Deserialize;

use super::invalid;
use crate::api::EnhanceError;
use crate::buffer::Rgb8Image;
use crate::color::Hsv;
use crate::pipeline::Stage;

/// Multiplies HSV saturation of every pixel by `gain`.
///
/// Saturation is clipped to the 8-bit range after scaling. Hue and value
/// are untouched, and a gain of exactly 1.0 returns the input unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SaturationBooster {
    pub gain: f32,
}

impl Default for SaturationBooster {
    fn default() -> Self {
        Self { gain: 1.2 }
    }
}

impl SaturationBooster {
    #[inline]
    pub fn new(gain: f32) -> Self {
        Self { gain }
    }

    pub fn validate(&self) -> Result<(), EnhanceError> {
        if !self.gain.is_finite() || self.gain < 0.0 {
            return Err(invalid("saturation.gain", "must be a finite, non-negative number"));
        }
        Ok(())
    }
}

impl Stage for SaturationBooster {
    fn name(&self) -> &'static str {
        "saturation"
    }

    fn apply(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError> {
        image.ensure_not_empty()?;
        if self.gain == 1.0 {
            return Ok(image.clone());
        }
        let gain = self.gain;
        Ok(image.map(|p| Hsv::from_rgb8(p).scale_saturation(gain).to_rgb8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Rgb8Image {
        Rgb8Image::from_fn(16, 16, |x, y| [(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8])
    }

    #[test]
    fn test_unit_gain_is_identity() {
        let image = sample();
        assert_eq!(SaturationBooster::new(1.0).apply(&image).unwrap(), image);
    }

    #[test]
    fn test_gray_stays_gray() {
        let image = Rgb8Image::filled(4, 4, [90, 90, 90]);
        let out = SaturationBooster::default().apply(&image).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_boost_increases_spread() {
        let image = Rgb8Image::filled(1, 1, [180, 120, 100]);
        let out = SaturationBooster::default().apply(&image).unwrap().get(0, 0);
        // value (max channel) is kept, the minimum drops
        assert_eq!(out[0], 180);
        assert!(out[2] < 100);
    }

    #[test]
    fn test_zero_gain_desaturates() {
        let image = Rgb8Image::filled(1, 1, [200, 50, 10]);
        let [r, g, b] = SaturationBooster::new(0.0).apply(&image).unwrap().get(0, 0);
        assert_eq!((r, g, b), (200, 200, 200));
    }

    #[test]
    fn test_validate() {
        assert!(SaturationBooster::default().validate().is_ok());
        assert!(SaturationBooster::new(-1.0).validate().is_err());
        assert!(SaturationBooster::new(f32::NAN).validate().is_err());
    }
}

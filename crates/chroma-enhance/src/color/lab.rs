//! CIE L*a*b* color space (D65)
//!
//! The colorization model predicts the a/b axes of this space, and the
//! contrast equalizer and denoiser both operate on its 8-bit packing.
//!
//! Constants follow the conventions used by common computer-vision
//! toolkits (sRGB primaries, D65 white `Xn = 0.950456`, `Zn = 1.088754`,
//! `903.3` linear segment below `L = 8`), so predictions from models
//! trained on those conversions compose without a color cast.

use super::linear_rgb::LinearRgb;
use super::srgb::Srgb;

const XN: f32 = 0.950456;
const ZN: f32 = 1.088754;
const EPSILON: f32 = 0.008856;
const KAPPA: f32 = 903.3;
const FX_THRESHOLD: f32 = 0.206893;
const F_OFFSET: f32 = 16.0 / 116.0;
const F_SLOPE: f32 = 7.787;

/// A color in CIE L*a*b*.
///
/// - `l`: lightness, 0.0 (black) to 100.0 (white)
/// - `a`: green (negative) to red (positive)
/// - `b`: blue (negative) to yellow (positive)
///
/// Not every Lab triple is inside the sRGB gamut; converting such colors
/// to [`LinearRgb`] yields components outside 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl Lab {
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }

    /// Lab of an 8-bit sRGB pixel.
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from(LinearRgb::from_bytes(bytes))
    }

    /// Lab of a float sRGB color.
    #[inline]
    pub fn from_srgb(srgb: Srgb) -> Self {
        Self::from(LinearRgb::from(srgb))
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        F_SLOPE * t + F_OFFSET
    }
}

#[inline]
fn lab_f_inv(f: f32) -> f32 {
    if f > FX_THRESHOLD {
        f * f * f
    } else {
        (f - F_OFFSET) / F_SLOPE
    }
}

impl From<LinearRgb> for Lab {
    /// Linear RGB -> XYZ -> Lab.
    fn from(rgb: LinearRgb) -> Self {
        let x = (0.412453 * rgb.r + 0.357580 * rgb.g + 0.180423 * rgb.b) / XN;
        let y = 0.212671 * rgb.r + 0.715160 * rgb.g + 0.072169 * rgb.b;
        let z = (0.019334 * rgb.r + 0.119193 * rgb.g + 0.950227 * rgb.b) / ZN;

        let fx = lab_f(x);
        let fy = lab_f(y);
        let fz = lab_f(z);

        let l = if y > EPSILON {
            116.0 * fy - 16.0
        } else {
            KAPPA * y
        };

        Lab {
            l,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<Lab> for LinearRgb {
    /// Lab -> XYZ -> linear RGB. The result is not clamped.
    fn from(lab: Lab) -> Self {
        let (y, fy) = if lab.l <= KAPPA * EPSILON {
            let y = lab.l / KAPPA;
            (y, F_SLOPE * y + F_OFFSET)
        } else {
            let fy = (lab.l + 16.0) / 116.0;
            (fy * fy * fy, fy)
        };

        let x = lab_f_inv(lab.a / 500.0 + fy) * XN;
        let z = lab_f_inv(fy - lab.b / 200.0) * ZN;

        LinearRgb {
            r: 3.240479 * x - 1.537150 * y - 0.498535 * z,
            g: -0.969256 * x + 1.875991 * y + 0.041556 * z,
            b: 0.055648 * x - 0.204043 * y + 1.057311 * z,
        }
    }
}

/// Lab packed into three bytes.
///
/// `l` is scaled by 255/100, `a` and `b` are offset by 128. This is the
/// representation the contrast equalizer works on: its lightness histogram
/// has 256 bins and chroma survives the stage byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lab8 {
    pub l: u8,
    pub a: u8,
    pub b: u8,
}

impl Lab8 {
    #[inline]
    pub fn new(l: u8, a: u8, b: u8) -> Self {
        Self { l, a, b }
    }

    /// Pack an 8-bit sRGB pixel.
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from(Lab::from_bytes(bytes))
    }

    /// Unpack to 8-bit sRGB, clipping out-of-gamut colors.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        Srgb::from(LinearRgb::from(Lab::from(self))).to_bytes()
    }
}

#[inline]
fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl From<Lab> for Lab8 {
    fn from(lab: Lab) -> Self {
        Self {
            l: saturate_u8(lab.l * 255.0 / 100.0),
            a: saturate_u8(lab.a + 128.0),
            b: saturate_u8(lab.b + 128.0),
        }
    }
}

impl From<Lab8> for Lab {
    fn from(lab: Lab8) -> Self {
        Self {
            l: lab.l as f32 * 100.0 / 255.0,
            a: lab.a as f32 - 128.0,
            b: lab.b as f32 - 128.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::IntoColor;

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_white_and_black() {
        let white = Lab::from(LinearRgb::new(1.0, 1.0, 1.0));
        assert!(approx(white.l, 100.0, 0.01), "white L = {}", white.l);
        assert!(approx(white.a, 0.0, 0.01), "white a = {}", white.a);
        assert!(approx(white.b, 0.0, 0.01), "white b = {}", white.b);

        let black = Lab::from(LinearRgb::new(0.0, 0.0, 0.0));
        assert!(approx(black.l, 0.0, 1e-6));
        assert!(approx(black.a, 0.0, 1e-6));
        assert!(approx(black.b, 0.0, 1e-6));
    }

    #[test]
    fn test_neutral_lab_is_neutral_rgb() {
        for l in [5.0, 25.0, 50.0, 75.0, 95.0] {
            let rgb = LinearRgb::from(Lab::new(l, 0.0, 0.0));
            assert!(approx(rgb.r, rgb.g, 1e-4), "L={l}: {rgb:?}");
            assert!(approx(rgb.g, rgb.b, 1e-4), "L={l}: {rgb:?}");
        }
    }

    #[test]
    fn test_round_trip_in_gamut() {
        let samples = [
            LinearRgb::new(0.2, 0.4, 0.6),
            LinearRgb::new(0.9, 0.1, 0.05),
            LinearRgb::new(0.01, 0.02, 0.03),
            LinearRgb::new(0.5, 0.5, 0.5),
        ];
        for rgb in samples {
            let back = LinearRgb::from(Lab::from(rgb));
            assert!(approx(rgb.r, back.r, 1e-4), "{rgb:?} -> {back:?}");
            assert!(approx(rgb.g, back.g, 1e-4), "{rgb:?} -> {back:?}");
            assert!(approx(rgb.b, back.b, 1e-4), "{rgb:?} -> {back:?}");
        }
    }

    /// Cross-check against the `palette` crate's D65 Lab. The white points
    /// differ in the fifth decimal, so the tolerance is loose.
    #[test]
    fn test_matches_palette_crate() {
        for bytes in [[200u8, 120, 80], [30, 60, 200], [128, 128, 128], [250, 220, 10]] {
            let ours = Lab::from_bytes(bytes);
            let srgb = palette::Srgb::new(bytes[0], bytes[1], bytes[2]).into_format::<f32>();
            let theirs: palette::Lab = srgb.into_color();
            assert!(approx(ours.l, theirs.l, 0.1), "{bytes:?}: L {} vs {}", ours.l, theirs.l);
            assert!(approx(ours.a, theirs.a, 0.3), "{bytes:?}: a {} vs {}", ours.a, theirs.a);
            assert!(approx(ours.b, theirs.b, 0.3), "{bytes:?}: b {} vs {}", ours.b, theirs.b);
        }
    }

    #[test]
    fn test_lab8_packing() {
        let packed = Lab8::from(Lab::new(50.0, -20.0, 35.0));
        assert_eq!(packed, Lab8::new(128, 108, 163));

        let unpacked = Lab::from(Lab8::new(255, 128, 128));
        assert!(approx(unpacked.l, 100.0, 1e-4));
        assert_eq!(unpacked.a, 0.0);
        assert_eq!(unpacked.b, 0.0);
    }

    #[test]
    fn test_lab8_saturates() {
        let packed = Lab8::from(Lab::new(120.0, 200.0, -200.0));
        assert_eq!(packed, Lab8::new(255, 255, 0));
    }

    #[test]
    fn test_lab8_gray_round_trip() {
        for v in [0u8, 64, 128, 192, 255] {
            let packed = Lab8::from_bytes([v, v, v]);
            assert_eq!(packed.a, 128);
            assert_eq!(packed.b, 128);
            let bytes = packed.to_bytes();
            assert!(bytes[0].abs_diff(v) <= 1, "{v} -> {bytes:?}");
            assert_eq!(bytes[0], bytes[1]);
            assert_eq!(bytes[1], bytes[2]);
        }
    }
}

//! HSV color type
//!
//! Saturation boosting and skin detection both work in HSV. The pixel is
//! kept in floating point between the 8-bit decode and the 8-bit encode,
//! so scaling saturation never wraps and an unscaled round trip returns
//! the original bytes.

/// A color in HSV.
///
/// - `h`: hue in degrees, 0.0..360.0 (0.0 for achromatic colors)
/// - `s`: saturation, 0.0..=1.0
/// - `v`: value, 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    #[inline]
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Decompose an 8-bit RGB pixel.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        let r = rgb[0] as f32 / 255.0;
        let g = rgb[1] as f32 / 255.0;
        let b = rgb[2] as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max > 0.0 { delta / max } else { 0.0 };
        let h = if delta <= 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / delta
        } else if max == g {
            60.0 * (b - r) / delta + 120.0
        } else {
            60.0 * (r - g) / delta + 240.0
        };
        let h = if h < 0.0 { h + 360.0 } else { h };

        Self { h, s, v: max }
    }

    /// Recompose to 8-bit RGB, rounding each channel.
    pub fn to_rgb8(self) -> [u8; 3] {
        let v = self.v.clamp(0.0, 1.0);
        let s = self.s.clamp(0.0, 1.0);
        let h = self.h.rem_euclid(360.0) / 60.0;

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as u32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        [to_u8(r), to_u8(g), to_u8(b)]
    }

    /// Hue, saturation and value on the 8-bit scale used by skin-range
    /// thresholds: hue halved into 0..180, saturation and value in 0..=255.
    pub fn to_u8_scale(self) -> [u8; 3] {
        let h = (self.h / 2.0).round();
        let h = if h >= 180.0 { 0.0 } else { h };
        [h as u8, to_u8(self.s), to_u8(self.v)]
    }

    /// Multiply saturation by `factor`, clipping the 8-bit equivalent to
    /// 0..=255 before it is narrowed.
    #[inline]
    pub fn scale_saturation(self, factor: f32) -> Self {
        let s255 = (self.s * 255.0 * factor).clamp(0.0, 255.0);
        Self {
            s: s255 / 255.0,
            ..self
        }
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

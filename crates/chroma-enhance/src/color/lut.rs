//! sRGB transfer functions
//!
//! Float conversions evaluate the IEC 61966-2-1 curve directly in f64, so
//! the Lab round trip stays exact near black. 8-bit decode is a lookup in
//! a table pre-computed by build.rs.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Convert a gamma-encoded sRGB value (0.0..=1.0) to linear light.
///
/// Out-of-range inputs are clamped.
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    let v = f64::from(srgb.clamp(0.0, 1.0));
    let linear = if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    };
    linear as f32
}

/// Convert a linear light value (0.0..=1.0) to gamma-encoded sRGB.
///
/// Out-of-range inputs are clamped.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    let v = f64::from(linear.clamp(0.0, 1.0));
    let srgb = if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    srgb as f32
}

/// Decode an 8-bit sRGB code value to linear light.
#[inline]
pub fn srgb8_to_linear(value: u8) -> f32 {
    SRGB8_TO_LINEAR[value as usize]
}

//! Color types and conversion utilities
//!
//! Every color space is its own type and every conversion is an explicit
//! `From` impl, so a stage that expects Lab data cannot be handed HSV by
//! accident.
//!
//! - [`Srgb`]: gamma-encoded working space (composition output, 8-bit stages)
//! - [`LinearRgb`]: linear light, the hub for XYZ-based conversions
//! - [`Lab`] / [`Lab8`]: CIE L*a*b*, float and 8-bit packed
//! - [`Hsv`]: hue/saturation/value for saturation and skin-tone work
//!
//! ```
//! use chroma_enhance::{Lab, LinearRgb, Srgb};
//!
//! let lab = Lab::new(50.0, 0.0, 0.0);
//! let srgb = Srgb::from(LinearRgb::from(lab));
//! let bytes = srgb.to_bytes();
//! assert_eq!(bytes[0], bytes[1]);
//! assert_eq!(bytes[1], bytes[2]);
//! ```

mod hsv;
mod lab;
mod linear_rgb;
mod lut;
mod srgb;

pub use hsv::Hsv;
pub use lab::{Lab, Lab8};
pub use linear_rgb::LinearRgb;
pub use srgb::Srgb;

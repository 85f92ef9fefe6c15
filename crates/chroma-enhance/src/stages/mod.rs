//! Enhancement stages.
//!
//! Each stage is a value holding its parameters and implementing
//! [`Stage`](crate::pipeline::Stage): it borrows an 8-bit RGB image and
//! returns a new one. Stages run in this order in the full pipeline:
//!
//! 1. [`Upscaler`]: 2x Lanczos
//! 2. [`Denoiser`]: non-local means in Lab
//! 3. [`ContrastEqualizer`]: CLAHE on lightness
//! 4. [`SaturationBooster`]: global HSV gain
//! 5. [`BilateralSmoother`]: edge-preserving smoothing
//! 6. [`SkinToneCorrector`]: masked saturation boost
//! 7. [`DetailSharpener`]: unsharp mask + high-pass kernel

mod bilateral;
mod clahe;
mod denoise;
mod kernel;
pub mod morphology;
mod saturation;
mod sharpen;
mod skin;
mod upscale;

pub use bilateral::BilateralSmoother;
pub use clahe::{equalize_lightness, ContrastEqualizer};
pub use denoise::Denoiser;
pub use morphology::StructuringElement;
pub use saturation::SaturationBooster;
pub use sharpen::DetailSharpener;
pub use skin::{skin_mask, HsvRange, SkinToneCorrector};
pub use upscale::Upscaler;

use crate::api::EnhanceError;

#[inline]
pub(crate) fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

pub(crate) fn invalid(name: &'static str, reason: &str) -> EnhanceError {
    EnhanceError::InvalidOption {
        name,
        reason: reason.to_string(),
    }
}

// Generated LUT tables and per-channel index loops trip these lints.
#![allow(
    clippy::excessive_precision,
    clippy::needless_range_loop,
    clippy::manual_range_contains
)]

//! chroma-enhance: grayscale photo colorization post-processing
//!
//! This library turns a grayscale photograph plus a predicted chrominance
//! field into a finished color image: it composes the two in CIE Lab and
//! runs a fixed sequence of enhancement stages over the result.
//!
//! Model inference is not part of this crate. A prediction collaborator
//! implements [`ChromaPredictor`] (or is any closure with the same shape)
//! and hands back (a, b) planes at the photograph's resolution.
//!
//! # Quick Start
//!
//! The [`Colorizer`] builder is the primary entry point:
//!
//! ```
//! use chroma_enhance::{ChromaPlanes, Colorizer, Plane};
//!
//! let lightness = Plane::filled(4, 4, 50.0);
//! let chroma = ChromaPlanes::filled(4, 4, [0.0, 0.0]);
//!
//! let colorizer = Colorizer::new();
//! let image = colorizer.colorize(&lightness, &chroma).unwrap();
//!
//! assert_eq!(image.dimensions(), (8, 8));
//! ```
//!
//! # With a Predictor
//!
//! ```
//! use chroma_enhance::{Colorizer, NeutralPredictor, PipelineVariant, Rgb8Image};
//!
//! let gray = Rgb8Image::filled(6, 4, [128, 128, 128]);
//! let colorizer = Colorizer::new().variant(PipelineVariant::Basic);
//! let image = colorizer.colorize_with(&NeutralPredictor, &gray).unwrap();
//!
//! assert_eq!(image.dimensions(), (6, 4));
//! ```
//!
//! # Pipeline Overview
//!
//! ```text
//! lightness L (photo size)      chroma ab (photo size)
//!         \                         /
//!          +---- compose (Lab) ----+
//!                     |
//!               Lab -> sRGB, clip, round        basic ends here
//!                     |
//!               upscale 2x (Lanczos-4)          upscaled ends here
//!                     |
//!               denoise (non-local means, Lab)
//!                     |
//!               CLAHE (L of 8-bit Lab only)
//!                     |
//!               saturation gain (HSV)
//!                     |
//!               bilateral smoothing
//!                     |
//!               skin-tone boost (HSV mask + morphology)
//!                     |
//!               sharpen (unsharp + 3x3 detail kernel)
//! ```
//!
//! Every stage borrows its input and returns a new buffer. Only the
//! upscaler changes dimensions.
//!
//! # Color Spaces
//!
//! Each space is its own pixel type, so a buffer's space is known at
//! compile time:
//!
//! | Type | Used For |
//! |------|----------|
//! | [`Srgb`] | Composition output, gamma-encoded working space |
//! | [`LinearRgb`] | Hub for XYZ-based conversions |
//! | [`Lab`] | Composition input, round-trip checks |
//! | [`Lab8`] | Denoising and contrast equalization |
//! | [`Hsv`] | Saturation and skin-tone stages |
//!
//! The Lab conversion uses the D65 white point and the constants common
//! computer-vision toolkits use, which is what colorization models are
//! trained against. A different white point shows up as a color cast
//! over the whole image.
//!
//! ## Why Composition Uses the Original Lightness
//!
//! The model sees a small, mean-centered copy of the lightness and its
//! chroma comes back at low resolution. Composition joins that chroma,
//! resampled to photo size, with the photograph's own full-resolution
//! lightness. All fine detail therefore comes from the source; the model
//! only decides the colors.

pub mod api;
pub mod buffer;
pub mod color;
pub mod compose;
pub mod pipeline;
pub mod stages;

#[cfg(test)]
mod domain_tests;

pub use api::{Colorizer, EnhanceError};
pub use buffer::{
    ChromaPlanes, ColorSpace, Interleaved, Lab8Image, LabImage, Mask, Pixel, PixelBuffer, Plane,
    Rgb8Image, SrgbImage,
};
pub use color::{Hsv, Lab, Lab8, LinearRgb, Srgb};
pub use compose::{
    compose, compose_lab, lab_to_srgb, lightness_from_rgb, model_input, resample_chroma,
    resize_plane, srgb_to_lab, ChromaPredictor, NeutralPredictor, LIGHTNESS_MEAN,
    MODEL_INPUT_SIZE,
};
pub use pipeline::{Pipeline, PipelineOptions, PipelineVariant, Stage};
pub use stages::{
    equalize_lightness, skin_mask, BilateralSmoother, ContrastEqualizer, DetailSharpener,
    Denoiser, HsvRange, SaturationBooster, SkinToneCorrector, StructuringElement, Upscaler,
};

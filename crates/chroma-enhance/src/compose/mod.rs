//! Color composition and the prediction seam around it.
//!
//! The first stage of every pipeline variant: join the photograph's own
//! lightness with predicted chrominance and convert to 8-bit RGB.

mod composition;
mod predictor;
mod resample;

pub use composition::{compose, compose_lab, lab_to_srgb, lightness_from_rgb, srgb_to_lab};
pub use predictor::{model_input, ChromaPredictor, NeutralPredictor, LIGHTNESS_MEAN, MODEL_INPUT_SIZE};
pub use resample::{resample_chroma, resize_plane};

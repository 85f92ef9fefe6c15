//! Unified error type for the chroma-enhance public API.

use crate::buffer::ColorSpace;

/// Every way a colorization run can fail.
///
/// All variants are terminal for the image being processed: the pipeline
/// never returns partial output. The computation is deterministic, so
/// retrying with the same input reproduces the same error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnhanceError {
    /// Lightness and chrominance disagree in spatial size
    #[error(
        "dimension mismatch: lightness is {lightness_width}x{lightness_height}, \
         chroma is {chroma_width}x{chroma_height}"
    )]
    DimensionMismatch {
        lightness_width: usize,
        lightness_height: usize,
        chroma_width: usize,
        chroma_height: usize,
    },

    /// A raw buffer has the wrong number of channels for its role
    #[error("invalid channel count for {space:?}: expected {expected}, got {actual}")]
    InvalidChannelCount {
        space: ColorSpace,
        expected: usize,
        actual: usize,
    },

    /// A raw buffer's length does not match width * height * channels
    #[error("buffer length {actual} does not match {width}x{height}x{channels}")]
    BufferLength {
        width: usize,
        height: usize,
        channels: usize,
        actual: usize,
    },

    /// A computed value could not be represented before narrowing
    #[error("numeric overflow in {stage}: non-finite value at pixel ({x}, {y})")]
    NumericOverflow {
        stage: &'static str,
        x: usize,
        y: usize,
    },

    /// A stage returned a buffer of unexpected size
    #[error(
        "stage {stage} produced {actual_width}x{actual_height}, \
         expected {expected_width}x{expected_height}"
    )]
    StageDimensions {
        stage: &'static str,
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    /// Zero-sized input buffer
    #[error("empty input: {width}x{height}")]
    EmptyInput { width: usize, height: usize },

    /// A pipeline option is outside its valid range
    #[error("invalid option {name}: {reason}")]
    InvalidOption {
        name: &'static str,
        reason: String,
    },

    /// The chrominance collaborator failed to produce a prediction
    #[error("chroma prediction failed: {0}")]
    Prediction(String),
}

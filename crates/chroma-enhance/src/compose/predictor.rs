//! The chrominance-prediction collaborator seam.
//!
//! Model inference lives outside this crate. A predictor receives the
//! photograph's lightness and returns (a, b) planes at the same
//! resolution; [`model_input`] and [`resample_chroma`](super::resample_chroma)
//! are the helpers a model-backed implementation needs on either side of
//! its fixed-size forward pass.

use super::resample::resize_plane;
use crate::api::EnhanceError;
use crate::buffer::{ChromaPlanes, Plane};

/// Side length of the square lightness input the colorization model expects.
pub const MODEL_INPUT_SIZE: usize = 224;

/// Lightness mean subtracted from the model input.
pub const LIGHTNESS_MEAN: f32 = 50.0;

/// Produces chrominance for a lightness plane.
///
/// Implementations must return planes with exactly the dimensions of
/// `lightness`. Composition rejects anything else with
/// [`EnhanceError::DimensionMismatch`] rather than resampling silently.
///
/// Closures with the matching signature implement this trait:
///
/// ```
/// use chroma_enhance::{ChromaPlanes, ChromaPredictor, EnhanceError, Plane};
///
/// let warm = |l: &Plane| -> Result<ChromaPlanes, EnhanceError> {
///     Ok(ChromaPlanes::filled(l.width(), l.height(), [10.0, 20.0]))
/// };
/// let ab = warm.predict(&Plane::filled(3, 2, 50.0)).unwrap();
/// assert_eq!(ab.dimensions(), (3, 2));
/// ```
pub trait ChromaPredictor {
    fn predict(&self, lightness: &Plane) -> Result<ChromaPlanes, EnhanceError>;
}

impl<F> ChromaPredictor for F
where
    F: Fn(&Plane) -> Result<ChromaPlanes, EnhanceError>,
{
    fn predict(&self, lightness: &Plane) -> Result<ChromaPlanes, EnhanceError> {
        self(lightness)
    }
}

/// Predicts zero chrominance everywhere.
///
/// Composition with this predictor yields a neutral gray rendition of the
/// input, which makes it useful for running the enhancement stages on a
/// photograph without a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralPredictor;

impl ChromaPredictor for NeutralPredictor {
    fn predict(&self, lightness: &Plane) -> Result<ChromaPlanes, EnhanceError> {
        lightness.ensure_not_empty()?;
        Ok(ChromaPlanes::filled(
            lightness.width(),
            lightness.height(),
            [0.0, 0.0],
        ))
    }
}

/// Prepare lightness for the model: resize to `size x size` and subtract
/// [`LIGHTNESS_MEAN`].
///
/// The result is only ever fed to the model. Composition always uses the
/// original, full-resolution lightness.
pub fn model_input(lightness: &Plane, size: usize) -> Result<Plane, EnhanceError> {
    let resized = resize_plane(lightness, size, size)?;
    Ok(resized.map(|l| l - LIGHTNESS_MEAN))
}

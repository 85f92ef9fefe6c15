//! Colorizer builder -- the primary entry point for the crate.
//!
//! [`Colorizer`] joins color composition and the enhancement pipeline
//! behind a fluent configuration API.

use crate::api::EnhanceError;
use crate::buffer::{ChromaPlanes, Plane, Rgb8Image};
use crate::compose::{compose, lightness_from_rgb, ChromaPredictor};
use crate::pipeline::{Pipeline, PipelineOptions, PipelineVariant};
use crate::stages::{
    BilateralSmoother, ContrastEqualizer, DetailSharpener, Denoiser, SaturationBooster,
    SkinToneCorrector,
};

/// Grayscale-to-color builder.
///
/// # Design
///
/// - Configuration methods consume and return `self`
/// - [`colorize()`](Self::colorize) and friends take `&self`, so one
///   colorizer serves any number of images and threads
/// - Options are validated at the start of every run, before any stage
///   touches the image
///
/// # Example
///
/// ```
/// use chroma_enhance::{ChromaPlanes, Colorizer, PipelineVariant, Plane};
///
/// let colorizer = Colorizer::new().variant(PipelineVariant::Upscaled);
///
/// let lightness = Plane::filled(4, 4, 50.0);
/// let chroma = ChromaPlanes::filled(4, 4, [0.0, 0.0]);
/// let image = colorizer.colorize(&lightness, &chroma).unwrap();
///
/// assert_eq!(image.dimensions(), (8, 8));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Colorizer {
    options: PipelineOptions,
}

impl Colorizer {
    /// Colorizer running the full pipeline with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PipelineOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn variant(mut self, variant: PipelineVariant) -> Self {
        self.options = self.options.variant(variant);
        self
    }

    #[inline]
    pub fn denoise(mut self, denoise: Denoiser) -> Self {
        self.options = self.options.denoise(denoise);
        self
    }

    #[inline]
    pub fn clahe(mut self, clahe: ContrastEqualizer) -> Self {
        self.options = self.options.clahe(clahe);
        self
    }

    /// Set the global saturation gain.
    #[inline]
    pub fn saturation(mut self, gain: f32) -> Self {
        self.options = self.options.saturation(SaturationBooster::new(gain));
        self
    }

    #[inline]
    pub fn bilateral(mut self, bilateral: BilateralSmoother) -> Self {
        self.options = self.options.bilateral(bilateral);
        self
    }

    #[inline]
    pub fn skin(mut self, skin: SkinToneCorrector) -> Self {
        self.options = self.options.skin(skin);
        self
    }

    #[inline]
    pub fn sharpen(mut self, sharpen: DetailSharpener) -> Self {
        self.options = self.options.sharpen(sharpen);
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Compose lightness with predicted chrominance, then run the stages
    /// the configured variant selects.
    ///
    /// `lightness` is the photograph's own L channel, not the mean-centered
    /// model input. `chroma` must already be at the lightness resolution.
    pub fn colorize(
        &self,
        lightness: &Plane,
        chroma: &ChromaPlanes,
    ) -> Result<Rgb8Image, EnhanceError> {
        let pipeline = Pipeline::from_options(&self.options)?;
        let composed = compose(lightness, chroma)?;
        tracing::debug!(
            width = composed.width(),
            height = composed.height(),
            variant = %self.options.variant,
            "composed"
        );
        pipeline.run(&composed)
    }

    /// Colorize an 8-bit grayscale photograph with a prediction collaborator.
    ///
    /// The lightness of `gray` is handed to `predictor`, and its answer is
    /// composed with that same lightness.
    pub fn colorize_with(
        &self,
        predictor: &dyn ChromaPredictor,
        gray: &Rgb8Image,
    ) -> Result<Rgb8Image, EnhanceError> {
        self.options.validate()?;
        let lightness = lightness_from_rgb(gray)?;
        let chroma = predictor.predict(&lightness)?;
        self.colorize(&lightness, &chroma)
    }

    /// Run every enhancement stage on an already colored image, whatever
    /// the configured variant.
    pub fn enhance(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError> {
        Pipeline::enhancement(&self.options)?.run(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::NeutralPredictor;

    #[test]
    fn test_builder_chaining() {
        let colorizer = Colorizer::new()
            .variant(PipelineVariant::Basic)
            .saturation(1.5)
            .clahe(ContrastEqualizer::new().clip_limit(2.0));
        assert_eq!(colorizer.options().variant, PipelineVariant::Basic);
        assert_eq!(colorizer.options().saturation.gain, 1.5);
        assert_eq!(colorizer.options().clahe.clip_limit, 2.0);
    }

    #[test]
    fn test_basic_variant_keeps_size() {
        let out = Colorizer::new()
            .variant(PipelineVariant::Basic)
            .colorize(&Plane::filled(3, 5, 70.0), &ChromaPlanes::filled(3, 5, [5.0, 5.0]))
            .unwrap();
        assert_eq!(out.dimensions(), (3, 5));
    }

    #[test]
    fn test_invalid_options_rejected_before_composition() {
        // mismatched inputs would fail composition; the option error wins
        let err = Colorizer::new()
            .saturation(-2.0)
            .colorize(&Plane::filled(3, 3, 50.0), &ChromaPlanes::filled(2, 2, [0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, EnhanceError::InvalidOption { name: "saturation.gain", .. }));
    }

    #[test]
    fn test_colorize_with_neutral_predictor_keeps_gray() {
        let gray = Rgb8Image::from_fn(4, 4, |x, _| [(x * 60) as u8; 3]);
        let out = Colorizer::new()
            .variant(PipelineVariant::Basic)
            .colorize_with(&NeutralPredictor, &gray)
            .unwrap();
        for (a, b) in gray.pixels().iter().zip(out.pixels()) {
            for c in 0..3 {
                assert!(a[c].abs_diff(b[c]) <= 1, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_predictor_failure_propagates() {
        let failing = |_: &Plane| -> Result<ChromaPlanes, EnhanceError> {
            Err(EnhanceError::Prediction("no weights".into()))
        };
        let err = Colorizer::new()
            .colorize_with(&failing, &Rgb8Image::filled(2, 2, [10, 10, 10]))
            .unwrap_err();
        assert_eq!(err, EnhanceError::Prediction("no weights".into()));
    }

    #[test]
    fn test_enhance_ignores_variant() {
        let out = Colorizer::new()
            .variant(PipelineVariant::Basic)
            .enhance(&Rgb8Image::filled(3, 3, [120, 90, 60]))
            .unwrap();
        assert_eq!(out.dimensions(), (6, 6));
    }

    #[test]
    fn test_colorizer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Colorizer>();
    }
}

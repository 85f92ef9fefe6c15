//! Ordered stage execution.

mod options;

pub use options::{PipelineOptions, PipelineVariant};

use std::time::Instant;

use crate::api::EnhanceError;
use crate::buffer::Rgb8Image;
use crate::stages::Upscaler;

/// One post-composition transform: borrows an 8-bit RGB image and returns
/// a new one.
///
/// Stages hold only their parameters, so a single value can process any
/// number of images, from any number of threads.
pub trait Stage: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Output size for an input of `width x height`. Unchanged by default.
    fn output_dimensions(&self, width: usize, height: usize) -> (usize, usize) {
        (width, height)
    }

    fn apply(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError>;
}

/// An ordered sequence of stages.
///
/// ```
/// use chroma_enhance::{Pipeline, PipelineOptions, PipelineVariant, Rgb8Image};
///
/// let options = PipelineOptions::new().variant(PipelineVariant::Upscaled);
/// let pipeline = Pipeline::from_options(&options).unwrap();
/// assert_eq!(pipeline.stage_names(), vec!["upscale"]);
///
/// let out = pipeline.run(&Rgb8Image::filled(3, 2, [9, 9, 9])).unwrap();
/// assert_eq!(out.dimensions(), (6, 4));
/// ```
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Empty pipeline; [`run`](Self::run) returns a copy of its input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn push(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// The stages selected by `options.variant`, after validating all options.
    pub fn from_options(options: &PipelineOptions) -> Result<Self, EnhanceError> {
        options.validate()?;
        Ok(match options.variant {
            PipelineVariant::Basic => Self::new(),
            PipelineVariant::Upscaled => Self::new().push(Upscaler),
            PipelineVariant::Full => Self::enhancement_stages(options),
        })
    }

    /// Every enhancement stage regardless of variant, after validating all options.
    pub fn enhancement(options: &PipelineOptions) -> Result<Self, EnhanceError> {
        options.validate()?;
        Ok(Self::enhancement_stages(options))
    }

    fn enhancement_stages(options: &PipelineOptions) -> Self {
        Self::new()
            .push(Upscaler)
            .push(options.denoise.clone())
            .push(options.clahe.clone())
            .push(options.saturation.clone())
            .push(options.bilateral.clone())
            .push(options.skin.clone())
            .push(options.sharpen.clone())
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Output size for an input of `width x height`.
    pub fn output_dimensions(&self, width: usize, height: usize) -> (usize, usize) {
        self.stages
            .iter()
            .fold((width, height), |(w, h), s| s.output_dimensions(w, h))
    }

    /// Run every stage in order.
    ///
    /// Stops at the first failing stage; no partial result is returned.
    pub fn run(&self, image: &Rgb8Image) -> Result<Rgb8Image, EnhanceError> {
        image.ensure_not_empty()?;

        let mut current: Option<Rgb8Image> = None;
        for stage in &self.stages {
            let input = current.as_ref().unwrap_or(image);
            let (expected_width, expected_height) =
                stage.output_dimensions(input.width(), input.height());

            let started = Instant::now();
            let output = stage.apply(input)?;
            let (actual_width, actual_height) = output.dimensions();
            if (actual_width, actual_height) != (expected_width, expected_height) {
                return Err(EnhanceError::StageDimensions {
                    stage: stage.name(),
                    expected_width,
                    expected_height,
                    actual_width,
                    actual_height,
                });
            }

            tracing::debug!(
                stage = stage.name(),
                width = actual_width,
                height = actual_height,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "stage complete"
            );
            current = Some(output);
        }

        Ok(current.unwrap_or_else(|| image.clone()))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

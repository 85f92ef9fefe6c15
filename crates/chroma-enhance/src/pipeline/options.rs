//! Pipeline configuration.
//!
//! [`PipelineOptions`] collects the parameters of every enhancement stage
//! and the [`PipelineVariant`] that decides which of them run. It
//! deserializes from any serde format with every field optional, so a
//! configuration file only needs to name what it changes.

use serde::Deserialize;

use crate::api::EnhanceError;
use crate::stages::{
    BilateralSmoother, ContrastEqualizer, DetailSharpener, Denoiser, SaturationBooster,
    SkinToneCorrector,
};

/// Which stages follow color composition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineVariant {
    /// Composition only
    Basic,
    /// Composition and 2x upscaling
    Upscaled,
    /// Composition, upscaling and all enhancement stages
    #[default]
    Full,
}

impl PipelineVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Upscaled => "upscaled",
            Self::Full => "full",
        }
    }
}

impl std::fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PipelineVariant {
    type Err = EnhanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "upscaled" => Ok(Self::Upscaled),
            "full" => Ok(Self::Full),
            other => Err(EnhanceError::InvalidOption {
                name: "variant",
                reason: format!("unknown variant '{other}', expected basic, upscaled or full"),
            }),
        }
    }
}

/// Parameters for a whole colorization run.
///
/// # Example
///
/// ```
/// use chroma_enhance::{PipelineOptions, PipelineVariant, SaturationBooster};
///
/// let options = PipelineOptions::new()
///     .variant(PipelineVariant::Upscaled)
///     .saturation(SaturationBooster::new(1.0));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub variant: PipelineVariant,
    pub denoise: Denoiser,
    pub clahe: ContrastEqualizer,
    pub saturation: SaturationBooster,
    pub bilateral: BilateralSmoother,
    pub skin: SkinToneCorrector,
    pub sharpen: DetailSharpener,
}

impl PipelineOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn variant(mut self, variant: PipelineVariant) -> Self {
        self.variant = variant;
        self
    }

    #[inline]
    pub fn denoise(mut self, denoise: Denoiser) -> Self {
        self.denoise = denoise;
        self
    }

    #[inline]
    pub fn clahe(mut self, clahe: ContrastEqualizer) -> Self {
        self.clahe = clahe;
        self
    }

    #[inline]
    pub fn saturation(mut self, saturation: SaturationBooster) -> Self {
        self.saturation = saturation;
        self
    }

    #[inline]
    pub fn bilateral(mut self, bilateral: BilateralSmoother) -> Self {
        self.bilateral = bilateral;
        self
    }

    #[inline]
    pub fn skin(mut self, skin: SkinToneCorrector) -> Self {
        self.skin = skin;
        self
    }

    #[inline]
    pub fn sharpen(mut self, sharpen: DetailSharpener) -> Self {
        self.sharpen = sharpen;
        self
    }

    /// Check every stage's parameters.
    ///
    /// Stages that the variant skips are validated too, so a configuration
    /// that is wrong stays wrong when the variant changes.
    pub fn validate(&self) -> Result<(), EnhanceError> {
        self.denoise.validate()?;
        self.clahe.validate()?;
        self.saturation.validate()?;
        self.bilateral.validate()?;
        self.skin.validate()?;
        self.sharpen.validate()
    }
}

//! Color composition: original lightness + predicted chrominance -> RGB.

use crate::api::EnhanceError;
use crate::buffer::{ChromaPlanes, LabImage, Plane, Rgb8Image, SrgbImage};
use crate::color::{Lab, LinearRgb, Srgb};

const STAGE: &str = "compose";

/// Stack lightness and chrominance into a Lab image.
///
/// `lightness` must be the photograph's own L channel (0..=100), not the
/// mean-centered copy fed to the model. Chroma must already be at the
/// lightness resolution: this function never resamples.
///
/// # Errors
///
/// - [`EnhanceError::EmptyInput`] if either input has a zero dimension
/// - [`EnhanceError::DimensionMismatch`] if the inputs differ in size
/// - [`EnhanceError::NumericOverflow`] if any input value is not finite
pub fn compose_lab(lightness: &Plane, chroma: &ChromaPlanes) -> Result<LabImage, EnhanceError> {
    lightness.ensure_not_empty()?;
    chroma.ensure_not_empty()?;
    if lightness.dimensions() != chroma.dimensions() {
        return Err(EnhanceError::DimensionMismatch {
            lightness_width: lightness.width(),
            lightness_height: lightness.height(),
            chroma_width: chroma.width(),
            chroma_height: chroma.height(),
        });
    }

    let width = lightness.width();
    let mut pixels = Vec::with_capacity(lightness.len());
    for (i, (&l, &[a, b])) in lightness.pixels().iter().zip(chroma.pixels()).enumerate() {
        let lab = Lab::new(l, a, b);
        if !lab.is_finite() {
            return Err(EnhanceError::NumericOverflow {
                stage: STAGE,
                x: i % width,
                y: i / width,
            });
        }
        pixels.push(lab);
    }
    LabImage::from_pixels(width, lightness.height(), pixels)
}

/// Convert a Lab image to the working sRGB space.
///
/// Out-of-gamut colors are clipped into 0.0..=1.0.
pub fn lab_to_srgb(lab: &LabImage) -> SrgbImage {
    lab.map(|p| Srgb::from(LinearRgb::from(p)).clip())
}

/// Convert a working sRGB image back to Lab.
///
/// The inverse of [`lab_to_srgb`] for in-gamut colors.
pub fn srgb_to_lab(srgb: &SrgbImage) -> LabImage {
    srgb.map(Lab::from_srgb)
}

/// Compose lightness and predicted chrominance into an 8-bit RGB image.
///
/// Lab -> sRGB, clip to 0.0..=1.0, scale to 0..=255, round.
///
/// # Example
///
/// ```
/// use chroma_enhance::{compose, ChromaPlanes, Plane};
///
/// let l = Plane::filled(4, 4, 50.0);
/// let ab = ChromaPlanes::filled(4, 4, [0.0, 0.0]);
/// let rgb = compose(&l, &ab).unwrap();
///
/// let [r, g, b] = rgb.get(0, 0);
/// assert_eq!(r, g);
/// assert_eq!(g, b);
/// ```
pub fn compose(lightness: &Plane, chroma: &ChromaPlanes) -> Result<Rgb8Image, EnhanceError> {
    let lab = compose_lab(lightness, chroma)?;
    let srgb = lab_to_srgb(&lab);
    let width = srgb.width();

    let mut pixels = Vec::with_capacity(srgb.len());
    for (i, &p) in srgb.pixels().iter().enumerate() {
        if !p.is_finite() {
            return Err(EnhanceError::NumericOverflow {
                stage: STAGE,
                x: i % width,
                y: i / width,
            });
        }
        pixels.push(p.to_bytes());
    }
    Rgb8Image::from_pixels(width, srgb.height(), pixels)
}

/// Extract the lightness channel of an 8-bit photograph.
///
/// Grayscale sources have R = G = B, so no information is lost.
pub fn lightness_from_rgb(image: &Rgb8Image) -> Result<Plane, EnhanceError> {
    image.ensure_not_empty()?;
    Ok(image.map(|p| Lab::from_bytes(p).l))
}

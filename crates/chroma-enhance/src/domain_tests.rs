//! Domain-critical regression tests for chroma-enhance.
//!
//! Each test documents the class of bug it guards against.

use pretty_assertions::assert_eq;

use crate::api::Colorizer;
use crate::buffer::{ChromaPlanes, Lab8Image, Plane, Rgb8Image};
use crate::color::{Hsv, Lab8};
use crate::compose::{compose, compose_lab, lab_to_srgb, srgb_to_lab};
use crate::pipeline::{PipelineVariant, Stage};
use crate::stages::{equalize_lightness, skin_mask, DetailSharpener, SaturationBooster, SkinToneCorrector};

const SKIN: [u8; 3] = [205, 150, 120];
const BLUE: [u8; 3] = [0, 0, 255];

fn textured(width: usize, height: usize) -> Rgb8Image {
    Rgb8Image::from_fn(width, height, |x, y| {
        [
            (40 + (x * 37 + y * 11) % 170) as u8,
            (60 + (x * 13 + y * 29) % 150) as u8,
            (30 + (x * 7 + y * 41) % 190) as u8,
        ]
    })
}

// ============================================================================
// Geometry
// ============================================================================

/// If this breaks, it means: a stage after the upscaler changed the image
/// size, or the upscaler stopped producing exactly twice the input.
#[test]
fn test_full_pipeline_doubles_dimensions() {
    let colorizer = Colorizer::new();
    for (w, h) in [(1, 1), (3, 2), (5, 7), (9, 4)] {
        let out = colorizer
            .colorize(&Plane::filled(w, h, 60.0), &ChromaPlanes::filled(w, h, [12.0, 18.0]))
            .unwrap();
        assert_eq!(out.dimensions(), (2 * w, 2 * h), "input {w}x{h}");
    }
}

// ============================================================================
// Composition
// ============================================================================

/// If this breaks, it means: composition stacks a and b in the wrong order
/// or treats them symmetrically, which would paint reds as yellows.
#[test]
fn test_composition_is_channel_order_sensitive() {
    let l = Plane::filled(2, 2, 55.0);
    let ab = ChromaPlanes::filled(2, 2, [30.0, -20.0]);
    let ba = ChromaPlanes::filled(2, 2, [-20.0, 30.0]);
    assert_ne!(compose(&l, &ab).unwrap(), compose(&l, &ba).unwrap());
}

/// If this breaks, it means: composition no longer maps zero chroma to a
/// neutral color, so every photo gets a cast, or a later stage tints gray.
#[test]
fn test_neutral_gray_scenario() {
    let l = Plane::filled(4, 4, 50.0);
    let ab = ChromaPlanes::filled(4, 4, [0.0, 0.0]);

    let composed = compose(&l, &ab).unwrap();
    let first = composed.get(0, 0);
    assert_eq!(first[0], first[1]);
    assert_eq!(first[1], first[2]);
    assert!(composed.pixels().iter().all(|&p| p == first));

    let finished = Colorizer::new().colorize(&l, &ab).unwrap();
    assert_eq!(finished.dimensions(), (8, 8));
    for &[r, g, b] in finished.pixels() {
        let spread = r.max(g).max(b) - r.min(g).min(b);
        assert!(spread <= 2, "not neutral: {:?}", [r, g, b]);
    }
}

/// If this breaks, it means: the Lab <-> RGB conversions are no longer
/// inverses, so composing and decomposing shifts the photograph's tones.
#[test]
fn test_lightness_survives_round_trip() {
    let chromas = [[0.0, 0.0], [10.0, -10.0], [-15.0, 20.0], [25.0, 15.0]];
    for l_value in [20.0f32, 35.0, 50.0, 65.0, 80.0] {
        for ab_value in chromas {
            let l = Plane::filled(1, 1, l_value);
            let ab = ChromaPlanes::filled(1, 1, ab_value);
            let back = srgb_to_lab(&lab_to_srgb(&compose_lab(&l, &ab).unwrap()));
            let got = back.get(0, 0).l;
            assert!(
                (got - l_value).abs() < 1e-3,
                "L={l_value} ab={ab_value:?} came back as {got}"
            );
        }
    }
}

/// If this breaks, it means: the gamma curve is approximated somewhere on
/// the float path, and dark tones near black drift on every conversion.
#[test]
fn test_lightness_round_trip_covers_full_range() {
    // 0.05 steps from black to white, neutral chroma
    let l = Plane::from_fn(2001, 1, |x, _| x as f32 * 0.05);
    let ab = ChromaPlanes::filled(2001, 1, [0.0, 0.0]);
    let back = srgb_to_lab(&lab_to_srgb(&compose_lab(&l, &ab).unwrap()));

    let (worst_l, worst_err) = l
        .pixels()
        .iter()
        .zip(back.pixels())
        .map(|(&want, got)| (want, (got.l - want).abs()))
        .fold((0.0f32, 0.0f32), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
    assert!(
        worst_err < 1e-3,
        "worst lightness error {worst_err} at L={worst_l}"
    );
}

// ============================================================================
// Stage identities
// ============================================================================

/// If this breaks, it means: the saturation stage round-trips through a
/// lossy representation even when it has nothing to do.
#[test]
fn test_unit_saturation_gain_is_identity() {
    let image = textured(13, 9);
    assert_eq!(SaturationBooster::new(1.0).apply(&image).unwrap(), image);
}

/// If this breaks, it means: pixels outside the skin mask are being
/// re-encoded through HSV and drift by a code value.
#[test]
fn test_skin_stage_without_skin_is_identity() {
    let image = Rgb8Image::from_fn(12, 12, |x, y| [0, (x * 10) as u8, (120 + y * 10) as u8]);
    assert!(skin_mask(&image).pixels().iter().all(|&m| m == 0));
    assert_eq!(SkinToneCorrector::default().apply(&image).unwrap(), image);
}

/// If this breaks, it means: contrast equalization is leaking into the
/// chroma channels, shifting hues it was never meant to touch.
#[test]
fn test_clahe_leaves_chroma_bytes_alone() {
    let lab = textured(31, 17).map(Lab8::from_bytes);
    let out: Lab8Image = equalize_lightness(&lab).unwrap();
    for (before, after) in lab.pixels().iter().zip(out.pixels()) {
        assert_eq!((before.a, before.b), (after.a, after.b));
    }
}

/// If this breaks, it means: the sharpener's blend weights or the mid-gray
/// bias no longer cancel on flat input, brightening or darkening the photo.
#[test]
fn test_sharpener_leaves_flat_regions_alone() {
    for color in [[0, 0, 0], [128, 128, 128], [12, 200, 77], [255, 255, 255]] {
        let image = Rgb8Image::filled(16, 16, color);
        assert_eq!(DetailSharpener::default().apply(&image).unwrap(), image);
    }
}

// ============================================================================
// Skin-tone scenario
// ============================================================================

/// If this breaks, it means: the skin mask reaches outside skin regions or
/// the boost no longer raises saturation where it should.
#[test]
fn test_skin_quadrant_boosted_blue_untouched() {
    let image = Rgb8Image::from_fn(16, 16, |x, y| if x < 8 && y < 8 { SKIN } else { BLUE });
    let out = SkinToneCorrector::default().apply(&image).unwrap();

    for y in 0..16 {
        for x in 0..16 {
            if x < 8 && y < 8 {
                let before = Hsv::from_rgb8(image.get(x, y)).s;
                let after = Hsv::from_rgb8(out.get(x, y)).s;
                assert!(after >= before, "skin pixel ({x}, {y}) lost saturation");
            } else {
                assert_eq!(out.get(x, y), BLUE, "blue pixel ({x}, {y}) changed");
            }
        }
    }

    let before = Hsv::from_rgb8(SKIN).s;
    let center = Hsv::from_rgb8(out.get(3, 3)).s;
    assert!(center > before, "skin center not boosted: {before} -> {center}");
}

// ============================================================================
// Variants
// ============================================================================

/// If this breaks, it means: the basic variant runs enhancement stages it
/// should skip, or the upscaled variant does more than upscale.
#[test]
fn test_variants_differ_only_in_stages_run() {
    let l = Plane::from_fn(4, 4, |x, y| 30.0 + 5.0 * (x + y) as f32);
    let ab = ChromaPlanes::filled(4, 4, [8.0, 14.0]);

    let basic = Colorizer::new()
        .variant(PipelineVariant::Basic)
        .colorize(&l, &ab)
        .unwrap();
    assert_eq!(basic, compose(&l, &ab).unwrap());

    let upscaled = Colorizer::new()
        .variant(PipelineVariant::Upscaled)
        .colorize(&l, &ab)
        .unwrap();
    assert_eq!(upscaled, crate::stages::Upscaler.apply(&basic).unwrap());
}

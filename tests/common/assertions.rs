//! Assertion helpers for tests.

use std::path::Path;

use chroma_enhance::Rgb8Image;
use pretty_assertions::assert_eq;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Assert a file exists and starts with the PNG signature
pub fn assert_png_file(path: &Path) {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected PNG at {}: {e}", path.display()));
    assert!(
        bytes.starts_with(&PNG_SIGNATURE),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

pub fn assert_dimensions(image: &Rgb8Image, width: usize, height: usize) {
    assert_eq!(
        image.dimensions(),
        (width, height),
        "Unexpected image size"
    );
}

/// Assert every pixel is gray to within `tolerance` code values
pub fn assert_neutral(image: &Rgb8Image, tolerance: u8) {
    for (i, &[r, g, b]) in image.pixels().iter().enumerate() {
        let spread = r.max(g).max(b) - r.min(g).min(b);
        assert!(
            spread <= tolerance,
            "Pixel {i} is not neutral: {:?}",
            [r, g, b]
        );
    }
}

/// Assert the image leans red-yellow: mean R above mean B
pub fn assert_warm(image: &Rgb8Image) {
    let n = image.len() as f64;
    let mean = |c: usize| image.pixels().iter().map(|p| p[c] as f64).sum::<f64>() / n;
    let (r, b) = (mean(0), mean(2));
    assert!(r > b + 5.0, "Expected warm image, mean R {r:.1} vs B {b:.1}");
}

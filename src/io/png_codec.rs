//! PNG decode and encode for 8-bit RGB photographs.
//!
//! Decoding normalizes every PNG layout (palette, 1-16 bit, gray, alpha)
//! to 8-bit samples and then to opaque RGB, compositing any alpha over
//! white. Encoding writes fast RGB8 and optionally hands the result to
//! oxipng for recompression.

use std::io::Cursor;

use chroma_enhance::Rgb8Image;

use crate::error::CodecError;

/// Largest side accepted by [`decode_rgb8`]. Stays well inside `u32` and
/// keeps a single full-pipeline run within a few GiB of working memory.
pub const MAX_DIMENSION: usize = 16_384;

/// Decode a PNG into an opaque 8-bit RGB image.
pub fn decode_rgb8(bytes: &[u8]) -> Result<Rgb8Image, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| CodecError::PngDecode(e.to_string()))?;

    // Reject on the header before sizing the frame buffer
    let width = reader.info().width as usize;
    let height = reader.info().height as usize;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(CodecError::TooLarge { width, height });
    }

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| CodecError::PngDecode(e.to_string()))?;
    let data = &buf[..frame.buffer_size()];

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != png::BitDepth::Eight {
        return Err(CodecError::Unsupported(format!(
            "{bit_depth:?} samples after normalization"
        )));
    }

    let pixels: Vec<[u8; 3]> = match color_type {
        png::ColorType::Grayscale => data.iter().map(|&v| [v, v, v]).collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .map(|px| [over_white(px[0], px[1]); 3])
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .map(|px| [px[0], px[1], px[2]])
            .collect(),
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .map(|px| {
                let a = px[3];
                [
                    over_white(px[0], a),
                    over_white(px[1], a),
                    over_white(px[2], a),
                ]
            })
            .collect(),
        png::ColorType::Indexed => {
            return Err(CodecError::Unsupported(
                "indexed color after expansion".to_string(),
            ))
        }
    };

    Rgb8Image::from_pixels(width, height, pixels)
        .map_err(|e| CodecError::PngDecode(e.to_string()))
}

/// Composite one channel over a white background.
#[inline]
fn over_white(c: u8, a: u8) -> u8 {
    let (c, a) = (c as u32, a as u32);
    ((c * a + 255 * (255 - a)) / 255) as u8
}

/// Encode an RGB image as PNG with fast settings.
pub fn encode_rgb8(image: &Rgb8Image) -> Result<Vec<u8>, CodecError> {
    let (width, height) = image.dimensions();
    let too_large = || CodecError::TooLarge { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, w, h);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&image.to_interleaved())
            .map_err(|e| CodecError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Recompress with oxipng. Falls back to the input when optimization fails.
pub fn optimize(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) if optimized.len() < png_bytes.len() => optimized,
        Ok(_) => png_bytes,
        Err(e) => {
            tracing::debug!(%e, "oxipng failed, keeping fast encoding");
            png_bytes
        }
    }
}

/// Encode, then optionally recompress.
pub fn encode(image: &Rgb8Image, optimize_png: bool) -> Result<Vec<u8>, CodecError> {
    let bytes = encode_rgb8(image)?;
    Ok(if optimize_png { optimize(bytes) } else { bytes })
}

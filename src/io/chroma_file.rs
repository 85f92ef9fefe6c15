//! Raw chrominance predictions on disk.
//!
//! Layout, all little-endian:
//!
//! ```text
//! offset  size        field
//! 0       4           magic "CHAB"
//! 4       4           width  (u32)
//! 8       4           height (u32)
//! 12      8*w*h       (a, b) as f32 pairs, row-major
//! ```
//!
//! The grid may have any resolution. [`FileChromaPredictor`] resamples it
//! to the photograph it is asked about, so a model can dump its native
//! 224x224 output without knowing the source size.

use std::path::Path;

use chroma_enhance::{resample_chroma, ChromaPlanes, ChromaPredictor, EnhanceError, Plane};

use crate::error::ChromaFileError;

pub const MAGIC: &[u8; 4] = b"CHAB";
const HEADER_LEN: usize = 12;

/// Parse a chroma file from memory.
pub fn decode(bytes: &[u8]) -> Result<ChromaPlanes, ChromaFileError> {
    if bytes.len() < HEADER_LEN {
        return Err(ChromaFileError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }
    if &bytes[..4] != MAGIC {
        return Err(ChromaFileError::BadMagic);
    }
    let width = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let height = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    if width == 0 || height == 0 {
        return Err(ChromaFileError::Empty { width, height });
    }

    let count = (width as usize).saturating_mul(height as usize);
    let expected = count.saturating_mul(8).saturating_add(HEADER_LEN);
    if bytes.len() != expected {
        return Err(ChromaFileError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }

    let pixels = bytes[HEADER_LEN..]
        .chunks_exact(8)
        .map(|c| {
            [
                f32::from_le_bytes([c[0], c[1], c[2], c[3]]),
                f32::from_le_bytes([c[4], c[5], c[6], c[7]]),
            ]
        })
        .collect();

    ChromaPlanes::from_pixels(width as usize, height as usize, pixels).map_err(|_| {
        ChromaFileError::Truncated {
            expected,
            actual: bytes.len(),
        }
    })
}

/// Serialize planes to the chroma file layout.
pub fn encode(chroma: &ChromaPlanes) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + chroma.len() * 8);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&(chroma.width() as u32).to_le_bytes());
    out.extend_from_slice(&(chroma.height() as u32).to_le_bytes());
    for &[a, b] in chroma.pixels() {
        out.extend_from_slice(&a.to_le_bytes());
        out.extend_from_slice(&b.to_le_bytes());
    }
    out
}

pub fn read(path: &Path) -> Result<ChromaPlanes, ChromaFileError> {
    decode(&std::fs::read(path)?)
}

pub fn write(path: &Path, chroma: &ChromaPlanes) -> Result<(), ChromaFileError> {
    std::fs::write(path, encode(chroma))?;
    Ok(())
}

/// A predictor that answers with a precomputed chroma grid.
#[derive(Debug, Clone)]
pub struct FileChromaPredictor {
    chroma: ChromaPlanes,
}

impl FileChromaPredictor {
    pub fn new(chroma: ChromaPlanes) -> Self {
        Self { chroma }
    }

    pub fn open(path: &Path) -> Result<Self, ChromaFileError> {
        let chroma = read(path)?;
        tracing::debug!(
            path = %path.display(),
            width = chroma.width(),
            height = chroma.height(),
            "Loaded chroma prediction"
        );
        Ok(Self::new(chroma))
    }

    pub fn chroma(&self) -> &ChromaPlanes {
        &self.chroma
    }
}

impl ChromaPredictor for FileChromaPredictor {
    fn predict(&self, lightness: &Plane) -> Result<ChromaPlanes, EnhanceError> {
        lightness.ensure_not_empty()?;
        if self.chroma.dimensions() == lightness.dimensions() {
            return Ok(self.chroma.clone());
        }
        resample_chroma(&self.chroma, lightness.width(), lightness.height())
    }
}

use std::path::PathBuf;

use chroma_enhance::EnhanceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Enhancement error: {0}")]
    Enhance(#[from] EnhanceError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Chroma file error: {0}")]
    ChromaFile(#[from] ChromaFileError),

    #[error("Task failed: {0}")]
    Task(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),

    #[error("Image too large: {width}x{height}")]
    TooLarge { width: usize, height: usize },
}

#[derive(Debug, Error)]
pub enum ChromaFileError {
    #[error("Bad magic: expected CHAB")]
    BadMagic,

    #[error("Truncated file: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Empty prediction: {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Test fixtures: a temporary directory with helpers to drop PNGs and
//! chroma predictions into it.

use std::path::{Path, PathBuf};

use chroma_enhance::{ChromaPlanes, PipelineVariant, Rgb8Image};
use chromafy::io::{chroma_file, png_codec};
use chromafy::models::AppConfig;
use chromafy::services::ColorizeService;
use tempfile::TempDir;

/// A warm, mildly saturated chroma prediction
pub const WARM: [f32; 2] = [18.0, 30.0];

/// Gradient with enough texture to exercise every stage
pub fn gray_gradient(width: usize, height: usize) -> Rgb8Image {
    Rgb8Image::from_fn(width, height, |x, y| {
        let v = (40 + (x * 150) / width.max(1) + (y * 37) % 40) as u8;
        [v, v, v]
    })
}

pub fn colored(width: usize, height: usize) -> Rgb8Image {
    Rgb8Image::from_fn(width, height, |x, y| {
        [(60 + x * 9) as u8, (90 + y * 7) as u8, 140]
    })
}

/// Service without PNG recompression, so tests stay fast
pub fn service(variant: PipelineVariant) -> ColorizeService {
    let mut config = AppConfig::default();
    config.pipeline.variant = variant;
    config.output.optimize_png = false;
    ColorizeService::new(&config).unwrap()
}

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_png(&self, name: &str, image: &Rgb8Image) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, png_codec::encode_rgb8(image).unwrap()).unwrap();
        path
    }

    pub fn write_chroma(&self, name: &str, chroma: &ChromaPlanes) -> PathBuf {
        let path = self.path(name);
        chroma_file::write(&path, chroma).unwrap();
        path
    }

    pub fn read_png(&self, path: &Path) -> Rgb8Image {
        png_codec::decode_rgb8(&std::fs::read(path).unwrap()).unwrap()
    }
}

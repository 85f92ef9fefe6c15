pub mod chroma_file;
pub mod png_codec;

pub use chroma_file::FileChromaPredictor;

//! Chromafy - grayscale photo colorization
//!
//! File plumbing around the `chroma-enhance` pipeline: configuration,
//! PNG and chroma-prediction I/O, and a concurrent batch runner.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod io;
pub mod models;
pub mod services;

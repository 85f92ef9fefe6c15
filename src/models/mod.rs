pub mod config;

pub use config::{AppConfig, BatchConfig, OutputConfig};

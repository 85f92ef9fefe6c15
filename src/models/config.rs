use crate::assets::AssetLoader;
use chroma_enhance::PipelineOptions;
use serde::Deserialize;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Stage selection and per-stage parameters
    #[serde(default)]
    pub pipeline: PipelineOptions,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub batch: BatchConfig,
}

/// How results are written
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Recompress PNGs with oxipng
    #[serde(default = "default_optimize_png")]
    pub optimize_png: bool,

    /// Appended to the input stem when batch mode names outputs
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_optimize_png() -> bool {
    true
}

fn default_suffix() -> String {
    "_color".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            optimize_png: default_optimize_png(),
            suffix: default_suffix(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BatchConfig {
    /// Images processed concurrently; 0 picks the number of CPUs
    #[serde(default)]
    pub jobs: usize,
}

impl BatchConfig {
    /// Concurrency to use, resolving 0 to the available parallelism.
    pub fn effective_jobs(&self) -> usize {
        if self.jobs > 0 {
            return self.jobs;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    ///
    /// Unreadable, unparsable or invalid configuration logs a warning and
    /// falls back to defaults.
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        variant = %config.pipeline.variant,
                        optimize_png = config.output.optimize_png,
                        jobs = config.batch.jobs,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.pipeline.validate()?;
        Ok(config)
    }
}

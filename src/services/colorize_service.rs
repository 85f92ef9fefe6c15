use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chroma_enhance::{ChromaPredictor, Colorizer, NeutralPredictor, Rgb8Image};
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::error::AppError;
use crate::io::{png_codec, FileChromaPredictor};
use crate::models::{AppConfig, OutputConfig};

/// Extension of chroma prediction files picked up next to batch inputs
pub const CHROMA_EXTENSION: &str = "ab";

/// What to do with an input image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    /// Treat the input as grayscale and add predicted color. Without a
    /// chroma file the prediction is neutral.
    Colorize { chroma: Option<PathBuf> },
    /// Input is already colored; run the enhancement stages only
    Enhance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: JobKind,
}

/// Outcome of one successful job
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    pub bytes: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Machine-readable record of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub variant: String,
    pub jobs: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
    pub items: Vec<BatchItem>,
}

impl BatchSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// File-level colorization built on one shared [`Colorizer`]
#[derive(Debug, Clone)]
pub struct ColorizeService {
    colorizer: Arc<Colorizer>,
    output: OutputConfig,
}

impl ColorizeService {
    /// Validates the pipeline options up front so a bad config fails
    /// before any file is touched.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        config.pipeline.validate()?;
        Ok(Self {
            colorizer: Arc::new(Colorizer::with_options(config.pipeline.clone())),
            output: config.output.clone(),
        })
    }

    pub fn colorizer(&self) -> &Colorizer {
        &self.colorizer
    }

    /// Output path for `input` inside `out_dir`: `<stem><suffix>.png`.
    pub fn output_path(&self, input: &Path, out_dir: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        out_dir.join(format!("{stem}{}.png", self.output.suffix))
    }

    /// Batch job for `input`, using a sibling `.ab` file when one exists.
    pub fn batch_job(&self, input: &Path, out_dir: &Path, enhance: bool) -> Job {
        let kind = if enhance {
            JobKind::Enhance
        } else {
            let sibling = input.with_extension(CHROMA_EXTENSION);
            JobKind::Colorize {
                chroma: sibling.is_file().then_some(sibling),
            }
        };
        Job {
            input: input.to_path_buf(),
            output: self.output_path(input, out_dir),
            kind,
        }
    }

    /// Run one job synchronously.
    pub fn run_job(&self, job: &Job) -> Result<FileReport, AppError> {
        let started = Instant::now();
        let bytes = std::fs::read(&job.input).map_err(|e| AppError::io(&job.input, e))?;
        let image = png_codec::decode_rgb8(&bytes)?;

        let result = match &job.kind {
            JobKind::Colorize { chroma: Some(path) } => {
                let predictor = FileChromaPredictor::open(path)?;
                self.colorize_image(&predictor, &image)?
            }
            JobKind::Colorize { chroma: None } => {
                tracing::debug!(input = %job.input.display(), "No chroma prediction, using neutral");
                self.colorize_image(&NeutralPredictor, &image)?
            }
            JobKind::Enhance => self.colorizer.enhance(&image)?,
        };

        let encoded = png_codec::encode(&result, self.output.optimize_png)?;
        if let Some(parent) = job.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
            }
        }
        std::fs::write(&job.output, &encoded).map_err(|e| AppError::io(&job.output, e))?;

        let report = FileReport {
            input: job.input.clone(),
            output: job.output.clone(),
            width: result.width(),
            height: result.height(),
            bytes: encoded.len(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            input = %report.input.display(),
            output = %report.output.display(),
            width = report.width,
            height = report.height,
            bytes = report.bytes,
            elapsed_ms = report.elapsed_ms,
            "Wrote image"
        );
        Ok(report)
    }

    fn colorize_image(
        &self,
        predictor: &dyn ChromaPredictor,
        image: &Rgb8Image,
    ) -> Result<Rgb8Image, AppError> {
        Ok(self.colorizer.colorize_with(predictor, image)?)
    }

    /// Run one job on the blocking pool.
    pub async fn run_job_blocking(&self, job: Job) -> Result<FileReport, AppError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.run_job(&job))
            .await
            .map_err(|e| AppError::Task(format!("Colorize task failed: {e}")))?
    }

    /// Run independent jobs with at most `concurrency` in flight.
    ///
    /// A failing image is recorded in the summary and does not stop the
    /// others. Items keep the order of `jobs`.
    pub async fn run_batch(&self, jobs: Vec<Job>, concurrency: usize) -> BatchSummary {
        let started = Instant::now();
        let concurrency = concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let total = jobs.len();

        let mut paths = Vec::with_capacity(total);
        let mut handles = Vec::with_capacity(total);
        for job in jobs {
            paths.push((job.input.clone(), job.output.clone()));
            let semaphore = semaphore.clone();
            let service = self.clone();
            handles.push(tokio::spawn(async move {
                match semaphore.acquire_owned().await {
                    Ok(_permit) => service.run_job_blocking(job).await,
                    Err(e) => Err(AppError::Task(e.to_string())),
                }
            }));
        }

        let mut items = Vec::with_capacity(total);
        for ((input, output), handle) in paths.into_iter().zip(handles) {
            items.push(batch_item(input, output, handle.await));
        }

        let succeeded = items
            .iter()
            .filter(|i| i.status == ItemStatus::Ok)
            .count();
        let summary = BatchSummary {
            variant: self.colorizer.options().variant.to_string(),
            jobs: concurrency,
            total,
            succeeded,
            failed: total - succeeded,
            elapsed_ms: started.elapsed().as_millis() as u64,
            items,
        };
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = summary.elapsed_ms,
            "Batch complete"
        );
        summary
    }
}

/// Summary entry for one batch job. The job's paths are recorded even when
/// its task died before producing a report.
fn batch_item(
    input: PathBuf,
    output: PathBuf,
    joined: Result<Result<FileReport, AppError>, tokio::task::JoinError>,
) -> BatchItem {
    let error = match joined {
        Ok(Ok(report)) => {
            return BatchItem {
                input: report.input,
                output: report.output,
                status: ItemStatus::Ok,
                width: Some(report.width),
                height: Some(report.height),
                error: None,
            }
        }
        Ok(Err(e)) => {
            tracing::warn!(input = %input.display(), %e, "Image failed");
            e.to_string()
        }
        Err(e) => {
            tracing::error!(input = %input.display(), %e, "Batch task panicked");
            format!("Task failed: {e}")
        }
    };
    BatchItem {
        input,
        output,
        status: ItemStatus::Error,
        width: None,
        height: None,
        error: Some(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_enhance::PipelineVariant;

    fn service(variant: PipelineVariant) -> ColorizeService {
        let mut config = AppConfig::default();
        config.pipeline.variant = variant;
        config.output.optimize_png = false;
        ColorizeService::new(&config).unwrap()
    }

    #[test]
    fn test_output_path_uses_suffix() {
        let svc = service(PipelineVariant::Basic);
        assert_eq!(
            svc.output_path(Path::new("in/photo.scan.png"), Path::new("out")),
            PathBuf::from("out/photo.scan_color.png")
        );
    }

    #[test]
    fn test_batch_job_finds_sibling_chroma() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.png");
        let chroma = dir.path().join("a.ab");
        std::fs::write(&chroma, b"").unwrap();

        let svc = service(PipelineVariant::Basic);
        let job = svc.batch_job(&input, dir.path(), false);
        assert_eq!(job.kind, JobKind::Colorize { chroma: Some(chroma) });

        let other = svc.batch_job(&dir.path().join("b.png"), dir.path(), false);
        assert_eq!(other.kind, JobKind::Colorize { chroma: None });

        assert_eq!(svc.batch_job(&input, dir.path(), true).kind, JobKind::Enhance);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.pipeline.sharpen.sigma = 0.0;
        assert!(matches!(
            ColorizeService::new(&config),
            Err(AppError::Enhance(_))
        ));
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let svc = service(PipelineVariant::Basic);
        let job = Job {
            input: PathBuf::from("/nonexistent/in.png"),
            output: PathBuf::from("/nonexistent/out.png"),
            kind: JobKind::Enhance,
        };
        assert!(matches!(svc.run_job(&job), Err(AppError::Io { .. })));
    }

    #[tokio::test]
    async fn test_panicked_task_keeps_job_paths() {
        fn explode() -> Result<FileReport, AppError> {
            panic!("decoder exploded")
        }
        let joined = tokio::spawn(async { explode() }).await;
        assert!(joined.is_err());

        let item = batch_item(
            PathBuf::from("in/a.png"),
            PathBuf::from("out/a_color.png"),
            joined,
        );
        assert_eq!(item.status, ItemStatus::Error);
        assert_eq!(item.input, PathBuf::from("in/a.png"));
        assert_eq!(item.output, PathBuf::from("out/a_color.png"));
        assert!(item.error.unwrap().starts_with("Task failed: "));
    }

    #[test]
    fn test_failed_job_item_carries_error() {
        let item = batch_item(
            PathBuf::from("b.png"),
            PathBuf::from("b_color.png"),
            Ok(Err(AppError::Task("boom".to_string()))),
        );
        assert_eq!(item.status, ItemStatus::Error);
        assert_eq!(item.input, PathBuf::from("b.png"));
        assert_eq!(item.error.as_deref(), Some("Task failed: boom"));
        assert!(item.width.is_none());
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = BatchSummary {
            variant: "full".to_string(),
            jobs: 2,
            total: 1,
            succeeded: 0,
            failed: 1,
            elapsed_ms: 5,
            items: vec![BatchItem {
                input: PathBuf::from("a.png"),
                output: PathBuf::from("a_color.png"),
                status: ItemStatus::Error,
                width: None,
                height: None,
                error: Some("boom".to_string()),
            }],
        };
        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(value["items"][0]["status"], "error");
        assert_eq!(value["items"][0]["error"], "boom");
        assert!(value["items"][0].get("width").is_none());
    }
}

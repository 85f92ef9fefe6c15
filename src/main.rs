use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chroma_enhance::{Pipeline, PipelineVariant};
use chromafy::assets::{AssetLoader, ConfigSource, CONFIG_ENV};
use chromafy::models::AppConfig;
use chromafy::services::{ColorizeService, Job, JobKind};

#[derive(Parser)]
#[command(name = "chromafy")]
#[command(about = "Colorize grayscale photographs and finish them with an enhancement pipeline")]
struct Cli {
    /// Config file (overrides CHROMAFY_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Colorize a grayscale PNG
    Colorize {
        /// Grayscale input PNG
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Chroma prediction file (.ab); neutral prediction if omitted
        #[arg(short, long)]
        chroma: Option<PathBuf>,

        /// Pipeline variant: basic, upscaled or full
        #[arg(short, long)]
        variant: Option<PipelineVariant>,

        /// Skip oxipng recompression
        #[arg(long)]
        no_optimize: bool,
    },
    /// Run the enhancement stages on an already colored PNG
    Enhance {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long)]
        no_optimize: bool,
    },
    /// Process many PNGs concurrently
    Batch {
        /// Input PNG files; a sibling <name>.ab is used as the chroma prediction
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for results
        #[arg(long)]
        out_dir: PathBuf,

        /// Images in flight (overrides batch.jobs)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Enhance colored inputs instead of colorizing
        #[arg(long)]
        enhance: bool,

        /// Pipeline variant: basic, upscaled or full
        #[arg(short, long)]
        variant: Option<PipelineVariant>,

        /// Write a JSON summary here
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Write the embedded config.yaml to disk for customization
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chromafy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let loader = AssetLoader::from_env(cli.config);

    match cli.command {
        Some(Commands::Colorize {
            input,
            output,
            chroma,
            variant,
            no_optimize,
        }) => {
            let config = load_config(&loader, variant, no_optimize);
            let job = Job {
                input,
                output,
                kind: JobKind::Colorize { chroma },
            };
            run_single(&config, job).await
        }
        Some(Commands::Enhance {
            input,
            output,
            no_optimize,
        }) => {
            let config = load_config(&loader, None, no_optimize);
            let job = Job {
                input,
                output,
                kind: JobKind::Enhance,
            };
            run_single(&config, job).await
        }
        Some(Commands::Batch {
            inputs,
            out_dir,
            jobs,
            enhance,
            variant,
            summary,
        }) => {
            let config = load_config(&loader, variant, false);
            run_batch_command(&config, &inputs, &out_dir, jobs, enhance, summary.as_deref()).await
        }
        Some(Commands::Init { force, list }) => run_init_command(&loader, force, list),
        None => {
            run_status_command(&loader);
            Ok(())
        }
    }
}

/// Load config and apply command-line overrides
fn load_config(
    loader: &AssetLoader,
    variant: Option<PipelineVariant>,
    no_optimize: bool,
) -> AppConfig {
    let mut config = AppConfig::load_from_assets(loader);
    if let Some(variant) = variant {
        config.pipeline.variant = variant;
    }
    if no_optimize {
        config.output.optimize_png = false;
    }
    config
}

async fn run_single(config: &AppConfig, job: Job) -> anyhow::Result<()> {
    let service = ColorizeService::new(config)?;
    let report = service.run_job_blocking(job).await?;
    println!(
        "Wrote {} ({}x{}, {} bytes, {} ms)",
        report.output.display(),
        report.width,
        report.height,
        report.bytes,
        report.elapsed_ms
    );
    Ok(())
}

async fn run_batch_command(
    config: &AppConfig,
    inputs: &[PathBuf],
    out_dir: &Path,
    jobs: Option<usize>,
    enhance: bool,
    summary_path: Option<&Path>,
) -> anyhow::Result<()> {
    let service = ColorizeService::new(config)?;
    std::fs::create_dir_all(out_dir)?;

    let batch: Vec<Job> = inputs
        .iter()
        .map(|input| service.batch_job(input, out_dir, enhance))
        .collect();
    let concurrency = jobs.unwrap_or_else(|| config.batch.effective_jobs());

    let summary = service.run_batch(batch, concurrency).await;

    if let Some(path) = summary_path {
        std::fs::write(path, summary.to_json()?)?;
        println!("Summary written to {}", path.display());
    }

    println!(
        "Processed {} images: {} ok, {} failed",
        summary.total, summary.succeeded, summary.failed
    );
    if summary.failed > 0 {
        anyhow::bail!("{} of {} images failed", summary.failed, summary.total);
    }
    Ok(())
}

fn run_init_command(loader: &AssetLoader, force: bool, list: bool) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        for f in AssetLoader::list_embedded() {
            println!("  {f}");
        }
        return Ok(());
    }

    let report = loader.init(force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }
    Ok(())
}

/// Show version, config source and the active pipeline
fn run_status_command(loader: &AssetLoader) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Chromafy v{VERSION}");
    println!("Grayscale photo colorization\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV} = {}",
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| "(not set)".to_string())
    );

    let source = match loader.config_source() {
        ConfigSource::File(path) => path.display().to_string(),
        ConfigSource::Missing(path) => format!("embedded ({} not found)", path.display()),
        ConfigSource::Embedded => "embedded".to_string(),
    };
    println!("\nConfig:  {source}");

    let config = AppConfig::load_from_assets(loader);
    match Pipeline::from_options(&config.pipeline) {
        Ok(pipeline) => {
            println!("\nPipeline ({}):", config.pipeline.variant);
            println!("  compose");
            for name in pipeline.stage_names() {
                println!("  {name}");
            }
        }
        Err(e) => println!("\nPipeline: invalid ({e})"),
    }
    println!(
        "\nOutput:  optimize_png={}, suffix={:?}",
        config.output.optimize_png, config.output.suffix
    );
    println!("Batch:   jobs={}", config.batch.effective_jobs());

    println!("\nRun 'chromafy --help' for commands.");
}

//! Co-occurrence tracker - Main Entry Point
//!
//! Runs the pipeline once over the configured recordings file, prints the
//! full itemset table to stdout and writes it to a timestamped file.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracker_rs::{
    config::TrackerConfig,
    pipeline::{OutputFormat, PipelineBuilder},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Mine maximal groups of mac addresses seen together
#[derive(Debug, Parser)]
#[command(name = "tracker-rs", version, about)]
struct Cli {
    /// Config file (defaults to ./tracker.toml, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recordings file with day,hour,ip,mac rows
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Input has a header row naming the columns
    #[arg(long)]
    headers: bool,

    /// Minimum number of groups a mac set must appear in
    #[arg(short, long)]
    occurrences: Option<usize>,

    /// Drop itemsets with fewer items than this
    #[arg(long)]
    min_itemset_len: Option<usize>,

    /// Directory for timestamped result files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Result file format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Print results without writing a file
    #[arg(long)]
    no_write: bool,
}

impl Cli {
    /// Load the config and report which file it came from, if any
    fn load_config(&self) -> anyhow::Result<(TrackerConfig, Option<PathBuf>)> {
        match &self.config {
            Some(path) => Ok((TrackerConfig::load(path)?, Some(path.clone()))),
            None => Ok(TrackerConfig::load_or_default()?),
        }
    }

    /// Overlay command-line flags on a loaded config
    fn apply(&self, config: &mut TrackerConfig) {
        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if self.headers {
            config.input.has_headers = true;
        }
        if let Some(occurrences) = self.occurrences {
            config.mining.occurrences = occurrences;
        }
        if let Some(min_len) = self.min_itemset_len {
            config.postprocess.min_itemset_len = Some(min_len);
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format.into();
        }
        if self.no_write {
            config.output.write = false;
        }
    }
}

/// Non-rotating file writer for the optional log file
fn file_log_writer(path: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("Log file {:?} has no file name", path))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("Failed to open log file {:?}", path))?;
    Ok(tracing_appender::non_blocking(appender))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (mut config, config_path) = cli.load_config()?;
    cli.apply(&mut config);

    // Initialize logging; stdout is reserved for the result table
    let file_writer = config
        .logging
        .file
        .as_deref()
        .map(file_log_writer)
        .transpose()?;
    let (file_layer, _log_guard) = match file_writer {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer),
            ),
            Some(guard),
        ),
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tracker_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    tracing::info!("Starting co-occurrence tracker");
    match &config_path {
        Some(path) => tracing::info!("Using config {:?}", path),
        None => tracing::info!("No config file found, using defaults"),
    }

    let pipeline = PipelineBuilder::new(config)
        .build()
        .context("Invalid configuration")?;
    let output = pipeline.run().context("Pipeline run failed")?;

    print!("{}", output.itemsets);

    let stats = &output.stats;
    tracing::info!(
        "{} rows, {} groups, {} macs, min_support {:.6}, {} of {} itemsets kept",
        stats.rows_loaded,
        stats.groups,
        stats.distinct_macs,
        stats.min_support,
        stats.itemsets_kept,
        stats.itemsets_mined
    );

    if pipeline.config().output.write {
        pipeline.write(&output).context("Failed to write results")?;
    } else {
        tracing::info!("Skipping write to {:?}", output.output_path);
    }

    Ok(())
}

//! Pipeline executor: runs the stages in order, once.
//!
//! Each run:
//! 1. Load the input table.
//! 2. Narrow and sort it.
//! 3. Apply the observation filter.
//! 4. Group macs by `(day, hour, ip)`.
//! 5. One-hot encode the groups.
//! 6. Mine maximal frequent itemsets.
//! 7. Apply the itemset filter.
//! 8. Derive the timestamped output path.
//!
//! Any stage failure aborts the run; the error is wrapped with the stage name.

use crate::config::TrackerConfig;
use crate::error::{Result, ResultExt};
use crate::pipeline::stages::{self, ItemsetFilter, LoaderOptions, ObservationFilter};
use crate::analysis::{support_threshold, MinerOptions};
use crate::types::{ItemsetTable, RawTable};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// Stages that can fail, in execution order. The filters and the grouper
/// are total and never abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loader,
    Normalizer,
    Encoder,
    Miner,
    Writer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loader => "Loader",
            Stage::Normalizer => "Normalizer",
            Stage::Encoder => "Encoder",
            Stage::Miner => "Miner",
            Stage::Writer => "Writer",
        };
        write!(f, "{}", name)
    }
}

impl Stage {
    /// Context attached to errors raised by this stage
    pub fn failure(&self) -> String {
        format!("{} stage failed", self)
    }
}

/// Counts collected while a run progresses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub rows_loaded: usize,
    pub rows_kept: usize,
    pub groups: usize,
    pub distinct_macs: usize,
    pub min_support: f64,
    pub itemsets_mined: usize,
    pub itemsets_kept: usize,
}

/// Result of a run: the final table and where it belongs
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub itemsets: ItemsetTable,
    pub output_path: PathBuf,
    pub stats: PipelineStats,
}

/// A configured, validated pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: TrackerConfig,
    loader: LoaderOptions,
    filter: ObservationFilter,
    miner: MinerOptions,
    postprocess: ItemsetFilter,
}

impl Pipeline {
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Load the configured input and run every stage up to the writer.
    ///
    /// The returned path is derived, not written; call [`Pipeline::write`].
    pub fn run(&self) -> Result<PipelineOutput> {
        let start = Instant::now();
        let raw = stages::load_path(&self.config.input.path, self.loader)
            .with_context(|| Stage::Loader.failure())?;
        let (itemsets, stats) = self.process(&raw)?;
        let output_path = stages::output_path(&self.config.output.dir, self.config.output.format);
        tracing::info!(
            "Run finished in {:.2?}: {} itemsets from {} groups",
            start.elapsed(),
            itemsets.len(),
            stats.groups
        );
        Ok(PipelineOutput {
            itemsets,
            output_path,
            stats,
        })
    }

    /// Run normalizer through postprocessor over an already loaded table.
    pub fn process(&self, raw: &RawTable) -> Result<(ItemsetTable, PipelineStats)> {
        let mut stats = PipelineStats {
            rows_loaded: raw.len(),
            ..Default::default()
        };

        let table = stages::normalize(raw).with_context(|| Stage::Normalizer.failure())?;
        let table = self.filter.apply(table);
        stats.rows_kept = table.len();

        let groups = stages::group(&table);
        stats.groups = groups.len();
        tracing::info!(
            "{} rows kept, {} groups of at least {} macs",
            stats.rows_kept,
            stats.groups,
            stages::MIN_GROUP_LEN
        );

        let matrix = stages::encode(&groups).with_context(|| Stage::Encoder.failure())?;
        stats.distinct_macs = matrix.n_cols();

        let occurrences = self.config.mining.occurrences;
        let mined = stages::mine(&matrix, occurrences, self.miner)
            .with_context(|| Stage::Miner.failure())?;
        stats.min_support = support_threshold(occurrences, matrix.n_rows())
            .with_context(|| Stage::Miner.failure())?;
        stats.itemsets_mined = mined.len();

        let itemsets = self.postprocess.apply(mined);
        stats.itemsets_kept = itemsets.len();
        Ok((itemsets, stats))
    }

    /// Write a run's table to its output path in the configured format.
    pub fn write(&self, output: &PipelineOutput) -> Result<()> {
        stages::write_table(
            &output.output_path,
            &output.itemsets,
            self.config.output.format,
        )
        .with_context(|| Stage::Writer.failure())
    }
}

/// Builds a [`Pipeline`] from a [`TrackerConfig`].
pub struct PipelineBuilder {
    config: TrackerConfig,
}

impl PipelineBuilder {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// Validate the config and derive per-stage options.
    pub fn build(self) -> Result<Pipeline> {
        self.config.validate()?;
        let loader = self.config.input.loader_options()?;
        tracing::debug!(
            "Pipeline configured: input {:?}, occurrences {}",
            self.config.input.path,
            self.config.mining.occurrences
        );
        Ok(Pipeline {
            loader,
            filter: self.config.filter.observation_filter(),
            miner: self.config.mining.miner_options(),
            postprocess: self.config.postprocess.itemset_filter(),
            config: self.config,
        })
    }
}

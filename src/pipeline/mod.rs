//! Linear co-occurrence pipeline.
//!
//! Data flows through the stages exactly once, each consuming only the
//! previous stage's output:
//!
//! ```text
//! [Loader] ──► [Normalizer] ──► [Filter] ──► [Grouper] ──► [Encoder]
//!                                                              │
//! [Writer] ◄── [Postprocessor] ◄── [Miner] ◄──────────────────┘
//! ```
//!
//! # Design
//!
//! - **Stages are functions**: every stage is a plain function (or a small
//!   filter value with `apply`) from its input to a new value.
//! - **Checked narrowing**: out-of-range values abort instead of wrapping.
//! - **Optional predicates**: the observation and itemset filters pass
//!   everything through unless configured.
//! - **Single threaded**: no background work, no shared state.

pub mod executor;
pub mod stages;

pub use executor::{Pipeline, PipelineBuilder, PipelineOutput, PipelineStats, Stage};
pub use stages::{Bounds, ItemsetFilter, LoaderOptions, ObservationFilter, OutputFormat};

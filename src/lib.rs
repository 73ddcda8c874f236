//! # tracker-rs: mac address co-occurrence tracker
//!
//! Reads `(day, hour, ip, mac)` recordings, groups the macs seen under the
//! same `(day, hour, ip)` key, and mines the maximal sets of macs that show
//! up together in at least a minimum number of groups.
//!
//! ## Architecture
//!
//! - **Pipeline**: load → normalize → filter → group → encode → mine →
//!   postprocess → write, run once and sequentially
//! - **Analysis**: FP-Max maximal frequent itemset miner
//! - **Config**: TOML configuration replacing the hardcoded run constants
//!
//! ## Example
//!
//! ```ignore
//! use tracker_rs::{config::TrackerConfig, pipeline::PipelineBuilder};
//!
//! fn main() -> tracker_rs::Result<()> {
//!     let mut config = TrackerConfig::default();
//!     config.input.path = "./recordings/recordings.csv".into();
//!     config.mining.occurrences = 5;
//!
//!     let pipeline = PipelineBuilder::new(config).build()?;
//!     let output = pipeline.run()?;
//!     print!("{}", output.itemsets);
//!     pipeline.write(&output)
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use analysis::{FpMax, MinerOptions};
pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineOutput};
pub use types::{EncodedMatrix, FrequentItemset, Group, ItemsetTable, Observation, ObservationTable};

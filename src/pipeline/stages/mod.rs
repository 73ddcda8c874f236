//! Pipeline stages, in execution order.

pub mod encoder;
pub mod filter;
pub mod grouper;
pub mod loader;
pub mod miner;
pub mod normalizer;
pub mod postprocess;
pub mod writer;

pub use encoder::encode;
pub use filter::{Bounds, ObservationFilter};
pub use grouper::{group, MIN_GROUP_LEN};
pub use loader::{load_path, load_reader, LoaderOptions};
pub use miner::mine;
pub use normalizer::normalize;
pub use postprocess::ItemsetFilter;
pub use writer::{output_path, output_path_at, write_table, OutputFormat, TIMESTAMP_FORMAT};

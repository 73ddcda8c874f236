//! Analysis module for co-occurrence mining
//!
//! This module provides:
//! - Maximal frequent itemset mining (FP-Max) over one-hot group matrices
//! - Conversion of absolute occurrence counts into support thresholds

pub mod fpmax;

pub use fpmax::{min_count_for, support_threshold, FpMax, MinerOptions};

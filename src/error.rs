//! Error handling for the tracker
//!
//! This module defines the crate error type and a Result alias used by every
//! pipeline stage. Any stage failure aborts the whole run; the executor only
//! wraps errors with the name of the stage that produced them.

use thiserror::Error;

/// Main error type for tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Malformed input row (bad delimiter, wrong field count, non-integer field)
    #[error("Parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A value does not fit the integer width of its column
    #[error("Range error: {column} value {value} at row {row} does not fit in {width}")]
    Range {
        column: &'static str,
        row: usize,
        value: i64,
        width: &'static str,
    },

    /// No groups survived grouping, so there is nothing to encode or mine
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A support ratio was requested over zero groups
    #[error("Division error: {0}")]
    Division(String),

    /// Errors related to configuration loading/saving/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TrackerError>,
    },
}

impl TrackerError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TrackerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context layers stripped
    pub fn root(&self) -> &TrackerError {
        match self {
            TrackerError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

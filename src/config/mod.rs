//! Configuration module for the tracker
//!
//! This module replaces the hardcoded constants of a run (input path,
//! occurrence threshold, output directory) with an explicit configuration
//! passed into the pipeline.
//!
//! # Config Location
//!
//! The binary looks for a config file in this order:
//! 1. `--config <path>` on the command line
//! 2. `tracker.toml` in the working directory
//! 3. `tracker.toml` in the platform config directory under `tracker-rs`:
//!    - **Linux**: `~/.config/tracker-rs/`
//!    - **macOS**: `~/Library/Application Support/tracker-rs/`
//!    - **Windows**: `%APPDATA%\tracker-rs\`
//!
//! Without any file the defaults below apply. Every field is optional in
//! the file.
//!
//! # Example
//!
//! ```toml
//! [input]
//! path = "./recordings/recordings.csv"
//!
//! [mining]
//! occurrences = 5
//!
//! [filter]
//! hour_range = { min = 8, max = 18 }
//!
//! [output]
//! dir = "./runs"
//! format = "csv"
//! ```

use crate::error::{Result, TrackerError};
use crate::pipeline::stages::{Bounds, ItemsetFilter, LoaderOptions, ObservationFilter, OutputFormat};
use crate::analysis::MinerOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "tracker-rs";

/// Config filename
pub const CONFIG_FILE: &str = "tracker.toml";

/// Default input file
pub const DEFAULT_INPUT_PATH: &str = "./recordings/recordings_example.csv";

/// Default minimum co-occurrence count
pub const DEFAULT_OCCURRENCES: usize = 5;

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "./runs";

// ==================== Config Location ====================

/// Platform config directory for the tracker
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// First existing config file among the working directory and the
/// platform config directory
pub fn find_config_file() -> Option<PathBuf> {
    find_config_file_in(Path::new(""), config_dir().as_deref())
}

/// First existing `tracker.toml` in `local`, then in `platform`
pub fn find_config_file_in(local: &Path, platform: Option<&Path>) -> Option<PathBuf> {
    std::iter::once(local)
        .chain(platform)
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|p| p.is_file())
}

// ==================== Sections ====================

/// Input source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the delimited recordings file
    #[serde(default = "default_input_path")]
    pub path: PathBuf,

    /// Whether the first row is a header naming the columns
    #[serde(default)]
    pub has_headers: bool,

    /// Field delimiter, a single ASCII character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_input_path() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_PATH)
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            has_headers: false,
            delimiter: default_delimiter(),
        }
    }
}

impl InputConfig {
    /// Loader options derived from this section
    pub fn loader_options(&self) -> Result<LoaderOptions> {
        let delimiter = match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => {
                return Err(TrackerError::Config(format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    self.delimiter
                )))
            }
        };
        Ok(LoaderOptions {
            has_headers: self.has_headers,
            delimiter,
        })
    }
}

/// Mining settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Minimum number of groups an itemset must appear in
    #[serde(default = "default_occurrences")]
    pub occurrences: usize,

    /// Report mac ids instead of column indices
    #[serde(default = "default_true")]
    pub use_labels: bool,
}

fn default_occurrences() -> usize {
    DEFAULT_OCCURRENCES
}

fn default_true() -> bool {
    true
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            occurrences: DEFAULT_OCCURRENCES,
            use_labels: true,
        }
    }
}

impl MiningConfig {
    pub fn miner_options(&self) -> MinerOptions {
        MinerOptions {
            use_labels: self.use_labels,
        }
    }
}

/// Optional row filter. Unset ranges keep every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub day_range: Option<Bounds>,

    #[serde(default)]
    pub hour_range: Option<Bounds>,
}

impl FilterConfig {
    pub fn observation_filter(&self) -> ObservationFilter {
        ObservationFilter {
            days: self.day_range,
            hours: self.hour_range,
        }
    }
}

/// Optional result filter. Unset keeps every itemset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostprocessConfig {
    #[serde(default)]
    pub min_itemset_len: Option<usize>,
}

impl PostprocessConfig {
    pub fn itemset_filter(&self) -> ItemsetFilter {
        ItemsetFilter {
            min_len: self.min_itemset_len,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving timestamped result files
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,

    /// Whether to write the result file at all
    #[serde(default = "default_true")]
    pub write: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::Csv,
            write: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to this file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// ==================== Tracker Config ====================

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub mining: MiningConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub postprocess: PostprocessConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TrackerConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TrackerError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        toml::from_str(&content).map_err(|e| {
            TrackerError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Load the first config file found, or defaults when there is none.
    /// Also returns the path that was loaded.
    pub fn load_or_default() -> Result<(Self, Option<PathBuf>)> {
        match find_config_file() {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Save config to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TrackerError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            TrackerError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.mining.occurrences == 0 {
            return Err(TrackerError::Config(
                "mining.occurrences must be at least 1".to_string(),
            ));
        }
        self.input.loader_options()?;
        for (name, range) in [
            ("filter.day_range", self.filter.day_range),
            ("filter.hour_range", self.filter.hour_range),
        ] {
            if let Some(b) = range {
                if b.min > b.max {
                    return Err(TrackerError::Config(format!(
                        "{} has min {} above max {}",
                        name, b.min, b.max
                    )));
                }
            }
        }
        if self.postprocess.min_itemset_len == Some(0) {
            return Err(TrackerError::Config(
                "postprocess.min_itemset_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ==================== Tests ====================

//! Writer stage: timestamped output path and table export.
//!
//! Output lives at `<dir>/<YYYYMMDD-HHMMSS>.<ext>`. Two runs within the same
//! second resolve to the same path and the later one overwrites the earlier.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultExt, TrackerError};
use crate::types::ItemsetTable;

/// Timestamp layout used for output file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `itemsets,support` rows, itemset as space separated ids
    #[default]
    Csv,
    /// One JSON object per line
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "jsonl",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON Lines"),
        }
    }
}

/// Output path for a run started at `at`
pub fn output_path_at<Tz>(dir: impl AsRef<Path>, at: &DateTime<Tz>, format: OutputFormat) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    dir.as_ref()
        .join(format!("{}.{}", at.format(TIMESTAMP_FORMAT), format.extension()))
}

/// Output path for a run starting now (local wall clock)
pub fn output_path(dir: impl AsRef<Path>, format: OutputFormat) -> PathBuf {
    output_path_at(dir, &Local::now(), format)
}

#[derive(Serialize)]
struct CsvRow {
    itemsets: String,
    support: f64,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    itemsets: &'a [u16],
    support: f64,
    count: usize,
}

/// Write `table` to `path`, creating the parent directory when missing.
pub fn write_table(path: impl AsRef<Path>, table: &ItemsetTable, format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(TrackerError::from)
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }
    }

    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)
                .map_err(csv_write_error)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            if table.is_empty() {
                writer
                    .write_record(["itemsets", "support"])
                    .map_err(csv_write_error)?;
            }
            for set in table.iter() {
                writer
                    .serialize(CsvRow {
                        itemsets: set.items_string(),
                        support: set.support,
                    })
                    .map_err(csv_write_error)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let file = File::create(path)
                .map_err(TrackerError::from)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            let mut writer = BufWriter::new(file);
            for set in table.iter() {
                let line = serde_json::to_string(&JsonRow {
                    itemsets: &set.items,
                    support: set.support,
                    count: set.count,
                })
                .map_err(|e| TrackerError::Serialization(e.to_string()))?;
                writeln!(writer, "{}", line)?;
            }
            writer.flush()?;
        }
    }

    tracing::info!("Wrote {} itemsets to {:?} ({})", table.len(), path, format);
    Ok(())
}

fn csv_write_error(err: csv::Error) -> TrackerError {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => TrackerError::Io(e),
        other => TrackerError::Serialization(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrequentItemset;

    fn table() -> ItemsetTable {
        ItemsetTable::new(
            vec![
                FrequentItemset {
                    items: vec![1, 2],
                    support: 0.75,
                    count: 3,
                },
                FrequentItemset {
                    items: vec![4, 7, 9],
                    support: 0.5,
                    count: 2,
                },
            ],
            true,
        )
    }

    #[test]
    fn test_output_path_layout() {
        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        let path = output_path_at("./runs", &at, OutputFormat::Csv);
        assert_eq!(path, PathBuf::from("./runs/20240307-090501.csv"));
        let path = output_path_at("out", &at, OutputFormat::Json);
        assert_eq!(path, PathBuf::from("out/20240307-090501.jsonl"));
    }

    #[test]
    fn test_same_second_same_path() {
        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            output_path_at("runs", &at, OutputFormat::Csv),
            output_path_at("runs", &at, OutputFormat::Csv)
        );
    }

    #[test]
    fn test_write_csv_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("out.csv");
        write_table(&path, &table(), OutputFormat::Csv).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["itemsets,support", "1 2,0.75", "4 7 9,0.5"]);
    }

    #[test]
    fn test_write_empty_csv_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_table(&path, &ItemsetTable::default(), OutputFormat::Csv).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "itemsets,support");
    }

    #[test]
    fn test_write_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        write_table(&path, &table(), OutputFormat::Json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let first: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(first["itemsets"], serde_json::json!([1, 2]));
        assert_eq!(first["support"], serde_json::json!(0.75));
        assert_eq!(content.lines().count(), 2);
    }
}

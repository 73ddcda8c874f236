//! Loader stage: reads delimited `(day, hour, ip, mac)` records.
//!
//! Headerless input is read positionally. With `has_headers` the header row
//! is matched by column name, so the four columns may appear in any order.
//! Malformed rows (wrong field count, non-integer fields) fail the load.

use std::io::Read;
use std::path::Path;

use crate::error::{Result, ResultExt};
use crate::types::{RawObservation, RawTable};

/// How to read the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    pub has_headers: bool,
    pub delimiter: u8,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            has_headers: false,
            delimiter: b',',
        }
    }
}

/// Load observations from a file path.
pub fn load_path(path: impl AsRef<Path>, options: LoaderOptions) -> Result<RawTable> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(crate::error::TrackerError::from)
        .with_context(|| format!("Failed to open input {:?}", path))?;
    let table = collect(reader).with_context(|| format!("Failed to read input {:?}", path))?;
    tracing::info!("Loaded {} rows from {:?}", table.len(), path);
    Ok(table)
}

/// Load observations from any reader (in-memory sources, stdin).
pub fn load_reader<R: Read>(reader: R, options: LoaderOptions) -> Result<RawTable> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);
    collect(reader)
}

fn collect<R: Read>(mut reader: csv::Reader<R>) -> Result<RawTable> {
    let rows = reader
        .deserialize::<RawObservation>()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
    Ok(RawTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;

    #[test]
    fn test_load_headerless() {
        let data = "1,9,100,1\n1,9,100,2\n2,10,7,3\n";
        let table = load_reader(data.as_bytes(), LoaderOptions::default()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[2], RawObservation::new(2, 10, 7, 3));
    }

    #[test]
    fn test_load_with_headers_in_any_order() {
        let data = "mac,ip,hour,day\n4,100,9,1\n";
        let options = LoaderOptions {
            has_headers: true,
            ..Default::default()
        };
        let table = load_reader(data.as_bytes(), options).unwrap();
        assert_eq!(table.rows, vec![RawObservation::new(1, 9, 100, 4)]);
    }

    #[test]
    fn test_custom_delimiter() {
        let data = "1;2;3;4\n";
        let options = LoaderOptions {
            delimiter: b';',
            ..Default::default()
        };
        let table = load_reader(data.as_bytes(), options).unwrap();
        assert_eq!(table.rows, vec![RawObservation::new(1, 2, 3, 4)]);
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let data = "1,9,100,1\n1,9,100\n";
        let err = load_reader(data.as_bytes(), LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, TrackerError::Parse(_)));
    }

    #[test]
    fn test_non_integer_is_parse_error() {
        let data = "1,9,abc,1\n";
        let err = load_reader(data.as_bytes(), LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, TrackerError::Parse(_)));
    }

    #[test]
    fn test_wrong_delimiter_is_parse_error() {
        let data = "1;9;100;1\n";
        let err = load_reader(data.as_bytes(), LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, TrackerError::Parse(_)));
    }

    #[test]
    fn test_empty_source() {
        let table = load_reader("".as_bytes(), LoaderOptions::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_path("/nonexistent/recordings.csv", LoaderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to open input"));
        assert!(matches!(err.root(), TrackerError::Parse(_)));
    }
}

//! Core data types for the tracker
//!
//! This module contains the data structures handed from one pipeline stage
//! to the next.
//!
//! # Main Types
//!
//! - [`RawObservation`] - One input record as parsed, before narrowing
//! - [`Observation`] - One narrowed `(day, hour, ip, mac)` row
//! - [`ObservationTable`] - Canonical, sorted table of observations
//! - [`Group`] - Mac ids seen together under one `(day, hour, ip)` key
//! - [`EncodedMatrix`] - One-hot group membership matrix consumed by the miner
//! - [`FrequentItemset`] / [`ItemsetTable`] - Mining results
//!
//! # Widths
//!
//! Day and hour are narrowed to `u8`, ip and mac to `u16`. Narrowing is
//! always checked; see [`crate::pipeline::stages::normalizer`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TrackerError};

/// Mac address identifier
pub type MacId = u16;

/// Ip identifier
pub type IpId = u16;

/// One input record exactly as parsed from the source.
///
/// Field order matches the column order of headerless input files; with
/// headers the columns are matched by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    pub day: i64,
    pub hour: i64,
    pub ip: i64,
    pub mac: i64,
}

impl RawObservation {
    pub fn new(day: i64, hour: i64, ip: i64, mac: i64) -> Self {
        Self { day, hour, ip, mac }
    }
}

impl From<Observation> for RawObservation {
    fn from(obs: Observation) -> Self {
        Self {
            day: obs.day.into(),
            hour: obs.hour.into(),
            ip: obs.ip.into(),
            mac: obs.mac.into(),
        }
    }
}

/// A single observation narrowed to compact widths.
///
/// Field order is the sort order: deriving `Ord` gives the lexicographic
/// `(day, hour, ip, mac)` ordering used by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub day: u8,
    pub hour: u8,
    pub ip: IpId,
    pub mac: MacId,
}

impl Observation {
    pub fn new(day: u8, hour: u8, ip: IpId, mac: MacId) -> Self {
        Self { day, hour, ip, mac }
    }

    /// The grouping key: observations sharing it co-occur.
    pub fn key(&self) -> GroupKey {
        GroupKey {
            day: self.day,
            hour: self.hour,
            ip: self.ip,
        }
    }
}

/// Composite `(day, hour, ip)` key used by the grouper
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub day: u8,
    pub hour: u8,
    pub ip: IpId,
}

/// Raw table straight out of the loader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<RawObservation>,
}

impl RawTable {
    pub fn new(rows: Vec<RawObservation>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<&ObservationTable> for RawTable {
    fn from(table: &ObservationTable) -> Self {
        Self {
            rows: table.rows.iter().copied().map(RawObservation::from).collect(),
        }
    }
}

/// Narrowed table of observations.
///
/// Row position is the row index; after normalization rows are sorted and
/// numbered `0..len()` contiguously.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationTable {
    pub rows: Vec<Observation>,
}

impl ObservationTable {
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.rows.iter()
    }

    /// Whether rows are in ascending `(day, hour, ip, mac)` order
    pub fn is_sorted(&self) -> bool {
        self.rows.windows(2).all(|w| w[0] <= w[1])
    }
}

/// Mac ids observed together under one `(day, hour, ip)` key, in row order.
///
/// Duplicates are kept when the source contains duplicate rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub macs: Vec<MacId>,
}

impl Group {
    pub fn new(macs: Vec<MacId>) -> Self {
        Self { macs }
    }

    pub fn len(&self) -> usize {
        self.macs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macs.is_empty()
    }

    /// Distinct mac ids in ascending order
    pub fn distinct(&self) -> Vec<MacId> {
        let mut macs = self.macs.clone();
        macs.sort_unstable();
        macs.dedup();
        macs
    }
}

/// One-hot membership matrix: rows are groups, columns are distinct mac ids.
///
/// Cells are stored row-major in a flat buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMatrix {
    columns: Vec<MacId>,
    cells: Vec<bool>,
    n_rows: usize,
}

impl EncodedMatrix {
    /// Build a matrix from explicit column labels and boolean rows.
    ///
    /// Labels must be strictly ascending and every row must have one cell
    /// per label.
    pub fn from_rows(columns: Vec<MacId>, rows: Vec<Vec<bool>>) -> Result<Self> {
        if columns.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TrackerError::Config(
                "matrix column labels must be strictly ascending".to_string(),
            ));
        }
        let width = columns.len();
        let n_rows = rows.len();
        let mut cells = Vec::with_capacity(n_rows * width);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(TrackerError::Config(format!(
                    "matrix row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    width
                )));
            }
            cells.extend(row);
        }
        Ok(Self {
            columns,
            cells,
            n_rows,
        })
    }

    pub(crate) fn from_parts(columns: Vec<MacId>, cells: Vec<bool>, n_rows: usize) -> Self {
        debug_assert_eq!(cells.len(), columns.len() * n_rows);
        Self {
            columns,
            cells,
            n_rows,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column index to mac id mapping
    pub fn columns(&self) -> &[MacId] {
        &self.columns
    }

    /// Column index holding `mac`, if that mac appears anywhere
    pub fn column_of(&self, mac: MacId) -> Option<usize> {
        self.columns.binary_search(&mac).ok()
    }

    pub fn row(&self, i: usize) -> &[bool] {
        let w = self.n_cols();
        &self.cells[i * w..(i + 1) * w]
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.row(row)[col]
    }

    /// Column indices set in each row
    pub fn transactions(&self) -> Vec<Vec<usize>> {
        (0..self.n_rows)
            .map(|i| {
                self.row(i)
                    .iter()
                    .enumerate()
                    .filter_map(|(j, &set)| set.then_some(j))
                    .collect()
            })
            .collect()
    }

    /// Number of rows in which every listed column is set
    pub fn count_containing(&self, cols: &[usize]) -> usize {
        (0..self.n_rows)
            .filter(|&i| {
                let row = self.row(i);
                cols.iter().all(|&c| row[c])
            })
            .count()
    }
}

/// A maximal frequent itemset with its support.
///
/// `items` are ascending; they are mac ids when mined with labels and
/// positional column indices otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentItemset {
    pub items: Vec<u16>,
    /// Fraction of groups containing every item
    pub support: f64,
    /// Absolute number of groups containing every item
    pub count: usize,
}

impl FrequentItemset {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether this itemset's items are a proper subset of `other`'s
    pub fn is_proper_subset_of(&self, other: &FrequentItemset) -> bool {
        self.items.len() < other.items.len()
            && self
                .items
                .iter()
                .all(|i| other.items.binary_search(i).is_ok())
    }

    /// Space separated item list, e.g. `1 2 7`
    pub fn items_string(&self) -> String {
        self.items
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Mining result table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemsetTable {
    pub itemsets: Vec<FrequentItemset>,
    /// Whether items are mac ids (true) or column indices (false)
    pub labeled: bool,
}

impl ItemsetTable {
    pub fn new(itemsets: Vec<FrequentItemset>, labeled: bool) -> Self {
        Self { itemsets, labeled }
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrequentItemset> {
        self.itemsets.iter()
    }
}

impl fmt::Display for ItemsetTable {
    /// Renders every row: index, support, itemset.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.itemsets.is_empty() {
            return writeln!(f, "Empty itemset table (support, itemsets)");
        }
        let index_width = (self.itemsets.len() - 1).to_string().len();
        writeln!(f, "{:>index_width$}  {:>8}  itemsets", "", "support")?;
        for (i, set) in self.itemsets.iter().enumerate() {
            writeln!(
                f,
                "{:>index_width$}  {:>8.6}  {{{}}}",
                i,
                set.support,
                set.items
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_ordering_is_lexicographic() {
        let mut rows = vec![
            Observation::new(2, 0, 1, 1),
            Observation::new(1, 9, 100, 3),
            Observation::new(1, 9, 100, 1),
            Observation::new(1, 8, 200, 5),
        ];
        rows.sort();
        assert_eq!(rows[0], Observation::new(1, 8, 200, 5));
        assert_eq!(rows[1], Observation::new(1, 9, 100, 1));
        assert_eq!(rows[3], Observation::new(2, 0, 1, 1));
    }

    #[test]
    fn test_group_distinct() {
        let group = Group::new(vec![5, 3, 5, 1]);
        assert_eq!(group.len(), 4);
        assert_eq!(group.distinct(), vec![1, 3, 5]);
    }

    #[test]
    fn test_matrix_from_rows_validates_width() {
        let err = EncodedMatrix::from_rows(vec![1, 2], vec![vec![true]]).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn test_matrix_from_rows_rejects_unsorted_labels() {
        assert!(EncodedMatrix::from_rows(vec![2, 1], vec![]).is_err());
    }

    #[test]
    fn test_matrix_accessors() {
        let m = EncodedMatrix::from_rows(
            vec![10, 20, 30],
            vec![vec![true, false, true], vec![true, true, false]],
        )
        .unwrap();
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.n_cols(), 3);
        assert!(m.get(1, 1));
        assert_eq!(m.column_of(30), Some(2));
        assert_eq!(m.column_of(25), None);
        assert_eq!(m.transactions(), vec![vec![0, 2], vec![0, 1]]);
        assert_eq!(m.count_containing(&[0]), 2);
        assert_eq!(m.count_containing(&[0, 1]), 1);
    }

    #[test]
    fn test_proper_subset() {
        let a = FrequentItemset {
            items: vec![1, 3],
            support: 0.5,
            count: 2,
        };
        let b = FrequentItemset {
            items: vec![1, 2, 3],
            support: 0.25,
            count: 1,
        };
        assert!(a.is_proper_subset_of(&b));
        assert!(!b.is_proper_subset_of(&a));
        assert!(!a.is_proper_subset_of(&a));
    }

    #[test]
    fn test_table_display_lists_every_row() {
        let table = ItemsetTable::new(
            (0..12)
                .map(|i| FrequentItemset {
                    items: vec![i, i + 1],
                    support: 0.5,
                    count: 6,
                })
                .collect(),
            true,
        );
        let rendered = table.to_string();
        assert_eq!(rendered.lines().count(), 13);
        assert!(rendered.contains("{11, 12}"));
    }

    #[test]
    fn test_raw_from_observation() {
        let raw = RawObservation::from(Observation::new(1, 2, 300, 4000));
        assert_eq!(raw, RawObservation::new(1, 2, 300, 4000));
    }
}

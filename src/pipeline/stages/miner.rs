//! Miner stage: occurrence threshold to support, then FP-Max.

use crate::analysis::{support_threshold, FpMax, MinerOptions};
use crate::error::{Result, TrackerError};
use crate::types::{EncodedMatrix, ItemsetTable};

/// Mine maximal mac sets seen together in at least `occurrences` groups.
///
/// Zero groups fail with [`TrackerError::EmptyInput`]; an `occurrences`
/// above the group count yields an empty table.
pub fn mine(matrix: &EncodedMatrix, occurrences: usize, options: MinerOptions) -> Result<ItemsetTable> {
    if matrix.is_empty() {
        return Err(TrackerError::EmptyInput("no groups to mine".to_string()));
    }
    if occurrences == 0 {
        return Err(TrackerError::Config(
            "occurrences must be at least 1".to_string(),
        ));
    }
    let min_support = support_threshold(occurrences, matrix.n_rows())?;
    tracing::info!(
        "Mining with min_support {:.6} ({} occurrences over {} groups)",
        min_support,
        occurrences,
        matrix.n_rows()
    );
    FpMax::new(options).mine(matrix, min_support)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stages::encode;
    use crate::types::Group;

    #[test]
    fn test_occurrences_over_groups() {
        let groups: Vec<Group> = (0..6)
            .map(|i| {
                if i % 2 == 0 {
                    Group::new(vec![1, 2, 3])
                } else {
                    Group::new(vec![1, 2])
                }
            })
            .collect();
        let m = encode(&groups).unwrap();
        let table = mine(&m, 5, MinerOptions::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.itemsets[0].items, vec![1, 2]);
        assert_eq!(table.itemsets[0].count, 6);
        assert!(table.itemsets[0].support >= 5.0 / 6.0);
    }

    #[test]
    fn test_occurrences_above_group_count() {
        let m = encode(&[Group::new(vec![1, 2])]).unwrap();
        assert!(mine(&m, 5, MinerOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_zero_groups() {
        let m = EncodedMatrix::from_rows(vec![], vec![]).unwrap();
        assert!(matches!(
            mine(&m, 5, MinerOptions::default()).unwrap_err(),
            TrackerError::EmptyInput(_)
        ));
    }

    #[test]
    fn test_zero_occurrences() {
        let m = encode(&[Group::new(vec![1, 2])]).unwrap();
        assert!(mine(&m, 0, MinerOptions::default()).is_err());
    }
}

//! Postprocess stage: optional itemset cardinality cutoff.

use crate::types::ItemsetTable;

/// Result filter. With no minimum length configured it passes everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemsetFilter {
    pub min_len: Option<usize>,
}

impl ItemsetFilter {
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn with_min_len(min_len: usize) -> Self {
        Self {
            min_len: Some(min_len),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        self.min_len.is_none()
    }

    pub fn apply(&self, mut table: ItemsetTable) -> ItemsetTable {
        if let Some(min_len) = self.min_len {
            let before = table.len();
            table.itemsets.retain(|s| s.len() >= min_len);
            tracing::debug!(
                "Kept {} of {} itemsets with at least {} items",
                table.len(),
                before,
                min_len
            );
        }
        table
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
                    support: 0.5,
                    count: 5,
                },
                FrequentItemset {
                    items: vec![3, 4, 5],
                    support: 0.5,
                    count: 5,
                },
            ],
            true,
        )
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(ItemsetFilter::passthrough().apply(table()), table());
    }

    #[test]
    fn test_min_len() {
        let out = ItemsetFilter::with_min_len(3).apply(table());
        assert_eq!(out.len(), 1);
        assert_eq!(out.itemsets[0].items, vec![3, 4, 5]);
    }
}

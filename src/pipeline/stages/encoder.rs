//! Encoder stage: one-hot group membership.

use crate::error::{Result, TrackerError};
use crate::types::{EncodedMatrix, Group, MacId};

/// Encode groups as a boolean matrix.
///
/// Columns are the distinct macs across all groups in ascending order; cell
/// `(i, j)` is set iff group `i` contains column `j`'s mac. Fails with
/// [`TrackerError::EmptyInput`] when there are no groups.
pub fn encode(groups: &[Group]) -> Result<EncodedMatrix> {
    if groups.is_empty() {
        return Err(TrackerError::EmptyInput(
            "no groups of two or more macs to encode".to_string(),
        ));
    }

    let mut columns: Vec<MacId> = groups.iter().flat_map(|g| g.macs.iter().copied()).collect();
    columns.sort_unstable();
    columns.dedup();

    let width = columns.len();
    let mut cells = vec![false; groups.len() * width];
    for (i, g) in groups.iter().enumerate() {
        for mac in &g.macs {
            // every mac is a column by construction
            if let Ok(j) = columns.binary_search(mac) {
                cells[i * width + j] = true;
            }
        }
    }

    tracing::debug!("Encoded {} groups over {} macs", groups.len(), width);
    Ok(EncodedMatrix::from_parts(columns, cells, groups.len()))
}

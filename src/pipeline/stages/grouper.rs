//! Grouper stage: collects co-occurring macs per `(day, hour, ip)` key.

use std::collections::BTreeMap;

use crate::types::{Group, GroupKey, MacId, ObservationTable};

/// Smallest group that can express a co-occurrence
pub const MIN_GROUP_LEN: usize = 2;

/// Partition rows by `(day, hour, ip)` and keep groups of two or more macs.
///
/// Groups come out in ascending key order; macs keep their row order and
/// duplicates are not removed. The key itself is dropped.
pub fn group(table: &ObservationTable) -> Vec<Group> {
    let mut partitions: BTreeMap<GroupKey, Vec<MacId>> = BTreeMap::new();
    for obs in table.iter() {
        partitions.entry(obs.key()).or_default().push(obs.mac);
    }

    let total = partitions.len();
    let groups: Vec<Group> = partitions
        .into_values()
        .filter(|macs| macs.len() >= MIN_GROUP_LEN)
        .map(Group::new)
        .collect();

    tracing::debug!(
        "Grouped {} rows into {} keys, {} with at least {} macs",
        table.len(),
        total,
        groups.len(),
        MIN_GROUP_LEN
    );
    groups
}

//! Normalizer stage: checked narrowing, canonical sort.
//!
//! Day and hour narrow to `u8`, ip and mac to `u16`. Out-of-range values
//! (including negatives) fail with [`TrackerError::Range`] instead of
//! wrapping. Rows are then sorted by `(day, hour, ip, mac)`; the row index
//! is the position in the resulting vector.

use crate::error::{Result, TrackerError};
use crate::types::{Observation, ObservationTable, RawObservation, RawTable};

/// Narrow and sort a raw table.
pub fn normalize(raw: &RawTable) -> Result<ObservationTable> {
    let mut rows = raw
        .rows
        .iter()
        .enumerate()
        .map(|(row, obs)| narrow(row, obs))
        .collect::<Result<Vec<_>>>()?;
    rows.sort_unstable();
    tracing::debug!("Normalized {} rows", rows.len());
    Ok(ObservationTable::new(rows))
}

/// Narrow a single record, reporting `row` on failure.
pub fn narrow(row: usize, obs: &RawObservation) -> Result<Observation> {
    Ok(Observation {
        day: checked("day", row, obs.day)?,
        hour: checked("hour", row, obs.hour)?,
        ip: checked("ip", row, obs.ip)?,
        mac: checked("mac", row, obs.mac)?,
    })
}

fn checked<T: TryFrom<i64>>(column: &'static str, row: usize, value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| TrackerError::Range {
        column,
        row,
        value,
        width: std::any::type_name::<T>(),
    })
}

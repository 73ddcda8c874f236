//! Observation filter stage.
//!
//! When no range is configured every row passes through (passthrough mode).
//! Otherwise only rows whose day and hour fall inside the configured
//! inclusive ranges are kept. Order is preserved.

use serde::{Deserialize, Serialize};

use crate::types::{Observation, ObservationTable};

/// Inclusive `[min, max]` bound on a `u8` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u8,
    pub max: u8,
}

impl Bounds {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Temporal row filter. Empty = passthrough all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservationFilter {
    pub days: Option<Bounds>,
    pub hours: Option<Bounds>,
}

impl ObservationFilter {
    /// Filter that keeps every row
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn with_days(mut self, days: Bounds) -> Self {
        self.days = Some(days);
        self
    }

    pub fn with_hours(mut self, hours: Bounds) -> Self {
        self.hours = Some(hours);
        self
    }

    pub fn is_passthrough(&self) -> bool {
        self.days.is_none() && self.hours.is_none()
    }

    pub fn matches(&self, obs: &Observation) -> bool {
        self.days.map_or(true, |b| b.contains(obs.day))
            && self.hours.map_or(true, |b| b.contains(obs.hour))
    }

    pub fn apply(&self, table: ObservationTable) -> ObservationTable {
        if self.is_passthrough() {
            return table;
        }
        let before = table.len();
        let rows: Vec<Observation> = table.rows.into_iter().filter(|o| self.matches(o)).collect();
        tracing::debug!("Filter kept {} of {} rows", rows.len(), before);
        ObservationTable::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ObservationTable {
        ObservationTable::new(vec![
            Observation::new(1, 8, 1, 1),
            Observation::new(1, 12, 1, 2),
            Observation::new(2, 8, 1, 3),
            Observation::new(3, 20, 1, 4),
        ])
    }

    #[test]
    fn test_passthrough_is_identity() {
        let filter = ObservationFilter::passthrough();
        assert!(filter.is_passthrough());
        assert_eq!(filter.apply(table()), table());
    }

    #[test]
    fn test_day_range() {
        let out = ObservationFilter::default()
            .with_days(Bounds::new(1, 2))
            .apply(table());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_day_and_hour_range() {
        let out = ObservationFilter::default()
            .with_days(Bounds::new(1, 2))
            .with_hours(Bounds::new(8, 8))
            .apply(table());
        let macs: Vec<u16> = out.iter().map(|o| o.mac).collect();
        assert_eq!(macs, vec![1, 3]);
    }
}

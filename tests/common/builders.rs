//! Test data builders for recordings

use tracker_rs::types::{RawObservation, RawTable};

/// Builder for recordings, one `(day, hour, ip)` slot at a time
#[derive(Default)]
pub struct RecordingBuilder {
    rows: Vec<RawObservation>,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every mac in `macs` under the same key
    pub fn seen(mut self, day: i64, hour: i64, ip: i64, macs: &[i64]) -> Self {
        for &mac in macs {
            self.rows.push(RawObservation::new(day, hour, ip, mac));
        }
        self
    }

    /// Record `macs` together in `hours` consecutive hours starting at `start`
    pub fn repeated(mut self, day: i64, start: i64, hours: i64, ip: i64, macs: &[i64]) -> Self {
        for hour in start..start + hours {
            self = self.seen(day, hour, ip, macs);
        }
        self
    }

    pub fn build(self) -> RawTable {
        RawTable::new(self.rows)
    }

    /// Headerless CSV text for the recorded rows
    pub fn to_csv(&self) -> String {
        self.rows
            .iter()
            .map(|r| format!("{},{},{},{}\n", r.day, r.hour, r.ip, r.mac))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_builder() {
        let builder = RecordingBuilder::new().repeated(1, 8, 2, 100, &[1, 2]);
        assert_eq!(builder.to_csv(), "1,8,100,1\n1,8,100,2\n1,9,100,1\n1,9,100,2\n");
        assert_eq!(builder.build().len(), 4);
    }
}

// ── Bulk read application ──
//
// Decodes a full set of sensor readings into a staged copy of the
// current snapshot and commits it in one step, so readers never see a
// half-applied refresh.

use mhac_api::SensorReading;

use super::StateStore;
use crate::codec::CodecTable;

/// Outcome of applying one bulk read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct RefreshReport {
    pub decoded: usize,
    pub ignored: usize,
    /// Readings with wire ids the codec does not know. Skipped.
    pub unknown: Vec<SensorReading>,
}

impl StateStore {
    /// Apply `readings`. Attributes absent from `readings` keep their
    /// previous value.
    pub(crate) fn apply_readings(
        &mut self,
        codec: &CodecTable,
        readings: &[SensorReading],
    ) -> RefreshReport {
        let mut staged = self.current.clone();
        let mut report = RefreshReport::default();

        for reading in readings {
            match codec.decode(reading.uid, reading.value) {
                Ok(Some((attribute, value))) => {
                    staged.insert(attribute, value);
                    report.decoded += 1;
                }
                Ok(None) => report.ignored += 1,
                Err(_) => report.unknown.push(*reading),
            }
        }

        self.current = staged;
        report
    }
}

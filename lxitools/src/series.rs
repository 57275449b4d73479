//! Assembly of housekeeping samples into one time-aligned table
//!
//! Each housekeeping frame carries a single channel, so any one channel is
//! only seen intermittently. The table has one row per distinct timestamp and
//! one column per channel; after assembly every column holds the last known
//! calibrated value at each row, and is `None` only before its first reading.

use std::collections::HashMap;
use tracing::warn;

use crate::cal::{CalibrationError, HardwareUnit, HkId};
use crate::hk::HousekeepingSample;
use crate::Timestamped;

/// Number of housekeeping channels
pub const HK_CHANNELS: usize = 16;

/// One row of the housekeeping table
#[derive(Clone, PartialEq, Debug)]
pub struct HkRow {
    pub timestamp: u32,
    /// Channel of the most recent sample written into this row
    pub hk_id: u8,
    /// Calibrated value per channel, `None` until the channel is first seen
    pub values: [Option<f64>; HK_CHANNELS],
    pub delta_event_count: u16,
    pub delta_drop_event_count: u16,
    pub delta_lost_event_count: u16,
}

impl HkRow {
    fn new(timestamp: u32) -> Self {
        HkRow {
            timestamp,
            hk_id: 0,
            values: [None; HK_CHANNELS],
            delta_event_count: 0,
            delta_drop_event_count: 0,
            delta_lost_event_count: 0,
        }
    }

    pub fn get(&self, id: HkId) -> Option<f64> {
        self.values[id as usize]
    }
}

impl Timestamped for HkRow {
    fn timestamp(&self) -> u32 {
        self.timestamp
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct HkTable {
    pub rows: Vec<HkRow>,
}

impl HkTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one channel, row by row
    pub fn column(&self, id: HkId) -> impl Iterator<Item = Option<f64>> + '_ {
        self.rows.iter().map(move |r| r.get(id))
    }

    /// Sort rows by timestamp and keep the first row of each timestamp.
    /// Forward-filled values are left as assembled, in arrival order.
    pub fn sort_dedup(&mut self) {
        self.rows.sort_by_key(|r| r.timestamp);
        self.rows.dedup_by_key(|r| r.timestamp);
    }
}

/// Incremental builder for an [`HkTable`]
#[derive(Clone, Debug)]
pub struct Assembler {
    unit: HardwareUnit,
    volts_per_count: f64,
    rows: Vec<HkRow>,
    index: HashMap<u32, usize>,
}

impl Assembler {
    pub fn new(unit: HardwareUnit, volts_per_count: f64) -> Self {
        Assembler {
            unit,
            volts_per_count,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Calibrate one sample and write it into the row for its timestamp.
    /// A sample that fails calibration leaves the table untouched.
    pub fn push(&mut self, sample: &HousekeepingSample) -> Result<(), CalibrationError> {
        let id = HkId::try_from(sample.hk_id)?;
        let value = id.calibrate(sample.hk_value_raw, self.volts_per_count, self.unit);

        let rows = &mut self.rows;
        let i = *self.index.entry(sample.timestamp).or_insert_with(|| {
            rows.push(HkRow::new(sample.timestamp));
            rows.len() - 1
        });
        let row = &mut self.rows[i];
        row.hk_id = sample.hk_id;
        row.values[id as usize] = Some(value);
        row.delta_event_count = sample.delta_event_count;
        row.delta_drop_event_count = sample.delta_drop_event_count;
        row.delta_lost_event_count = sample.delta_lost_event_count;
        Ok(())
    }

    /// Forward-fill every column and hand over the table
    pub fn finish(self) -> HkTable {
        let mut rows = self.rows;
        let mut last: [Option<f64>; HK_CHANNELS] = [None; HK_CHANNELS];
        for row in rows.iter_mut() {
            for (cell, known) in row.values.iter_mut().zip(last.iter_mut()) {
                if cell.is_some() {
                    *known = *cell;
                } else {
                    *cell = *known;
                }
            }
        }
        HkTable { rows }
    }
}

/// Build the housekeeping table for a batch of samples in arrival order.
/// Samples that cannot be calibrated are logged and skipped.
pub fn assemble(
    samples: &[HousekeepingSample],
    unit: HardwareUnit,
    volts_per_count: f64,
) -> HkTable {
    let mut asm = Assembler::new(unit, volts_per_count);
    for s in samples {
        if let Err(e) = asm.push(s) {
            warn!("dropping housekeeping sample at {} ms: {}", s.timestamp, e);
        }
    }
    asm.finish()
}

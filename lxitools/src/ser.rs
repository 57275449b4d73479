//! Export of decoded tables as delimited text
//!
//! Column names and number formatting follow the tables the instrument team
//! already works with, so the files drop into existing analysis scripts.
//! Floats are written with the shortest digits that read back exactly and
//! always carry a fractional part (`2.0`, `0.5`); voltages are first rounded
//! to the configured number of decimals. NaN is left empty.

use anyhow::{bail, Result};
use std::io::Write;

use crate::batch::Positions;
use crate::cal::HkId;
use crate::sci::ScienceSample;
use crate::series::HkTable;
use crate::Timestamped;

pub const SCI_HEADER: [&str; 6] = [
    "TimeStamp",
    "IsCommanded",
    "Channel1",
    "Channel2",
    "Channel3",
    "Channel4",
];

pub const POS_HEADER: [&str; 7] = [
    "TimeStamp",
    "x_val",
    "v1_shift",
    "v3_shift",
    "y_val",
    "v4_shift",
    "v2_shift",
];

fn float(v: f64) -> String {
    if v.is_nan() {
        return String::new();
    }
    if v.is_infinite() {
        return String::from(if v > 0.0 { "inf" } else { "-inf" });
    }
    let s = v.to_string();
    if s.contains('.') { s } else { s + ".0" }
}

fn rounded(v: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    float((v * scale).round() / scale)
}

fn boolean(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Header of the housekeeping table: time, id, one column per channel,
/// then the delta counters
pub fn hk_header() -> Vec<&'static str> {
    let mut h = vec!["TimeStamp", "HK_id"];
    h.extend(HkId::ALL.iter().map(|id| id.name()));
    h.extend(["DeltaEvntCount", "DeltaDroppedCount", "DeltaLostEvntCount"]);
    h
}

/// Write science events, time in seconds and voltages rounded to `decimals`
pub fn sci_csv(
    wtr: &mut csv::Writer<impl Write>,
    samples: &[ScienceSample],
    decimals: usize,
) -> Result<()> {
    wtr.write_record(&SCI_HEADER)?;
    for s in samples {
        let mut record = vec![float(s.seconds()), boolean(s.is_commanded).to_string()];
        record.extend(s.channels().iter().map(|&v| rounded(v, decimals)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the housekeeping table. Channels not yet seen are left empty.
pub fn hk_csv(
    wtr: &mut csv::Writer<impl Write>,
    table: &HkTable,
    decimals: usize,
) -> Result<()> {
    wtr.write_record(hk_header())?;
    for row in table.rows.iter() {
        let mut record = vec![float(row.seconds()), row.hk_id.to_string()];
        record.extend(
            row.values
                .iter()
                .map(|v| v.map_or_else(String::new, |v| rounded(v, decimals))),
        );
        record.extend([
            row.delta_event_count.to_string(),
            row.delta_drop_event_count.to_string(),
            row.delta_lost_event_count.to_string(),
        ]);
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write per-event positions next to the event time
pub fn positions_csv(
    wtr: &mut csv::Writer<impl Write>,
    samples: &[ScienceSample],
    positions: &Positions,
) -> Result<()> {
    if positions.x.len() != samples.len() || positions.y.len() != samples.len() {
        bail!(
            "{} events but {} x and {} y positions",
            samples.len(),
            positions.x.len(),
            positions.y.len(),
        );
    }
    wtr.write_record(&POS_HEADER)?;
    for ((s, x), y) in samples.iter().zip(&positions.x).zip(&positions.y) {
        wtr.write_record(&[
            float(s.seconds()),
            float(x.ratio),
            float(x.shifted_v1),
            float(x.shifted_v2),
            float(y.ratio),
            float(y.shifted_v1),
            float(y.shifted_v2),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

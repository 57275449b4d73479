//! Reading of raw logger files and previously exported science tables

use anyhow::{anyhow, bail, Context, Result};
use std::io::{BufReader, Read};
use std::vec::Vec;
use zstd::stream;

use crate::bit::TIMESTAMP_MASK;
use crate::sci::ScienceSample;

/// Read a raw logger file into memory. Archived logs are kept
/// zstd-compressed; set `compressed` to decompress on the fly.
pub fn raw(rdr: impl Read, compressed: bool) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if compressed {
        let mut zrdr = stream::read::Decoder::new(rdr)?;
        zrdr.read_to_end(&mut buf)?;
    } else {
        let mut brdr = BufReader::new(rdr);
        brdr.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

/// Logger time in ms from seconds, which must fit the 30-bit timestamp
fn logger_ms(seconds: f64) -> Result<u32> {
    let ms = (seconds * 1e3).round();
    if !(ms >= 0.0 && ms <= TIMESTAMP_MASK as f64) {
        bail!("time {} s is outside the logger clock range", seconds);
    }
    Ok(ms as u32)
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim() {
        "True" | "true" | "1" => Ok(true),
        "False" | "false" | "0" => Ok(false),
        other => bail!("cannot parse '{}' as a boolean", other),
    }
}

/// Deserialize science events from a table with a header row.
///
/// Columns are found by name, so extra columns (an index, derived
/// positions) are ignored. The time column is the first whose name contains
/// "time", in seconds; rows with a time the logger clock cannot hold are
/// rejected.
pub fn sci_csv(rdr: &mut csv::Reader<impl Read>) -> Result<Vec<ScienceSample>> {
    let headers = rdr.headers()?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("missing column {}", name))
    };
    let time = headers
        .iter()
        .position(|h| h.to_lowercase().contains("time"))
        .ok_or_else(|| anyhow!("no time column"))?;
    let commanded = find("IsCommanded")?;
    let chans = [
        find("Channel1")?,
        find("Channel2")?,
        find("Channel3")?,
        find("Channel4")?,
    ];

    let mut samples = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let seconds = record[time].trim().parse::<f64>()?;
        let timestamp = logger_ms(seconds)
            .with_context(|| format!("row {}", row + 1))?;
        let mut v = [0f64; 4];
        for (v, &c) in v.iter_mut().zip(chans.iter()) {
            *v = record[c].trim().parse::<f64>()?;
        }
        samples.push(ScienceSample {
            is_commanded: parse_bool(&record[commanded])?,
            timestamp,
            channel1: v[0],
            channel2: v[1],
            channel3: v[2],
            channel4: v[3],
        });
    }
    Ok(samples)
}

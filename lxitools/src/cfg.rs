//! Configuration of a decoding run
//!
//! A run is declared in a JSON file. Every field is optional; specify only
//! what differs from the defaults. For example
//!
//! ```json
//! {
//!     "name": "unit 2 thermal vac",
//!     "unit": "Unit2",
//!     "histogram": { "bins": 201 },
//!     "t_start": 1200.0
//! }
//! ```
//!
//! When `unit` is absent the tools infer it from the input file name.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

use crate::cal::HardwareUnit;
use crate::pos::HistConfig;
use crate::VOLTS_PER_COUNT;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct DecodeConfig {
    pub name:            String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit:            Option<HardwareUnit>,
    pub volts_per_count: f64,
    pub histogram:       HistConfig,
    /// Decimal places kept for voltages in exported tables
    pub decimals:        usize,
    /// Start of the time window, in seconds of logger time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_start:         Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_end:           Option<f64>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            name:            String::new(),
            unit:            None,
            volts_per_count: VOLTS_PER_COUNT,
            histogram:       HistConfig::default(),
            decimals:        6,
            t_start:         None,
            t_end:           None,
        }
    }
}

impl DecodeConfig {
    /// Read and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("cannot open config {}", path.display()))?;
        let config: DecodeConfig = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("cannot parse config {}", path.display()))?;
        config.histogram.validate()?;
        Ok(config)
    }

    /// Unit to calibrate with: the configured one, else the one named in
    /// `file_name`, else unit 1
    pub fn resolve_unit(&self, file_name: Option<&str>) -> HardwareUnit {
        if let Some(unit) = self.unit {
            return unit;
        }
        match file_name.and_then(unit_from_file_name) {
            Some(unit) => unit,
            None => {
                warn!(
                    "no unit configured or named in {:?}, defaulting to unit 1",
                    file_name.unwrap_or("input"),
                );
                HardwareUnit::Unit1
            }
        }
    }
}

/// Hardware unit named in a logger file name (`unit_1`, `unit1`, `unit_2`
/// or `unit2`), if any
pub fn unit_from_file_name(name: &str) -> Option<HardwareUnit> {
    let name = name.to_lowercase();
    if name.contains("unit_1") || name.contains("unit1") {
        Some(HardwareUnit::Unit1)
    } else if name.contains("unit_2") || name.contains("unit2") {
        Some(HardwareUnit::Unit2)
    } else {
        None
    }
}

//! Whole-buffer decoding: scan, decode, assemble, reconstruct

use itertools::{Itertools, MinMaxResult};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cal::HardwareUnit;
use crate::cfg::DecodeConfig;
use crate::frame;
use crate::hk::HousekeepingSample;
use crate::pos::{self, HistConfig, PositionError, PositionSample};
use crate::sci::ScienceSample;
use crate::series::{self, HkTable};
use crate::{Timestamped, VOLTS_PER_COUNT};

/// Decoded samples of one buffer, in scan order
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Batch {
    /// Every frame read through the science decoder
    pub science: Vec<ScienceSample>,
    /// Frames whose type bit marks them as housekeeping
    pub housekeeping: Vec<HousekeepingSample>,
}

impl Batch {
    pub fn decode(buf: &[u8]) -> Self {
        Self::decode_with(buf, VOLTS_PER_COUNT)
    }

    /// Scan `buf` and decode all frames in parallel, keeping scan order
    pub fn decode_with(buf: &[u8], volts_per_count: f64) -> Self {
        let frames = frame::scan(buf);
        let decoded: Vec<(ScienceSample, Option<HousekeepingSample>)> = frames
            .par_iter()
            .map(|f| {
                (
                    ScienceSample::from_frame_with(f, volts_per_count),
                    HousekeepingSample::from_frame(f),
                )
            })
            .collect();

        let mut batch = Batch {
            science: Vec::with_capacity(decoded.len()),
            housekeeping: Vec::new(),
        };
        for (s, h) in decoded {
            batch.science.push(s);
            batch.housekeeping.extend(h);
        }
        info!(
            "decoded {} frames, {} housekeeping",
            batch.science.len(),
            batch.housekeeping.len(),
        );
        batch
    }

    /// Assemble the housekeeping table of this batch
    pub fn hk_table(&self, unit: HardwareUnit, volts_per_count: f64) -> HkTable {
        series::assemble(&self.housekeeping, unit, volts_per_count)
    }
}

/// Positions along both detector axes, one entry per science event
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Positions {
    /// From channels 1 and 3: shifted_v1 is channel 1, shifted_v2 channel 3
    pub x: Vec<PositionSample>,
    /// From channels 4 and 2: shifted_v1 is channel 4, shifted_v2 channel 2
    pub y: Vec<PositionSample>,
}

pub fn positions(
    science: &[ScienceSample],
    config: &HistConfig,
) -> Result<Positions, PositionError> {
    let (v1, v2, v3, v4) = (
        channel(science, |s| s.channel1),
        channel(science, |s| s.channel2),
        channel(science, |s| s.channel3),
        channel(science, |s| s.channel4),
    );
    Ok(Positions {
        x: pos::reconstruct(&v1, &v3, config)?,
        y: pos::reconstruct(&v4, &v2, config)?,
    })
}

fn channel(science: &[ScienceSample], f: fn(&ScienceSample) -> f64) -> Vec<f64> {
    science.iter().map(f).collect()
}

/// Sort by timestamp and keep items whose time in seconds lies within
/// `[t_start, t_end]`; a missing bound is open.
pub fn time_slice<T>(items: &[T], t_start: Option<f64>, t_end: Option<f64>) -> Vec<T>
where
    T: Timestamped + Clone,
{
    let mut v: Vec<T> = items
        .iter()
        .filter(|i| {
            let t = i.seconds();
            t_start.map_or(true, |s| t >= s) && t_end.map_or(true, |e| t <= e)
        })
        .cloned()
        .collect();
    v.sort_by_key(|i| i.timestamp());
    v
}

/// First and last timestamp of `items`, in ms
pub fn time_span<T: Timestamped>(items: &[T]) -> Option<(u32, u32)> {
    match items.iter().map(|i| i.timestamp()).minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(t) => Some((t, t)),
        MinMaxResult::MinMax(a, b) => Some((a, b)),
    }
}

/// Everything derived from one logger buffer
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Products {
    pub science: Vec<ScienceSample>,
    pub housekeeping: HkTable,
    /// Positions of the events in `science`
    pub positions: Positions,
    /// Positions over the whole buffer, when a time window is configured
    pub full_positions: Option<Positions>,
}

impl Products {
    /// Whether the science events and housekeeping rows start and end at
    /// the same time. Tables that are empty are taken to agree.
    pub fn spans_agree(&self) -> bool {
        match (time_span(&self.science), time_span(&self.housekeeping.rows)) {
            (Some(s), Some(h)) => s == h,
            _ => true,
        }
    }
}

fn warn_on_span_mismatch(products: &Products) {
    let sci = time_span(&products.science);
    let hk = time_span(&products.housekeeping.rows);
    if let (Some((s0, s1)), Some((h0, h1))) = (sci, hk) {
        if s0 != h0 {
            warn!("housekeeping starts at {} ms but science at {} ms", h0, s0);
        }
        if s1 != h1 {
            warn!("housekeeping ends at {} ms but science at {} ms", h1, s1);
        }
    }
}

/// Decode a buffer and derive the housekeeping table and positions.
/// Science events and housekeeping rows are sorted by time and limited to
/// the configured time window; positions are computed over that window, and
/// also over the whole buffer when a window is set.
pub fn process(
    buf: &[u8],
    config: &DecodeConfig,
    unit: HardwareUnit,
) -> Result<Products, PositionError> {
    let batch = Batch::decode_with(buf, config.volts_per_count);

    let science = time_slice(&batch.science, config.t_start, config.t_end);
    let mut housekeeping = batch.hk_table(unit, config.volts_per_count);
    housekeeping.sort_dedup();
    housekeeping.rows = time_slice(&housekeeping.rows, config.t_start, config.t_end);

    let positions = positions(&science, &config.histogram)?;
    let full_positions = if config.t_start.is_some() || config.t_end.is_some() {
        let all = time_slice(&batch.science, None, None);
        Some(self::positions(&all, &config.histogram)?)
    } else {
        None
    };

    let products = Products { science, housekeeping, positions, full_positions };
    warn_on_span_mismatch(&products);
    Ok(products)
}

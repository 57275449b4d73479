//! Hit position reconstruction from pairs of science channel voltages
//!
//! Each channel sits on a baseline (pedestal) voltage. The baseline is taken
//! at the most populated histogram bucket in the lower half of the voltage
//! range, by default its left edge. Subtracting it gives the shifted
//! voltage, and the hit position along one axis is `s2 / (s1 + s2)`.
//!
//! Older processed tables took the offset from a grid of `bins` points
//! spaced `(max - min) / (bins - 1)` instead of the bucket edges. Over the
//! lower half of the range the two differ by at most `(max - min) /
//! (2 * (bins - 1))`, 5 mV with the default histogram. Set
//! [`HistConfig::offsets`] to [`OffsetGrid::Grid`] to reproduce those tables.

use itertools::izip;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Copy, PartialEq, Debug, thiserror::Error)]
pub enum PositionError {
    #[error("channel lengths differ: {0} and {1}")]
    LengthMismatch(usize, usize),
    #[error("histogram needs at least 2 bins, got {0}")]
    InvalidBins(usize),
    #[error("histogram range [{0}, {1}] is empty or not finite")]
    InvalidRange(f64, f64),
}

/// Where the baseline offset of bucket `i` is read from
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum OffsetGrid {
    /// Left edge of the bucket
    LeftEdge,
    /// `min + i * (max - min) / (bins - 1)`
    Grid,
}

impl Default for OffsetGrid {
    fn default() -> Self {
        OffsetGrid::LeftEdge
    }
}

/// Equal-width histogram over `[min, max]`
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(default)]
pub struct HistConfig {
    pub bins: usize,
    pub min: f64,
    pub max: f64,
    pub offsets: OffsetGrid,
}

impl Default for HistConfig {
    fn default() -> Self {
        HistConfig { bins: 401, min: 0.0, max: 4.0, offsets: OffsetGrid::LeftEdge }
    }
}

impl HistConfig {
    pub fn validate(&self) -> Result<(), PositionError> {
        if self.bins < 2 {
            return Err(PositionError::InvalidBins(self.bins));
        }
        if !(self.min.is_finite() && self.max.is_finite() && self.min < self.max) {
            return Err(PositionError::InvalidRange(self.min, self.max));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    pub fn left_edge(&self, i: usize) -> f64 {
        self.min + (self.max - self.min) * i as f64 / self.bins as f64
    }

    /// Baseline offset for bucket `i`
    pub fn offset(&self, i: usize) -> f64 {
        match self.offsets {
            OffsetGrid::LeftEdge => self.left_edge(i),
            OffsetGrid::Grid => {
                self.min + (self.max - self.min) / (self.bins - 1) as f64 * i as f64
            }
        }
    }

    /// Bucket of `v`, consistent with [`HistConfig::left_edge`]: bucket `i`
    /// holds `left_edge(i) <= v < left_edge(i + 1)`, and the last bucket is
    /// closed on the right. Values outside the range, and NaN, have no bucket.
    pub fn bucket(&self, v: f64) -> Option<usize> {
        if !(v >= self.min && v <= self.max) {
            return None;
        }
        let scaled = (v - self.min) / (self.max - self.min) * self.bins as f64;
        let mut i = (scaled as usize).min(self.bins - 1);
        // The scaled index can land one off next to an edge
        if i > 0 && v < self.left_edge(i) {
            i -= 1;
        } else if i + 1 < self.bins && v >= self.left_edge(i + 1) {
            i += 1;
        }
        Some(i)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Histogram {
    config: HistConfig,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(config: &HistConfig, data: &[f64]) -> Result<Self, PositionError> {
        config.validate()?;
        let mut counts = vec![0u64; config.bins];
        for &v in data {
            if let Some(i) = config.bucket(v) {
                counts[i] += 1;
            }
        }
        Ok(Histogram { config: *config, counts })
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Index of the fullest bucket among the first `bins / 2`; ties go to
    /// the lowest index.
    pub fn baseline_index(&self) -> usize {
        let half = &self.counts[..self.config.bins / 2];
        let mut best = 0;
        for (i, &c) in half.iter().enumerate() {
            if c > half[best] {
                best = i;
            }
        }
        best
    }

    /// Baseline offset voltage of the baseline bucket
    pub fn baseline(&self) -> f64 {
        self.config.offset(self.baseline_index())
    }
}

/// Position along one axis for a single event
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PositionSample {
    pub ratio: f64,
    pub shifted_v1: f64,
    pub shifted_v2: f64,
}

impl PositionSample {
    /// The shifted voltages summed to zero so the ratio is NaN or infinite
    pub fn is_degenerate(&self) -> bool {
        !self.ratio.is_finite()
    }
}

/// Baseline-correct two channels and compute the position ratio per event.
///
/// Channel order matters: pass (ch1, ch3) for x and (ch4, ch2) for y.
/// Degenerate events are returned as-is with a NaN or infinite ratio.
pub fn reconstruct(
    v1: &[f64],
    v2: &[f64],
    config: &HistConfig,
) -> Result<Vec<PositionSample>, PositionError> {
    if v1.len() != v2.len() {
        return Err(PositionError::LengthMismatch(v1.len(), v2.len()));
    }
    let z1 = Histogram::new(config, v1)?.baseline();
    let z2 = Histogram::new(config, v2)?.baseline();

    let out: Vec<PositionSample> = izip!(v1, v2)
        .map(|(&a, &b)| {
            let shifted_v1 = a - z1;
            let shifted_v2 = b - z2;
            PositionSample {
                ratio: shifted_v2 / (shifted_v1 + shifted_v2),
                shifted_v1,
                shifted_v2,
            }
        })
        .collect();

    let degenerate = out.iter().filter(|p| p.is_degenerate()).count();
    if degenerate > 0 {
        warn!(
            "{} of {} events have zero summed shifted voltage (offsets {} V, {} V)",
            degenerate,
            out.len(),
            z1,
            z2,
        );
    }
    Ok(out)
}

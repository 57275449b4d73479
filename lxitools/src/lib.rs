pub mod batch;
pub mod bit;
pub mod cal;
pub mod cfg;
pub mod de;
pub mod frame;
pub mod hk;
pub mod pos;
pub mod sci;
pub mod ser;
pub mod series;

pub use cal::{CalibrationError, HardwareUnit, HkId};
pub use frame::RawFrame;
pub use hk::HousekeepingSample;
pub use pos::{HistConfig, OffsetGrid, PositionError, PositionSample};
pub use sci::ScienceSample;

/// Volts per increment of digitization: digitizer full scale over 2^16 counts
pub const VOLTS_PER_COUNT: f64 = 0.000068817;

/// Anything carrying a logger timestamp in milliseconds
pub trait Timestamped {
    fn timestamp(&self) -> u32;

    /// Timestamp in seconds, the unit used in exported tables
    fn seconds(&self) -> f64 {
        self.timestamp() as f64 / 1e3
    }
}

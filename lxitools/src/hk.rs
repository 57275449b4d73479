//! Housekeeping frames: a value multiplexed by id plus event delta counters

use crate::bit::{BitOps, HK_TYPE_BIT, TIMESTAMP_MASK};
use crate::cal::{self, CalibrationError, HardwareUnit, HkId};
use crate::frame::{RawFrame, SYNC};
use crate::Timestamped;

/// One housekeeping reading as decoded from a frame
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct HousekeepingSample {
    /// Logger time in ms (30 bits)
    pub timestamp: u32,
    /// Which quantity `hk_value_raw` holds, `0..16`
    pub hk_id: u8,
    pub hk_value_raw: u16,
    pub delta_event_count: u16,
    pub delta_drop_event_count: u16,
    pub delta_lost_event_count: u16,
}

/// Ids whose 12-bit value is a count and is not scaled up to 16 bits
#[inline]
fn is_unshifted(hk_id: u8) -> bool {
    hk_id == HkId::CmdCount as u8 || hk_id == HkId::PinPullerArmed as u8
}

impl HousekeepingSample {
    /// Decode a housekeeping frame, or `None` if the type bit says the frame
    /// carries science data.
    pub fn from_frame(frame: &RawFrame) -> Option<Self> {
        let w = frame.word1();
        if !w.check(HK_TYPE_BIT) {
            return None;
        }
        let [p0, p1, p2, p3] = frame.payloads();
        let hk_id = p0.field(12, 4) as u8;
        let value = p0.field(0, 12);
        let hk_value_raw = if is_unshifted(hk_id) { value } else { value << 4 };
        Some(HousekeepingSample {
            timestamp: w & TIMESTAMP_MASK,
            hk_id,
            hk_value_raw,
            delta_event_count: p1,
            delta_drop_event_count: p2,
            delta_lost_event_count: p3,
        })
    }

    /// Encode back into a frame. Bits of `hk_value_raw` that the frame cannot
    /// carry (the low nibble for shifted ids, anything above 12 bits) are
    /// dropped.
    pub fn to_frame(&self) -> RawFrame {
        let mut w = self.timestamp & TIMESTAMP_MASK;
        w.set(HK_TYPE_BIT);
        let value = if is_unshifted(self.hk_id) {
            self.hk_value_raw & 0x0fff
        } else {
            self.hk_value_raw >> 4
        };
        let p0 = ((self.hk_id as u16 & 0xf) << 12) | value;
        RawFrame::from_words(
            u32::from_be_bytes(SYNC),
            w,
            [
                p0,
                self.delta_event_count,
                self.delta_drop_event_count,
                self.delta_lost_event_count,
            ],
        )
    }

    /// Calibrated physical value of this reading
    pub fn calibrate(
        &self,
        volts_per_count: f64,
        unit: HardwareUnit,
    ) -> Result<f64, CalibrationError> {
        cal::calibrate(self.hk_id, self.hk_value_raw, volts_per_count, unit)
    }
}

impl Timestamped for HousekeepingSample {
    fn timestamp(&self) -> u32 {
        self.timestamp
    }
}

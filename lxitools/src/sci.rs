//! Science event frames: timestamp, commanded flag and four channel voltages

use crate::bit::{BitOps, COMMANDED_BIT, TIMESTAMP_MASK};
use crate::frame::{RawFrame, SYNC};
use crate::{Timestamped, VOLTS_PER_COUNT};

/// One science event as decoded from a frame
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct ScienceSample {
    /// Event was commanded rather than detected
    pub is_commanded: bool,
    /// Logger time in ms (30 bits)
    pub timestamp: u32,
    pub channel1: f64,
    pub channel2: f64,
    pub channel3: f64,
    pub channel4: f64,
}

impl ScienceSample {
    /// Decode with the instrument's volts-per-count constant.
    ///
    /// The first word is not read, so every frame decodes, including
    /// housekeeping frames.
    pub fn from_frame(frame: &RawFrame) -> Self {
        Self::from_frame_with(frame, VOLTS_PER_COUNT)
    }

    pub fn from_frame_with(frame: &RawFrame, volts_per_count: f64) -> Self {
        let w = frame.word1();
        let [c1, c2, c3, c4] = frame.payloads();
        ScienceSample {
            is_commanded: w.check(COMMANDED_BIT),
            timestamp: w & TIMESTAMP_MASK,
            channel1: c1 as f64 * volts_per_count,
            channel2: c2 as f64 * volts_per_count,
            channel3: c3 as f64 * volts_per_count,
            channel4: c4 as f64 * volts_per_count,
        }
    }

    /// Encode back into a frame, quantizing voltages to the nearest count
    pub fn to_frame(&self) -> RawFrame {
        self.to_frame_with(VOLTS_PER_COUNT)
    }

    pub fn to_frame_with(&self, volts_per_count: f64) -> RawFrame {
        let mut w = self.timestamp & TIMESTAMP_MASK;
        w.change(COMMANDED_BIT, self.is_commanded);
        let counts = self
            .channels()
            .map(|v| (v / volts_per_count).round().clamp(0.0, u16::MAX as f64) as u16);
        RawFrame::from_words(u32::from_be_bytes(SYNC), w, counts)
    }

    pub fn channels(&self) -> [f64; 4] {
        [self.channel1, self.channel2, self.channel3, self.channel4]
    }
}

impl Timestamped for ScienceSample {
    fn timestamp(&self) -> u32 {
        self.timestamp
    }
}

impl From<&RawFrame> for ScienceSample {
    fn from(frame: &RawFrame) -> Self {
        ScienceSample::from_frame(frame)
    }
}

#![allow(dead_code)]

use lxitools::frame::RawFrame;
use lxitools::HousekeepingSample;

pub const MARKER: u32 = 0xfe6b_2840;

/// Science frame with the given raw channel counts
pub fn sci_frame(timestamp: u32, commanded: bool, counts: [u16; 4]) -> RawFrame {
    let flag = if commanded { 0x4000_0000 } else { 0 };
    RawFrame::from_words(MARKER, flag | timestamp, counts)
}

/// Housekeeping frame carrying the 12-bit `value` for channel `id`
pub fn hk_frame(timestamp: u32, id: u8, value: u16, deltas: [u16; 3]) -> RawFrame {
    let p0 = ((id as u16) << 12) | (value & 0x0fff);
    RawFrame::from_words(
        MARKER,
        0x8000_0000 | timestamp,
        [p0, deltas[0], deltas[1], deltas[2]],
    )
}

pub fn hk_sample(timestamp: u32, hk_id: u8, hk_value_raw: u16) -> HousekeepingSample {
    HousekeepingSample {
        timestamp,
        hk_id,
        hk_value_raw,
        delta_event_count: 1,
        delta_drop_event_count: 2,
        delta_lost_event_count: 3,
    }
}

/// Concatenate frames, inserting `junk` bytes before each one
pub fn stream(frames: &[RawFrame], junk: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    for f in frames {
        buf.extend_from_slice(junk);
        buf.extend_from_slice(f.as_bytes());
    }
    buf
}

pub fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

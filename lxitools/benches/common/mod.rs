#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use lxitools::frame::RawFrame;
use lxitools::{HousekeepingSample, ScienceSample};

/// Synthetic logger stream: `n` frames, one in eight housekeeping, with a
/// stray byte every so often
pub fn load_test_stream(n: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(0x4c5849);
    let mut buf = Vec::with_capacity(n * 17);
    for i in 0..n {
        let f: RawFrame = if i % 8 == 0 {
            HousekeepingSample {
                timestamp: i as u32,
                hk_id: (i / 8 % 16) as u8,
                hk_value_raw: rng.gen::<u16>() & 0xfff0,
                ..Default::default()
            }
            .to_frame()
        } else {
            science_sample(&mut rng, i as u32).to_frame()
        };
        if rng.gen_ratio(1, 50) {
            buf.push(0x00);
        }
        buf.extend_from_slice(f.as_bytes());
    }
    buf
}

fn science_sample(rng: &mut StdRng, timestamp: u32) -> ScienceSample {
    let pedestal = [0.4, 0.5, 0.45, 0.55];
    let mut v = [0f64; 4];
    for (v, p) in v.iter_mut().zip(pedestal.iter()) {
        // Half the events sit on the pedestal
        *v = if rng.gen_ratio(1, 2) { *p } else { p + rng.gen_range(0.0..2.0) };
    }
    ScienceSample {
        is_commanded: false,
        timestamp,
        channel1: v[0],
        channel2: v[1],
        channel3: v[2],
        channel4: v[3],
    }
}

pub fn load_test_channels(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(7);
    let s: Vec<ScienceSample> = (0..n).map(|i| science_sample(&mut rng, i as u32)).collect();
    (
        s.iter().map(|s| s.channel1).collect(),
        s.iter().map(|s| s.channel3).collect(),
    )
}

#[allow(unused_imports)]
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lxitools::pos::{self, HistConfig};

mod common;

fn reconstruct(c: &mut Criterion) {
    let (v1, v3) = common::load_test_channels(100_000);
    let cfg = HistConfig::default();

    c.bench_function("reconstruct", |b| { b.iter( || {
        pos::reconstruct(black_box(&v1), black_box(&v3), &cfg).unwrap();
    })});
}

criterion_group!(benches, reconstruct);
criterion_main!(benches);

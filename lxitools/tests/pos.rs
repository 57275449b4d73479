use lxitools::pos::{self, HistConfig, Histogram, OffsetGrid, PositionError};

mod common;
use common::assert_close;

/// A channel with a pedestal just above bucket `edge` and a sparse spread
/// of signal above it
fn channel(cfg: &HistConfig, edge: usize) -> Vec<f64> {
    let pedestal = cfg.left_edge(edge) + 0.3 * cfg.width();
    let mut v = vec![pedestal; 50];
    v.extend([1.0, 1.25, 1.5, 1.75, 2.0, 2.5].iter().map(|s| pedestal + s));
    v
}

#[test]
fn offset_channels_split_evenly() {
    let cfg = HistConfig::default();
    let v1 = channel(&cfg, 40);
    let c = 75.0 * cfg.width();
    let v2: Vec<f64> = v1.iter().map(|v| v + c).collect();

    let out = pos::reconstruct(&v1, &v2, &cfg).unwrap();
    assert_eq!(out.len(), v1.len());
    for p in out.iter() {
        assert_close(p.shifted_v1, p.shifted_v2);
        assert_close(p.ratio, 0.5);
        assert!(!p.is_degenerate());
    }
}

#[test]
fn shifts_subtract_bucket_left_edge() {
    let cfg = HistConfig::default();
    let v1 = channel(&cfg, 40);
    let v2 = channel(&cfg, 10);
    let out = pos::reconstruct(&v1, &v2, &cfg).unwrap();
    for ((p, a), b) in out.iter().zip(&v1).zip(&v2) {
        assert_eq!(p.shifted_v1, a - cfg.left_edge(40));
        assert_eq!(p.shifted_v2, b - cfg.left_edge(10));
        assert_eq!(p.ratio, p.shifted_v2 / (p.shifted_v1 + p.shifted_v2));
    }
}

#[test]
fn channel_order_matters() {
    let cfg = HistConfig::default();
    let v1 = channel(&cfg, 40);
    let v2 = channel(&cfg, 10);
    let a = pos::reconstruct(&v1, &v2, &cfg).unwrap();
    let b = pos::reconstruct(&v2, &v1, &cfg).unwrap();
    for (pa, pb) in a.iter().zip(b.iter()) {
        assert_close(pa.ratio, 1.0 - pb.ratio);
        assert_eq!(pa.shifted_v1, pb.shifted_v2);
    }
}

#[test]
fn baseline_search_ignores_upper_half() {
    let cfg = HistConfig::default();
    let mut v = vec![3.0; 100];
    v.extend(vec![0.5; 10]);
    let h = Histogram::new(&cfg, &v).unwrap();
    let i = cfg.bucket(0.5).unwrap();
    assert_eq!(h.baseline_index(), i);
    assert!(i < cfg.bins / 2);
    assert_eq!(h.baseline(), cfg.left_edge(i));
    assert_eq!(h.counts()[cfg.bucket(3.0).unwrap()], 100);
}

#[test]
fn baseline_tie_goes_low() {
    let cfg = HistConfig::default();
    let v = vec![0.6, 0.6, 0.2, 0.2];
    let h = Histogram::new(&cfg, &v).unwrap();
    assert_eq!(h.baseline_index(), cfg.bucket(0.2).unwrap());
}

#[test]
fn empty_histogram_baseline_is_range_start() {
    let cfg = HistConfig::default();
    let h = Histogram::new(&cfg, &[]).unwrap();
    assert_eq!(h.baseline_index(), 0);
    assert_eq!(h.baseline(), cfg.min);
    assert!(pos::reconstruct(&[], &[], &cfg).unwrap().is_empty());
}

#[test]
fn buckets() {
    let cfg = HistConfig { bins: 4, min: 0.0, max: 4.0, ..Default::default() };
    assert_eq!(cfg.width(), 1.0);
    assert_eq!(cfg.bucket(0.0), Some(0));
    assert_eq!(cfg.bucket(0.999), Some(0));
    assert_eq!(cfg.bucket(1.0), Some(1));
    assert_eq!(cfg.bucket(4.0), Some(3));
    assert_eq!(cfg.bucket(4.001), None);
    assert_eq!(cfg.bucket(-0.001), None);
    assert_eq!(cfg.bucket(f64::NAN), None);
    assert_eq!(cfg.left_edge(3), 3.0);
}

#[test]
fn left_edges_fall_in_their_bucket() {
    for &bins in [2usize, 4, 100, 401, 1000].iter() {
        let cfg = HistConfig { bins, ..Default::default() };
        for i in 0..bins {
            assert_eq!(cfg.bucket(cfg.left_edge(i)), Some(i), "bins {} edge {}", bins, i);
        }
        assert_eq!(cfg.bucket(cfg.max), Some(bins - 1));
    }
}

#[test]
fn events_on_the_baseline_edge_shift_to_zero() {
    let cfg = HistConfig::default();
    for edge in [7usize, 14, 28, 51, 102].iter() {
        let z = cfg.left_edge(*edge);
        let mut v = vec![z; 20];
        v.push(z + 1.0);
        let out = pos::reconstruct(&v, &v, &cfg).unwrap();
        assert_eq!(out[0].shifted_v1, 0.0);
        assert!(out.iter().all(|p| p.shifted_v1 >= 0.0));
    }
}

#[test]
fn grid_offsets() {
    let edges = HistConfig::default();
    let grid = HistConfig { offsets: OffsetGrid::Grid, ..edges };
    assert_close(grid.offset(100), 1.0);
    assert_close(edges.offset(100), 400.0 / 401.0);

    // Never more than half a grid step apart over the searched half
    let bound = (edges.max - edges.min) / (2.0 * (edges.bins - 1) as f64);
    for i in 0..edges.bins / 2 {
        assert!(grid.offset(i) - edges.offset(i) <= bound + 1e-12);
    }

    let v = channel(&edges, 100);
    let h = Histogram::new(&grid, &v).unwrap();
    assert_eq!(h.baseline_index(), 100);
    assert_close(h.baseline(), 1.0);
    let out = pos::reconstruct(&v, &v, &grid).unwrap();
    assert_close(out[0].shifted_v1, v[0] - 1.0);
}

#[test]
fn degenerate_ratios_propagate() {
    let cfg = HistConfig::default();
    // Both channels sit exactly on their baseline: 0 / 0
    let v = vec![0.0; 10];
    let out = pos::reconstruct(&v, &v, &cfg).unwrap();
    assert!(out.iter().all(|p| p.ratio.is_nan() && p.is_degenerate()));

    // Shifts cancel: x / 0
    let mut v1 = vec![0.0; 10];
    let mut v2 = vec![0.0; 10];
    v1.push(-0.5);
    v2.push(0.5);
    let out = pos::reconstruct(&v1, &v2, &cfg).unwrap();
    let last = out.last().unwrap();
    assert!(last.ratio.is_infinite());
    assert!(last.is_degenerate());
}

#[test]
fn bad_inputs() {
    let cfg = HistConfig::default();
    assert_eq!(
        pos::reconstruct(&[1.0, 2.0], &[1.0], &cfg),
        Err(PositionError::LengthMismatch(2, 1)),
    );
    let one = HistConfig { bins: 1, ..cfg };
    assert_eq!(
        pos::reconstruct(&[1.0], &[1.0], &one),
        Err(PositionError::InvalidBins(1)),
    );
    let flat = HistConfig { min: 2.0, max: 2.0, ..cfg };
    assert_eq!(
        pos::reconstruct(&[1.0], &[1.0], &flat),
        Err(PositionError::InvalidRange(2.0, 2.0)),
    );
}

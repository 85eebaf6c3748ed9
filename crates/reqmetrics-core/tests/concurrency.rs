//! Concurrent writers against a shared registry.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use reqmetrics_core::{Registry, SeriesValue};

#[test]
fn parallel_increments_are_not_lost() {
    let reg = Arc::new(Registry::new());
    let c = reg.register_counter("hits_total", "hits", &["route"]).unwrap();

    thread::scope(|s| {
        for _ in 0..10 {
            let c = c.clone();
            s.spawn(move || {
                for _ in 0..100 {
                    c.inc(&["/"]).unwrap();
                }
            });
        }
    });

    assert_eq!(c.get(&["/"]), Some(1000.0));
}

#[test]
fn gauge_inc_dec_pairs_balance() {
    let reg = Registry::new();
    let g = reg.register_gauge("in_flight", "in flight", &[]).unwrap();
    g.set(&[], 5.0).unwrap();

    thread::scope(|s| {
        for _ in 0..8 {
            let g = g.clone();
            s.spawn(move || {
                for _ in 0..250 {
                    g.inc(&[]).unwrap();
                    g.dec(&[]).unwrap();
                }
            });
        }
    });

    assert_eq!(g.get(&[]), Some(5.0));
}

#[test]
fn snapshot_never_sees_torn_histogram() {
    let reg = Registry::new();
    let h = reg
        .register_histogram("work_seconds", "work", &[], &[0.1, 0.5, 1.0])
        .unwrap();

    thread::scope(|s| {
        for w in 0..4 {
            let h = h.clone();
            s.spawn(move || {
                for i in 0..2_000 {
                    let v = ((i + w) % 15) as f64 / 10.0;
                    h.observe(&[], v).unwrap();
                }
            });
        }

        s.spawn(|| {
            for _ in 0..200 {
                let snap = reg.snapshot().unwrap();
                for (_, value) in &snap.families[0].series {
                    let SeriesValue::Histogram(hv) = value else {
                        panic!("expected histogram series");
                    };
                    assert!(hv.buckets.windows(2).all(|w| w[0] <= w[1]));
                    assert_eq!(hv.buckets.last().copied(), Some(hv.count));
                }
            }
        });
    });

    assert_eq!(h.get(&[]).unwrap().count, 8_000);
}

//! End-to-end registry -> text rendering checks.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reqmetrics_core::{exposition, Registry};

fn data_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.starts_with('#')).collect()
}

#[test]
fn labeled_counter_renders_one_line_per_series() {
    let reg = Registry::new();
    let c = reg
        .register_counter("requests_total", "Total requests", &["method", "status"])
        .unwrap();
    for _ in 0..3 {
        c.inc(&["GET", "200"]).unwrap();
    }
    c.inc(&["POST", "500"]).unwrap();

    let text = exposition::render(&reg.snapshot().unwrap()).unwrap();
    assert!(text.starts_with("# HELP requests_total Total requests\n# TYPE requests_total counter\n"));
    assert_eq!(
        data_lines(&text),
        vec![
            r#"requests_total{method="GET",status="200"} 3"#,
            r#"requests_total{method="POST",status="500"} 1"#,
        ]
    );
}

#[test]
fn histogram_expands_to_bucket_sum_count() {
    let reg = Registry::new();
    let h = reg
        .register_histogram("latency_seconds", "Latency", &["route"], &[0.1, 0.5, 1.0])
        .unwrap();
    for v in [0.05, 0.3, 0.3, 2.0] {
        h.observe(&["/users"], v).unwrap();
    }

    let text = exposition::render(&reg.snapshot().unwrap()).unwrap();
    let lines = data_lines(&text);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], r#"latency_seconds_bucket{route="/users",le="0.1"} 1"#);
    assert_eq!(lines[1], r#"latency_seconds_bucket{route="/users",le="0.5"} 3"#);
    assert_eq!(lines[2], r#"latency_seconds_bucket{route="/users",le="1"} 3"#);
    assert_eq!(lines[3], r#"latency_seconds_bucket{route="/users",le="+Inf"} 4"#);
    assert_eq!(lines[5], r#"latency_seconds_count{route="/users"} 4"#);

    let sum: f64 = lines[4]
        .strip_prefix(r#"latency_seconds_sum{route="/users"} "#)
        .expect("sum line")
        .parse()
        .unwrap();
    assert!((sum - 2.65).abs() < 1e-9);
}

#[test]
fn label_values_are_escaped() {
    let reg = Registry::new();
    let c = reg.register_counter("events_total", "Events", &["event_type"]).unwrap();
    c.inc(&[r#"say "hi"\now"#]).unwrap();

    let text = exposition::render(&reg.snapshot().unwrap()).unwrap();
    assert_eq!(data_lines(&text), vec![r#"events_total{event_type="say \"hi\"\\now"} 1"#]);
}

#[test]
fn rendering_same_snapshot_is_identical() {
    let reg = Registry::new();
    let c = reg.register_counter("a_total", "a", &["k"]).unwrap();
    let h = reg.register_histogram("b_seconds", "b", &["k"], &[0.5, 1.0]).unwrap();
    for k in ["z", "m", "a", "q"] {
        c.inc(&[k]).unwrap();
        h.observe(&[k], 0.7).unwrap();
    }

    let snap = reg.snapshot().unwrap();
    let first = exposition::render(&snap).unwrap();
    let second = exposition::render(&snap).unwrap();
    assert_eq!(first, second);

    // an unchanged registry renders the same way too
    let again = exposition::render(&reg.snapshot().unwrap()).unwrap();
    assert_eq!(first, again);
}

#[test]
fn families_keep_registration_order() {
    let reg = Registry::new();
    let z = reg.register_gauge("zeta", "z", &[]).unwrap();
    let a = reg.register_gauge("alpha", "a", &[]).unwrap();
    z.set(&[], 1.0).unwrap();
    a.set(&[], 2.0).unwrap();

    let text = exposition::render(&reg.snapshot().unwrap()).unwrap();
    let zeta = text.find("# TYPE zeta").unwrap();
    let alpha = text.find("# TYPE alpha").unwrap();
    assert!(zeta < alpha);
}

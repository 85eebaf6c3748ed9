use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::store::{HistogramValue, SeriesStore, SeriesValue, Update};

/// Bucketed histogram with bounds fixed at registration.
#[derive(Clone)]
pub struct Histogram {
    store: Arc<SeriesStore>,
}

impl Histogram {
    pub(crate) fn new(store: Arc<SeriesStore>) -> Self {
        Self { store }
    }

    /// Record one observation. NaN and infinities are rejected.
    pub fn observe(&self, labels: &[&str], value: f64) -> Result<()> {
        self.store.update(labels, Update::Observe(value))
    }

    /// Record a duration in seconds.
    pub fn observe_duration(&self, labels: &[&str], elapsed: Duration) -> Result<()> {
        self.observe(labels, elapsed.as_secs_f64())
    }

    pub fn get(&self, labels: &[&str]) -> Option<HistogramValue> {
        match self.store.get(labels)? {
            SeriesValue::Histogram(h) => Some(h),
            _ => None,
        }
    }

    pub fn buckets(&self) -> &[f64] {
        &self.store.descriptor().buckets
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use crate::Registry;

    #[test]
    fn bucket_counts_match_observations() {
        let reg = Registry::new();
        let bounds = [0.1, 0.5, 1.0, 2.0, 5.0];
        let h = reg
            .register_histogram("latency_seconds", "latency", &[], &bounds)
            .unwrap();

        let values = [0.01, 0.1, 0.2, 0.7, 1.5, 3.0, 9.0, 0.5];
        for v in values {
            h.observe(&[], v).unwrap();
        }

        let got = h.get(&[]).unwrap();
        for (i, b) in bounds.iter().enumerate() {
            let expected = values.iter().filter(|v| **v <= *b).count() as u64;
            assert_eq!(got.buckets[i], expected, "bucket le={b}");
        }
        assert_eq!(got.buckets.last().copied(), Some(values.len() as u64));
        assert_eq!(got.count, values.len() as u64);
        assert!((got.sum - values.iter().sum::<f64>()).abs() < 1e-9);
    }

    #[test]
    fn duration_recorded_in_seconds() {
        let reg = Registry::new();
        let h = reg
            .register_histogram("d_seconds", "d", &["op"], &[0.1, 1.0])
            .unwrap();
        h.observe_duration(&["read"], Duration::from_millis(250)).unwrap();
        let got = h.get(&["read"]).unwrap();
        assert_eq!(got.buckets, vec![0, 1, 1]);
        assert!((got.sum - 0.25).abs() < 1e-12);
    }
}

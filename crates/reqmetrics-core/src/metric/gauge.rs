use std::sync::Arc;

use crate::error::Result;
use crate::store::{SeriesStore, SeriesValue, Update};

/// Gauge: a value that can go up and down.
#[derive(Clone)]
pub struct Gauge {
    store: Arc<SeriesStore>,
}

impl Gauge {
    pub(crate) fn new(store: Arc<SeriesStore>) -> Self {
        Self { store }
    }

    pub fn set(&self, labels: &[&str], value: f64) -> Result<()> {
        self.store.update(labels, Update::Set(value))
    }

    pub fn inc(&self, labels: &[&str]) -> Result<()> {
        self.add(labels, 1.0)
    }

    pub fn dec(&self, labels: &[&str]) -> Result<()> {
        self.add(labels, -1.0)
    }

    /// Relative adjustment (read-modify-write under the series lock).
    pub fn add(&self, labels: &[&str], delta: f64) -> Result<()> {
        self.store.update(labels, Update::Adjust(delta))
    }

    pub fn sub(&self, labels: &[&str], delta: f64) -> Result<()> {
        self.add(labels, -delta)
    }

    pub fn get(&self, labels: &[&str]) -> Option<f64> {
        match self.store.get(labels)? {
            SeriesValue::Gauge(v) => Some(v),
            _ => None,
        }
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::Registry;

    #[test]
    fn set_then_adjust() {
        let reg = Registry::new();
        let g = reg.register_gauge("queue_depth", "depth", &["queue"]).unwrap();
        g.set(&["a"], 10.0).unwrap();
        g.inc(&["a"]).unwrap();
        g.sub(&["a"], 4.0).unwrap();
        g.dec(&["a"]).unwrap();
        assert_eq!(g.get(&["a"]), Some(6.0));

        g.set(&["a"], -2.0).unwrap();
        assert_eq!(g.get(&["a"]), Some(-2.0));
    }
}

use std::sync::Arc;

use crate::error::Result;
use crate::store::{SeriesStore, SeriesValue, Update};

/// Monotonic counter.
#[derive(Clone)]
pub struct Counter {
    store: Arc<SeriesStore>,
}

impl Counter {
    pub(crate) fn new(store: Arc<SeriesStore>) -> Self {
        Self { store }
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[&str]) -> Result<()> {
        self.inc_by(labels, 1.0)
    }

    /// Increment by `delta`. Negative or non-finite deltas are rejected.
    pub fn inc_by(&self, labels: &[&str], delta: f64) -> Result<()> {
        self.store.update(labels, Update::Increment(delta))
    }

    pub fn get(&self, labels: &[&str]) -> Option<f64> {
        match self.store.get(labels)? {
            SeriesValue::Counter(v) => Some(v),
            _ => None,
        }
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }
}

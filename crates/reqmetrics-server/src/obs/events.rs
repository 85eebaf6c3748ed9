//! Business event counter for application code.

use reqmetrics_core::{Counter, Registry, Result};

use crate::config::MetricsSection;

/// Increments `business_events_total{event_type}`. Never fails the caller.
#[derive(Clone)]
pub struct BusinessEventTracker {
    counter: Counter,
}

impl BusinessEventTracker {
    pub fn register(registry: &Registry, cfg: &MetricsSection) -> Result<Self> {
        let counter = registry.register_counter(
            cfg.name("business_events_total"),
            "Total number of business events",
            &["event_type"],
        )?;
        Ok(Self { counter })
    }

    pub fn track(&self, event_type: &str) {
        if event_type.is_empty() {
            tracing::debug!("ignoring business event with empty type");
            return;
        }
        if let Err(e) = self.counter.inc(&[event_type]) {
            tracing::warn!(error = %e, event_type, "business event not recorded");
        }
    }

    pub fn count(&self, event_type: &str) -> f64 {
        self.counter.get(&[event_type]).unwrap_or(0.0)
    }
}

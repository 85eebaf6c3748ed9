//! Metric registry.
//!
//! Owns every registered family in registration order. The family list is only
//! written at registration time; series updates go straight to the
//! per-family [`SeriesStore`] through the typed handles.

use std::sync::{Arc, RwLock};

use crate::descriptor::MetricDescriptor;
use crate::error::{MetricsError, Result};
use crate::metric::{Counter, Gauge, Histogram};
use crate::store::{FamilySnapshot, SeriesStore, Update};

/// Hook run right before a snapshot is taken, used to refresh gauges whose
/// value lives outside the registry (process stats, pool sizes).
pub trait Collector: Send + Sync {
    fn collect(&self);
}

/// Point-in-time copy of all families. Each series is internally coherent;
/// there is no consistency guarantee across series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrySnapshot {
    pub families: Vec<FamilySnapshot>,
}

#[derive(Default)]
pub struct Registry {
    families: RwLock<Vec<Arc<SeriesStore>>>,
    collectors: RwLock<Vec<Arc<dyn Collector>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a descriptor. Names are unique per registry.
    pub fn register(&self, descriptor: MetricDescriptor) -> Result<Arc<SeriesStore>> {
        descriptor.validate()?;

        let mut families = self
            .families
            .write()
            .map_err(|_| MetricsError::Internal("registry lock poisoned".into()))?;

        if families.iter().any(|f| f.name() == descriptor.name) {
            return Err(MetricsError::DuplicateMetricName(descriptor.name));
        }

        tracing::debug!(
            metric = %descriptor.name,
            kind = %descriptor.kind,
            labels = ?descriptor.label_names,
            "metric registered"
        );

        let store = Arc::new(SeriesStore::new(descriptor));
        families.push(Arc::clone(&store));
        Ok(store)
    }

    pub fn register_counter(
        &self,
        name: impl Into<String>,
        help: impl Into<String>,
        labels: &[&str],
    ) -> Result<Counter> {
        let store = self.register(MetricDescriptor::counter(name, help, labels))?;
        Ok(Counter::new(store))
    }

    pub fn register_gauge(
        &self,
        name: impl Into<String>,
        help: impl Into<String>,
        labels: &[&str],
    ) -> Result<Gauge> {
        let store = self.register(MetricDescriptor::gauge(name, help, labels))?;
        Ok(Gauge::new(store))
    }

    pub fn register_histogram(
        &self,
        name: impl Into<String>,
        help: impl Into<String>,
        labels: &[&str],
        buckets: &[f64],
    ) -> Result<Histogram> {
        let store = self.register(MetricDescriptor::histogram(name, help, labels, buckets))?;
        Ok(Histogram::new(store))
    }

    pub fn register_collector(&self, collector: Arc<dyn Collector>) -> Result<()> {
        let mut collectors = self
            .collectors
            .write()
            .map_err(|_| MetricsError::Internal("collector lock poisoned".into()))?;
        collectors.push(collector);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<Arc<SeriesStore>> {
        let families = self.families.read().ok()?;
        families.iter().find(|f| f.name() == name).cloned()
    }

    /// Apply an update to a metric looked up by name.
    pub fn update(&self, name: &str, labels: &[&str], op: Update) -> Result<()> {
        let store = self
            .find(name)
            .ok_or_else(|| MetricsError::UnknownMetric(name.to_string()))?;
        store.update(labels, op)
    }

    /// Registered metric names, in registration order.
    pub fn names(&self) -> Vec<String> {
        match self.families.read() {
            Ok(families) => families.iter().map(|f| f.name().to_string()).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Run collectors, then copy every family.
    pub fn snapshot(&self) -> Result<RegistrySnapshot> {
        {
            let collectors = self
                .collectors
                .read()
                .map_err(|_| MetricsError::Internal("collector lock poisoned".into()))?;
            for c in collectors.iter() {
                c.collect();
            }
        }

        let families = self
            .families
            .read()
            .map_err(|_| MetricsError::Internal("registry lock poisoned".into()))?;

        Ok(RegistrySnapshot {
            families: families.iter().map(|f| f.snapshot()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::store::SeriesValue;

    #[test]
    fn duplicate_name_rejected() {
        let reg = Registry::new();
        reg.register_counter("requests_total", "a", &[]).unwrap();
        let err = reg.register_gauge("requests_total", "b", &[]).err().unwrap();
        assert_eq!(err, MetricsError::DuplicateMetricName("requests_total".into()));
        assert_eq!(reg.names(), vec!["requests_total".to_string()]);
    }

    #[test]
    fn invalid_descriptor_rejected() {
        let reg = Registry::new();
        let err = reg.register_counter("bad-name", "x", &[]).err().unwrap();
        assert!(matches!(err, MetricsError::InvalidDescriptor { .. }));
        assert!(reg.names().is_empty());
    }

    #[test]
    fn update_by_name() {
        let reg = Registry::new();
        reg.register_gauge("temp", "t", &["room"]).unwrap();
        reg.update("temp", &["kitchen"], Update::Set(21.5)).unwrap();
        assert_eq!(
            reg.find("temp").unwrap().get(&["kitchen"]),
            Some(SeriesValue::Gauge(21.5))
        );

        let err = reg.update("missing", &[], Update::Set(1.0)).unwrap_err();
        assert_eq!(err, MetricsError::UnknownMetric("missing".into()));
    }

    #[test]
    fn snapshot_keeps_registration_order() {
        let reg = Registry::new();
        reg.register_gauge("b_metric", "b", &[]).unwrap();
        reg.register_counter("a_metric", "a", &[]).unwrap();
        let snap = reg.snapshot().unwrap();
        let names: Vec<&str> = snap.families.iter().map(|f| f.descriptor.name.as_str()).collect();
        assert_eq!(names, vec!["b_metric", "a_metric"]);
        assert!(snap.families.iter().all(|f| f.series.is_empty()));
    }

    struct CountingCollector {
        calls: AtomicUsize,
        gauge: Gauge,
    }

    impl Collector for CountingCollector {
        fn collect(&self) {
            let n = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
            let _ = self.gauge.set(&[], n as f64);
        }
    }

    #[test]
    fn collectors_run_before_snapshot() {
        let reg = Registry::new();
        let gauge = reg.register_gauge("collected", "c", &[]).unwrap();
        reg.register_collector(Arc::new(CountingCollector {
            calls: AtomicUsize::new(0),
            gauge: gauge.clone(),
        }))
        .unwrap();

        reg.snapshot().unwrap();
        let snap = reg.snapshot().unwrap();
        assert_eq!(snap.families[0].series[0].1, SeriesValue::Gauge(2.0));
    }
}

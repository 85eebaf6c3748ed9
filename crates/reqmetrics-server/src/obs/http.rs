//! HTTP traffic metrics owned by the service.

use std::time::Duration;

use reqmetrics_core::{Counter, Gauge, Histogram, Registry, Result};

use crate::config::MetricsSection;

const REQUEST_LABELS: [&str; 3] = ["method", "route", "status"];

pub struct HttpMetrics {
    pub request_duration: Histogram,
    pub requests_total: Counter,
    pub in_flight: Gauge,
    pub db_connections_active: Gauge,
    pub db_connections_total: Gauge,
}

impl HttpMetrics {
    pub fn register(registry: &Registry, cfg: &MetricsSection) -> Result<Self> {
        Ok(Self {
            request_duration: registry.register_histogram(
                cfg.name("http_request_duration_seconds"),
                "Duration of HTTP requests in seconds",
                &REQUEST_LABELS,
                &cfg.duration_buckets,
            )?,
            requests_total: registry.register_counter(
                cfg.name("http_requests_total"),
                "Total number of HTTP requests",
                &REQUEST_LABELS,
            )?,
            in_flight: registry.register_gauge(
                cfg.name("http_requests_in_flight"),
                "Number of HTTP requests currently being served",
                &[],
            )?,
            db_connections_active: registry.register_gauge(
                cfg.name("db_connections_active"),
                "Number of active database connections",
                &[],
            )?,
            db_connections_total: registry.register_gauge(
                cfg.name("db_connections_total"),
                "Total number of database connections",
                &[],
            )?,
        })
    }

    /// Record one completed request. Duration and count share the same labels.
    pub fn record_request(
        &self,
        method: &str,
        route: &str,
        status: u16,
        elapsed: Duration,
    ) -> Result<()> {
        let status = status.to_string();
        let labels = [method, route, status.as_str()];
        self.request_duration.observe_duration(&labels, elapsed)?;
        self.requests_total.inc(&labels)?;
        Ok(())
    }

    pub fn in_flight(&self) -> f64 {
        self.in_flight.get(&[]).unwrap_or(0.0)
    }

    /// Pool gauges, fed by the persistence layer.
    pub fn record_pool_stats(&self, active: u64, total: u64) {
        if let Err(e) = self.db_connections_active.set(&[], active as f64) {
            tracing::warn!(error = %e, "db_connections_active update failed");
        }
        if let Err(e) = self.db_connections_total.set(&[], total as f64) {
            tracing::warn!(error = %e, "db_connections_total update failed");
        }
    }
}

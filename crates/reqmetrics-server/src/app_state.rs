//! Shared application state.
//!
//! The registry is built here once, at startup, and handed to every component
//! that records or renders metrics. Registration errors are returned to `main`
//! instead of panicking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqmetrics_core::{exposition, Registry, Result};

use crate::config::ServiceConfig;
use crate::obs::{BusinessEventTracker, HttpMetrics, ProcessCollector, ProcessProbe};
use crate::ops::readiness::{DrainingCheck, MemoryCheck, Readiness, ReadinessCheck};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    registry: Arc<Registry>,
    http: Arc<HttpMetrics>,
    events: BusinessEventTracker,
    process: Arc<ProcessProbe>,
    readiness: Readiness,
    draining: Arc<AtomicBool>,
    started: Instant,
}

impl AppState {
    /// Build application state with the built-in readiness checks.
    pub fn new(cfg: ServiceConfig) -> Result<Self> {
        Self::with_checks(cfg, Vec::new())
    }

    /// Build application state; `checks` run after the built-in ones.
    pub fn with_checks(cfg: ServiceConfig, checks: Vec<Arc<dyn ReadinessCheck>>) -> Result<Self> {
        let registry = Arc::new(Registry::new());

        // 1) Service metrics
        let http = Arc::new(HttpMetrics::register(&registry, &cfg.metrics)?);
        let events = BusinessEventTracker::register(&registry, &cfg.metrics)?;

        // 2) Default process metrics
        let process = Arc::new(ProcessProbe::new());
        if cfg.metrics.process_metrics {
            let collector = ProcessCollector::register(&registry, &cfg.metrics, Arc::clone(&process))?;
            registry.register_collector(Arc::new(collector))?;
        }

        // 3) Readiness
        let draining = Arc::new(AtomicBool::new(false));
        let mut all: Vec<Arc<dyn ReadinessCheck>> = vec![
            Arc::new(DrainingCheck::new(Arc::clone(&draining))),
            Arc::new(MemoryCheck::new(Arc::clone(&process), cfg.readiness.max_rss_bytes)),
        ];
        all.extend(checks);

        tracing::info!(metrics = ?registry.names(), "metrics registered");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                http,
                events,
                process,
                readiness: Readiness::new(all),
                draining,
                started: Instant::now(),
            }),
        })
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.inner.registry)
    }

    pub fn http_metrics(&self) -> Arc<HttpMetrics> {
        Arc::clone(&self.inner.http)
    }

    pub fn events(&self) -> &BusinessEventTracker {
        &self.inner.events
    }

    /// Record a business event from application code.
    pub fn track_event(&self, event_type: &str) {
        self.inner.events.track(event_type);
    }

    pub fn process(&self) -> &ProcessProbe {
        &self.inner.process
    }

    pub fn readiness(&self) -> &Readiness {
        &self.inner.readiness
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started.elapsed()
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }

    /// Snapshot the registry and serialize it.
    pub fn render_metrics(&self) -> Result<String> {
        let snapshot = self.inner.registry.snapshot()?;
        exposition::render(&snapshot)
    }
}

//! Readiness checks behind `/ready`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::obs::ProcessProbe;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub ok: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn pass(detail: impl Into<String>) -> Self {
        Self { ok: true, detail: detail.into() }
    }

    pub fn fail(detail: impl Into<String>) -> Self {
        Self { ok: false, detail: detail.into() }
    }
}

/// A dependency the service needs before it accepts traffic.
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    fn name(&self) -> &str;
    async fn check(&self) -> CheckResult;
}

/// Fails once resident memory reaches the configured ceiling.
pub struct MemoryCheck {
    probe: Arc<ProcessProbe>,
    max_rss_bytes: u64,
}

impl MemoryCheck {
    pub fn new(probe: Arc<ProcessProbe>, max_rss_bytes: u64) -> Self {
        Self { probe, max_rss_bytes }
    }
}

#[async_trait]
impl ReadinessCheck for MemoryCheck {
    fn name(&self) -> &str {
        "memory"
    }

    async fn check(&self) -> CheckResult {
        let rss = self.probe.memory().rss_bytes;
        if rss < self.max_rss_bytes {
            CheckResult::pass(format!("rss {rss} bytes"))
        } else {
            CheckResult::fail(format!("rss {rss} bytes >= limit {}", self.max_rss_bytes))
        }
    }
}

/// Fails once shutdown started.
pub struct DrainingCheck {
    draining: Arc<AtomicBool>,
}

impl DrainingCheck {
    pub fn new(draining: Arc<AtomicBool>) -> Self {
        Self { draining }
    }
}

#[async_trait]
impl ReadinessCheck for DrainingCheck {
    fn name(&self) -> &str {
        "draining"
    }

    async fn check(&self) -> CheckResult {
        if self.draining.load(Ordering::Relaxed) {
            CheckResult::fail("shutting down")
        } else {
            CheckResult::pass("accepting traffic")
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub status: &'static str,
    pub checks: BTreeMap<String, CheckResult>,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.checks.values().all(|c| c.ok)
    }
}

#[derive(Default, Clone)]
pub struct Readiness {
    checks: Vec<Arc<dyn ReadinessCheck>>,
}

impl Readiness {
    pub fn new(checks: Vec<Arc<dyn ReadinessCheck>>) -> Self {
        Self { checks }
    }

    /// Run every check; all are reported even after the first failure.
    pub async fn evaluate(&self) -> ReadinessReport {
        let mut checks = BTreeMap::new();
        for c in &self.checks {
            let result = c.check().await;
            if !result.ok {
                tracing::warn!(check = c.name(), detail = %result.detail, "readiness check failed");
            }
            checks.insert(c.name().to_string(), result);
        }

        let status = if checks.values().all(|c| c.ok) { "ready" } else { "not_ready" };
        ReadinessReport { status, checks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn draining_flips_readiness() {
        let flag = Arc::new(AtomicBool::new(false));
        let readiness = Readiness::new(vec![Arc::new(DrainingCheck::new(Arc::clone(&flag)))]);

        let report = readiness.evaluate().await;
        assert!(report.is_ready());
        assert_eq!(report.status, "ready");

        flag.store(true, Ordering::Relaxed);
        let report = readiness.evaluate().await;
        assert!(!report.is_ready());
        assert_eq!(report.status, "not_ready");
        assert!(!report.checks["draining"].ok);
    }

    #[tokio::test]
    async fn memory_limit_of_one_byte_fails_when_sampled() {
        let probe = Arc::new(ProcessProbe::new());
        let check = MemoryCheck::new(Arc::clone(&probe), 1);
        let result = check.check().await;
        if probe.sample().is_some() {
            assert!(!result.ok);
        }
    }

    #[tokio::test]
    async fn no_checks_means_ready() {
        let report = Readiness::default().evaluate().await;
        assert!(report.is_ready());
        assert!(report.checks.is_empty());
    }
}

//! Process resource sampling (sysinfo).
//!
//! `ProcessProbe` is shared by the health report, the memory readiness check
//! and `ProcessCollector`, which mirrors the samples into gauges right before
//! each scrape.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use reqmetrics_core::{Collector, Gauge, Registry, Result};

use crate::config::MetricsSection;

/// Memory figures for the current process, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub rss_bytes: u64,
    pub virtual_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSample {
    pub memory: MemoryUsage,
    /// Seconds since the Unix epoch.
    pub start_time: u64,
}

pub struct ProcessProbe {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl ProcessProbe {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "current pid unavailable; process stats disabled");
                None
            }
        };
        Self {
            system: Mutex::new(System::new()),
            pid,
        }
    }

    /// Refresh and read the current process. `None` when the platform does
    /// not expose process information.
    pub fn sample(&self) -> Option<ProcessSample> {
        let pid = self.pid?;
        let mut sys = self.system.lock().ok()?;
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let p = sys.process(pid)?;
        Some(ProcessSample {
            memory: MemoryUsage {
                rss_bytes: p.memory(),
                virtual_bytes: p.virtual_memory(),
            },
            start_time: p.start_time(),
        })
    }

    pub fn memory(&self) -> MemoryUsage {
        self.sample().map(|s| s.memory).unwrap_or_default()
    }
}

impl Default for ProcessProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Default process metrics, refreshed on every snapshot.
pub struct ProcessCollector {
    probe: Arc<ProcessProbe>,
    resident_memory: Gauge,
    virtual_memory: Gauge,
    start_time: Gauge,
}

impl ProcessCollector {
    pub fn register(
        registry: &Registry,
        cfg: &MetricsSection,
        probe: Arc<ProcessProbe>,
    ) -> Result<Self> {
        Ok(Self {
            probe,
            resident_memory: registry.register_gauge(
                cfg.name("process_resident_memory_bytes"),
                "Resident memory size in bytes.",
                &[],
            )?,
            virtual_memory: registry.register_gauge(
                cfg.name("process_virtual_memory_bytes"),
                "Virtual memory size in bytes.",
                &[],
            )?,
            start_time: registry.register_gauge(
                cfg.name("process_start_time_seconds"),
                "Start time of the process since unix epoch in seconds.",
                &[],
            )?,
        })
    }
}

impl Collector for ProcessCollector {
    fn collect(&self) {
        let Some(sample) = self.probe.sample() else { return; };

        let updates = [
            self.resident_memory.set(&[], sample.memory.rss_bytes as f64),
            self.virtual_memory.set(&[], sample.memory.virtual_bytes as f64),
            self.start_time.set(&[], sample.start_time as f64),
        ];
        for r in updates {
            if let Err(e) = r {
                tracing::warn!(error = %e, "process metric update failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn collector_publishes_process_gauges() {
        let reg = Registry::new();
        let probe = Arc::new(ProcessProbe::new());
        let collector =
            ProcessCollector::register(&reg, &MetricsSection::default(), Arc::clone(&probe)).unwrap();
        reg.register_collector(Arc::new(collector)).unwrap();

        let snap = reg.snapshot().unwrap();
        assert_eq!(snap.families.len(), 3);

        // Sampling is platform dependent; when it works the gauges are populated.
        if probe.sample().is_some() {
            assert!(snap.families.iter().all(|f| f.series.len() == 1));
        }
    }
}

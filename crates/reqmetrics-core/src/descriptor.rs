//! Metric identity: name, help text, label schema, kind and buckets.
//!
//! Descriptors are built once at startup and never change afterwards. They are
//! validated when handed to [`crate::Registry::register`].

use std::fmt;

use crate::error::{MetricsError, Result};

/// Default histogram buckets (seconds).
pub const DEFAULT_BUCKETS: [f64; 11] = [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Metric kind, rendered in the `# TYPE` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricDescriptor {
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
    pub kind: MetricKind,
    /// Upper bounds, strictly increasing. Empty unless `kind` is `Histogram`.
    pub buckets: Vec<f64>,
}

impl MetricDescriptor {
    pub fn counter(name: impl Into<String>, help: impl Into<String>, labels: &[&str]) -> Self {
        Self::new(name, help, labels, MetricKind::Counter, Vec::new())
    }

    pub fn gauge(name: impl Into<String>, help: impl Into<String>, labels: &[&str]) -> Self {
        Self::new(name, help, labels, MetricKind::Gauge, Vec::new())
    }

    pub fn histogram(
        name: impl Into<String>,
        help: impl Into<String>,
        labels: &[&str],
        buckets: &[f64],
    ) -> Self {
        Self::new(name, help, labels, MetricKind::Histogram, buckets.to_vec())
    }

    fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        labels: &[&str],
        kind: MetricKind,
        buckets: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            label_names: labels.iter().map(|l| l.to_string()).collect(),
            kind,
            buckets,
        }
    }

    /// Check name, label schema and bucket layout.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_metric_name(&self.name) {
            return Err(self.invalid("name must match [a-zA-Z_:][a-zA-Z0-9_:]*"));
        }

        for (i, label) in self.label_names.iter().enumerate() {
            if !is_valid_label_name(label) {
                return Err(self.invalid(format!("invalid label name: {label:?}")));
            }
            if label.starts_with("__") {
                return Err(self.invalid(format!("label name {label:?} is reserved")));
            }
            if self.label_names[..i].contains(label) {
                return Err(self.invalid(format!("duplicate label name: {label}")));
            }
        }

        match self.kind {
            MetricKind::Histogram => {
                if self.label_names.iter().any(|l| l == "le") {
                    return Err(self.invalid("histogram may not use label \"le\""));
                }
                validate_buckets(&self.buckets).map_err(|reason| self.invalid(reason))?;
            }
            _ => {
                if !self.buckets.is_empty() {
                    return Err(self.invalid("buckets are only valid for histograms"));
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> MetricsError {
        MetricsError::InvalidDescriptor {
            metric: self.name.clone(),
            reason: reason.into(),
        }
    }
}

/// Buckets must be non-empty, finite and strictly increasing.
pub fn validate_buckets(buckets: &[f64]) -> std::result::Result<(), String> {
    if buckets.is_empty() {
        return Err("histogram needs at least one bucket".into());
    }
    if let Some(b) = buckets.iter().find(|b| !b.is_finite()) {
        return Err(format!("bucket bound must be finite, got {b}"));
    }
    if buckets.windows(2).any(|w| w[0] >= w[1]) {
        return Err("buckets must be strictly increasing".into());
    }
    Ok(())
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
pub fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

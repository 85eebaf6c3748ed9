//! Shared error type across reqmetrics crates.

use thiserror::Error;

/// Stable error codes (used in logs and JSON error bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Two descriptors registered under the same name.
    DuplicateMetricName,
    /// Descriptor failed validation (name, labels, buckets).
    InvalidDescriptor,
    /// Wrong number of label values for a metric.
    LabelCardinalityMismatch,
    /// Negative or non-finite counter increment.
    InvalidDelta,
    /// Non-finite histogram observation.
    InvalidObservation,
    /// Update operation does not apply to the metric kind.
    KindMismatch,
    /// No metric registered under that name.
    UnknownMetric,
    /// Invalid configuration.
    Config,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateMetricName => "DUPLICATE_METRIC_NAME",
            ErrorCode::InvalidDescriptor => "INVALID_DESCRIPTOR",
            ErrorCode::LabelCardinalityMismatch => "LABEL_CARDINALITY_MISMATCH",
            ErrorCode::InvalidDelta => "INVALID_DELTA",
            ErrorCode::InvalidObservation => "INVALID_OBSERVATION",
            ErrorCode::KindMismatch => "KIND_MISMATCH",
            ErrorCode::UnknownMetric => "UNKNOWN_METRIC",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and server.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("duplicate metric name: {0}")]
    DuplicateMetricName(String),
    #[error("invalid descriptor for {metric}: {reason}")]
    InvalidDescriptor { metric: String, reason: String },
    #[error("label cardinality mismatch for {metric}: expected {expected} values, got {got}")]
    LabelCardinalityMismatch {
        metric: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid delta for counter {metric}: {delta}")]
    InvalidDelta { metric: String, delta: f64 },
    #[error("invalid observation for histogram {metric}: {value}")]
    InvalidObservation { metric: String, value: f64 },
    #[error("operation {op} not applicable to {kind} {metric}")]
    KindMismatch {
        metric: String,
        kind: &'static str,
        op: &'static str,
    },
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MetricsError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MetricsError::DuplicateMetricName(_) => ErrorCode::DuplicateMetricName,
            MetricsError::InvalidDescriptor { .. } => ErrorCode::InvalidDescriptor,
            MetricsError::LabelCardinalityMismatch { .. } => ErrorCode::LabelCardinalityMismatch,
            MetricsError::InvalidDelta { .. } => ErrorCode::InvalidDelta,
            MetricsError::InvalidObservation { .. } => ErrorCode::InvalidObservation,
            MetricsError::KindMismatch { .. } => ErrorCode::KindMismatch,
            MetricsError::UnknownMetric(_) => ErrorCode::UnknownMetric,
            MetricsError::Config(_) => ErrorCode::Config,
            MetricsError::Internal(_) => ErrorCode::Internal,
        }
    }
}

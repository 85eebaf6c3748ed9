//! reqmetrics core: metric descriptors, series storage, typed metric handles,
//! the registry and the text exposition serializer.
//!
//! This crate carries no HTTP or async runtime dependencies; the server crate
//! wires it into request handling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Contract violations (bad labels, negative deltas, NaN observations) surface
//! as `MetricsError` so callers decide whether to fail fast or swallow.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod descriptor;
pub mod error;
pub mod exposition;
pub mod metric;
pub mod registry;
pub mod store;

pub use descriptor::{MetricDescriptor, MetricKind, DEFAULT_BUCKETS};
pub use error::{ErrorCode, MetricsError, Result};
pub use metric::{Counter, Gauge, Histogram};
pub use registry::{Collector, Registry, RegistrySnapshot};
pub use store::{LabelSet, SeriesStore, SeriesValue, Update};

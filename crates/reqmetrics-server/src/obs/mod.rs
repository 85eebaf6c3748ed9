//! Service-side observability: HTTP traffic metrics, request instrumentation,
//! business events and process stats, all backed by the core registry.

pub mod events;
pub mod http;
pub mod instrument;
pub mod process;

pub use events::BusinessEventTracker;
pub use http::HttpMetrics;
pub use instrument::{track_requests, RequestGuard};
pub use process::{MemoryUsage, ProcessCollector, ProcessProbe};

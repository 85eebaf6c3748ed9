//! Typed handles over a [`SeriesStore`](crate::store::SeriesStore).
//!
//! Handles are cheap to clone and share the underlying store. Each one only
//! issues the updates that make sense for its kind.

mod counter;
mod gauge;
mod histogram;

pub use counter::Counter;
pub use gauge::Gauge;
pub use histogram::Histogram;

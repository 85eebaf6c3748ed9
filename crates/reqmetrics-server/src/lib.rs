//! reqmetrics server library entry.
//!
//! Wires the core registry into an axum service: configuration, shared state,
//! request instrumentation, business events and the ops endpoints. Consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;

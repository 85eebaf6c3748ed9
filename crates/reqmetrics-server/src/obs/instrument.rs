//! Per-request instrumentation.
//!
//! Entry increments the in-flight gauge and hands back a [`RequestGuard`].
//! Completion happens exactly once: through [`RequestGuard::finish`] with the
//! response status, or from `Drop` when the request future is cancelled or a
//! handler panics. Metric errors are logged and swallowed here; they never
//! reach the request pipeline.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::obs::http::HttpMetrics;

/// Status recorded when the guard is dropped while unwinding.
pub const STATUS_PANICKED: u16 = 500;
/// Status recorded when the guard is dropped before a response was produced.
pub const STATUS_CANCELLED: u16 = 499;

pub struct RequestGuard {
    metrics: Arc<HttpMetrics>,
    method: String,
    route: String,
    start: Instant,
    entered: bool,
    completed: bool,
}

impl RequestGuard {
    pub fn start(metrics: Arc<HttpMetrics>, method: impl Into<String>, route: impl Into<String>) -> Self {
        let entered = match metrics.in_flight.inc(&[]) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "in-flight increment failed");
                false
            }
        };
        Self {
            metrics,
            method: method.into(),
            route: route.into(),
            start: Instant::now(),
            entered,
            completed: false,
        }
    }

    pub fn finish(mut self, status: u16) {
        self.complete(status);
    }

    fn complete(&mut self, status: u16) {
        if self.completed {
            return;
        }
        self.completed = true;

        let elapsed = self.start.elapsed();
        if let Err(e) = self
            .metrics
            .record_request(&self.method, &self.route, status, elapsed)
        {
            tracing::warn!(
                error = %e,
                method = %self.method,
                route = %self.route,
                status,
                "request metrics not recorded"
            );
        }

        if self.entered {
            if let Err(e) = self.metrics.in_flight.dec(&[]) {
                tracing::warn!(error = %e, "in-flight decrement failed");
            }
        }
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let status = if std::thread::panicking() {
            STATUS_PANICKED
        } else {
            STATUS_CANCELLED
        };
        tracing::debug!(method = %self.method, route = %self.route, status, "request ended without response");
        self.complete(status);
    }
}

/// Matched route template when routing succeeded, raw path otherwise.
/// Unmatched paths each become their own label value.
pub fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string())
}

/// Middleware: wrap every request in a [`RequestGuard`].
pub async fn track_requests(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let route = route_label(&req);
    let guard = RequestGuard::start(app.http_metrics(), req.method().as_str(), route);

    let response = next.run(req).await;
    guard.finish(response.status().as_u16());
    response
}

//! Axum router wiring.
//!
//! Ops endpoints plus any application routes, all behind the request
//! instrumentation layer. The layer also wraps the fallback, so unmatched
//! requests are counted under their raw path.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    build_router_with(state, Router::new())
}

/// Build the router with application routes merged in.
pub fn build_router_with(state: AppState, api: Router<AppState>) -> Router {
    Router::new()
        .route("/metrics", get(ops::metrics))
        .route("/health", get(ops::health))
        .route("/ready", get(ops::ready))
        .merge(api)
        .fallback(ops::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), obs::track_requests))
        .with_state(state)
}

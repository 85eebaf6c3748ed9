//! reqmetrics server
//!
//! - `/metrics` scrape endpoint, `/health`, `/ready`
//! - Config from `REQMETRICS_CONFIG` (default `reqmetrics.yaml`, optional)
//! - Graceful shutdown: readiness flips to draining on SIGINT/SIGTERM

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use reqmetrics_server::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    let path = std::env::var("REQMETRICS_CONFIG").unwrap_or_else(|_| "reqmetrics.yaml".into());
    let cfg = config::load_from_file(&path);

    let level = cfg.as_ref().map(|c| c.server.log_level.as_str()).unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).init();

    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, %path, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let listen = match cfg.server.listen_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "bad listen address");
            return ExitCode::FAILURE;
        }
    };
    let environment = cfg.server.environment.clone();

    let state = match AppState::new(cfg) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, code = e.code().as_str(), "startup failed");
            return ExitCode::FAILURE;
        }
    };
    let app = router::build_router(state.clone());

    let listener = match tokio::net::TcpListener::bind(listen).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, %listen, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(%listen, %environment, "reqmetrics-server starting");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
    {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }

    state.set_draining();
    tracing::info!("draining, starting graceful shutdown");
}

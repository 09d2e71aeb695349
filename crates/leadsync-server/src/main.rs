//! `leadsync` server entry point.
//!
//! Reads configuration, builds the CRM backend and the upsert pipeline, then
//! starts the Axum HTTP server with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use leadsync_core::ContactSync;
use leadsync_crm::{CrmBackend, KeapClient, MemoryCrm};
use leadsync_server::build_router;
use leadsync_server::config::{CrmBackendType, ServerConfig};
use leadsync_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(crm = ?config.crm_backend, path = %config.submit_path, "leadsync starting");

    let state = build_app_state(&config)?;
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "leadsync server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("leadsync server stopped");
    Ok(())
}

/// Build the shared application state from the configured CRM backend.
fn build_app_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let crm: Arc<dyn CrmBackend> = match &config.crm_backend {
        CrmBackendType::Memory => {
            info!("using in-memory CRM (contacts will not persist)");
            Arc::new(MemoryCrm::new())
        }
        CrmBackendType::Keap(Some(keap)) => {
            let client =
                KeapClient::new(keap.clone()).context("failed to build Keap API client")?;
            info!(api = %client.api_root(), "using Keap CRM");
            Arc::new(client)
        }
        CrmBackendType::Keap(None) => {
            warn!("KEAP_ACCESS_TOKEN is not set; submissions will fail until it is configured");
            return Ok(AppState::unconfigured());
        }
    };

    Ok(AppState::new(ContactSync::new(crm, config.mapping)))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}

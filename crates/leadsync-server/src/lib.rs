//! `leadsync` HTTP server.
//!
//! Wires the upsert pipeline from `leadsync-core` and a CRM backend from
//! `leadsync-crm` into an Axum router: the submission endpoint at the
//! configured path and a liveness probe at `/health`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    // Bound the number of submissions in flight against the CRM.
    let submit_routes = routes::submit::router(&config.submit_path)
        .layer(ConcurrencyLimitLayer::new(config.max_concurrent));

    // The form is embedded on arbitrary origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(submit_routes)
        .merge(routes::health::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .with_state(Arc::new(state))
}

//! Lead form submission route.
//!
//! POST takes the form payload as JSON, runs the contact upsert pipeline,
//! and answers with the `{success, message?, contactId?}` envelope. Every
//! other method gets a 405, except OPTIONS, which the CORS layer in
//! `build_router` answers before it reaches this router.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{debug, warn};

use leadsync_core::response::{INVALID_BODY_MESSAGE, SubmitResponse};
use leadsync_core::{Payload, SyncOutcome};

use crate::error::AppError;
use crate::state::AppState;

/// Build the submission router mounted at `path`.
pub fn router(path: &str) -> Router<Arc<AppState>> {
    Router::new().route(path, post(submit).fallback(method_not_allowed))
}

async fn submit(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, AppError> {
    let Some(sync) = state.sync.as_ref() else {
        return Err(AppError::Configuration);
    };

    let payload = parse_payload(&body)?;
    debug!(fields = payload.len(), "submission received");

    match sync.submit(&payload).await? {
        SyncOutcome::Synced { contact_id, .. } => Ok(Json(SubmitResponse::synced(&contact_id))),
        SyncOutcome::Discarded => Ok(Json(SubmitResponse::discarded())),
    }
}

/// Parse the request body. An empty body is an empty payload, so it fails
/// the identity check rather than the JSON parse.
fn parse_payload(body: &[u8]) -> Result<Payload, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::new());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "unparseable submission body");
        AppError::BadRequest(INVALID_BODY_MESSAGE.to_owned())
    })
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

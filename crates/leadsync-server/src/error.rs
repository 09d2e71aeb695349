//! HTTP error type for the `leadsync` server.
//!
//! Maps pipeline errors into HTTP responses. Every error renders the same
//! `{success: false, message}` envelope the success path uses. CRM failures
//! are logged here with their full detail; the caller only ever sees the
//! generic failure message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use leadsync_core::SyncError;
use leadsync_core::response::{
    CONFIG_ERROR_MESSAGE, FAILURE_MESSAGE, METHOD_NOT_ALLOWED_MESSAGE, SubmitResponse,
};
use leadsync_crm::CrmError;

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Client sent invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Anything but POST/OPTIONS on the submission route.
    #[error("method not allowed")]
    MethodNotAllowed,
    /// No CRM backend is configured.
    #[error("no CRM backend configured")]
    Configuration,
    /// A CRM call failed.
    #[error(transparent)]
    Crm(#[from] CrmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                METHOD_NOT_ALLOWED_MESSAGE.to_owned(),
            ),
            Self::Configuration => {
                error!("KEAP_ACCESS_TOKEN is not set; rejecting submission");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CONFIG_ERROR_MESSAGE.to_owned(),
                )
            }
            Self::Crm(err) => {
                match &err {
                    CrmError::Api { status, body } => {
                        error!(status, body = %body, "CRM rejected the request");
                    }
                    other => error!(error = %other, "CRM request failed"),
                }
                (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE.to_owned())
            }
        };

        (status, Json(SubmitResponse::failure(message))).into_response()
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Rejected(rejection) => Self::BadRequest(rejection.to_string()),
            SyncError::Crm(crm) => Self::Crm(crm),
        }
    }
}

//! CRM error types.
//!
//! Every variant carries enough context to diagnose a failed call from the
//! server log alone. The access token never appears in an error message.

/// Errors that can occur while talking to a CRM backend.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    /// The CRM answered with a non-2xx status.
    #[error("CRM API error ({status}): {body}")]
    Api {
        /// HTTP status code returned by the CRM.
        status: u16,
        /// Raw response body, as returned.
        body: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset, timeout).
    #[error("CRM network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body could not be decoded.
    #[error("CRM response decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// A create call succeeded but the response carried no contact id.
    #[error("CRM did not return a contact id")]
    MissingContactId,

    /// The backend was built with an unusable configuration.
    #[error("CRM configuration error: {0}")]
    Config(String),
}

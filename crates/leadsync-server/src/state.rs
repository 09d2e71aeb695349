//! Shared application state for the `leadsync` server.

use leadsync_core::ContactSync;

/// Shared application state passed to all HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The upsert pipeline, or `None` when no CRM is configured.
    pub sync: Option<ContactSync>,
}

impl AppState {
    #[must_use]
    pub fn new(sync: ContactSync) -> Self {
        Self { sync: Some(sync) }
    }

    /// State for a server started without CRM credentials.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { sync: None }
    }
}

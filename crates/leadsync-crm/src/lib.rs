//! CRM backend abstraction for `leadsync`.
//!
//! This crate defines the [`CrmBackend`] trait, the four contact operations
//! the submission pipeline needs from a CRM. It knows nothing about forms,
//! validation, or HTTP routing. The pipeline in `leadsync-core` resolves a
//! submission to a [`ContactDraft`] and drives a backend through search,
//! write, and tag calls.
//!
//! Two implementations are provided:
//!
//! - [`KeapClient`]: the Keap (Infusionsoft) REST API, v1 or v2
//! - [`MemoryCrm`]: in-memory, for local development and tests

mod error;
mod keap;
mod memory;
pub mod model;

pub use error::CrmError;
pub use keap::{ApiVersion, KeapClient, KeapConfig, DEFAULT_KEAP_API_BASE};
pub use memory::{CrmCall, CrmOperation, MemoryCrm, StoredContact};
pub use model::{ContactDraft, ContactId, CustomField, TagRequest};

/// A remote contact store keyed by e-mail address.
///
/// Every method is a single round trip; implementations never retry.
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait CrmBackend: Send + Sync + 'static {
    /// Search for a contact by exact e-mail match.
    ///
    /// Returns the first match's id, or `Ok(None)` when no contact carries
    /// this address. Case sensitivity is whatever the CRM defines.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError`] if the search call fails.
    async fn find_by_email(&self, email: &str) -> Result<Option<ContactId>, CrmError>;

    /// Create a new contact and return the id the CRM assigned.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::MissingContactId`] if the CRM accepted the contact
    /// but did not report an id, or another [`CrmError`] if the call fails.
    async fn create_contact(&self, draft: &ContactDraft) -> Result<ContactId, CrmError>;

    /// Partially update an existing contact with the parts present in `draft`.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError`] if the update call fails.
    async fn update_contact(&self, id: &ContactId, draft: &ContactDraft) -> Result<(), CrmError>;

    /// Apply tags to a contact.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError`] if the tag call fails.
    async fn apply_tags(&self, id: &ContactId, tag_ids: &[u64]) -> Result<(), CrmError>;
}

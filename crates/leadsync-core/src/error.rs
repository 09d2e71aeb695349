//! Error types for `leadsync-core`.
//!
//! [`FieldError`] messages are shown to the person filling in the form, so
//! they are written as instructions. [`SubmissionError`] messages are
//! returned to the caller of the submission endpoint. [`SyncError`] wraps
//! both the input rejection and CRM failures of one pipeline run.

use leadsync_crm::CrmError;

use crate::form::Field;

/// A client-side validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The field is empty (after trimming).
    #[error("Please enter your {}", .0.label())]
    Required(Field),

    /// The trimmed value is shorter than allowed.
    #[error("{} must be at least {min} characters", .field.title())]
    TooShort { field: Field, min: usize },

    /// The e-mail address does not look like `local@domain.tld`.
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// No option of a required checkbox group is checked.
    #[error("Please select at least one option")]
    NothingSelected(Field),
}

/// Server-side rejection of a submission before any CRM call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// No usable name, or no e-mail address.
    #[error("Name and email are required")]
    MissingIdentity,

    /// The e-mail address fails the format check.
    #[error("Invalid email address")]
    InvalidEmail,
}

/// Failure of one run of the contact upsert pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The submission was rejected before reaching the CRM.
    #[error(transparent)]
    Rejected(#[from] SubmissionError),

    /// A CRM call failed; later steps were not attempted.
    #[error("CRM call failed: {0}")]
    Crm(#[from] CrmError),
}

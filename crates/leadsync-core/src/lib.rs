//! Core library for `leadsync`.
//!
//! Contains the lead-form model and client validator, the payload assembler,
//! the server-side submission checks, the contact mapping, the upsert
//! pipeline, and the submit feedback state machine. This crate depends on
//! `leadsync-crm` for the backend trait and knows nothing about HTTP routing.

pub mod error;
pub mod feedback;
pub mod form;
pub mod mapping;
pub mod payload;
pub mod response;
pub mod submission;
pub mod sync;
pub mod validate;

pub use error::{FieldError, SubmissionError, SyncError};
pub use form::{Field, FormKind, FormLayout, FormState, NameStyle};
pub use mapping::{CustomFieldIds, FieldMapping, TagIds};
pub use payload::{FieldValue, Payload};
pub use response::SubmitResponse;
pub use submission::Submission;
pub use sync::{ContactSync, SyncOutcome, UpsertAction};

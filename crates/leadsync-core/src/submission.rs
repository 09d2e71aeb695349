//! Server-side view of a validated submission.
//!
//! Turns a raw [`Payload`] into a [`Submission`]: identity checked, e-mail
//! checked, form kind classified, name resolved into given and family parts.

use crate::error::SubmissionError;
use crate::form::{Field, FormKind};
use crate::payload::Payload;
use crate::validate::is_valid_email;

/// A submission that passed the endpoint's input checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub kind: FormKind,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub questions: Option<String>,
    pub challenges: Option<String>,
    pub role: Vec<String>,
    pub interest: Vec<String>,
    pub contact_method: Vec<String>,
}

/// Split a full name at the first space. The family name is everything
/// after it and may be empty or contain further spaces.
#[must_use]
pub fn split_full_name(full: &str) -> (&str, &str) {
    full.split_once(' ').unwrap_or((full, ""))
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

fn owned_list(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_owned).collect()
}

impl Submission {
    /// Check and classify a raw payload.
    ///
    /// A name is either a non-empty `name` (split at the first space) or a
    /// non-empty `first-name` together with a non-empty `last-name`. A
    /// non-empty `organization` marks the corporate form.
    ///
    /// # Errors
    ///
    /// [`SubmissionError::MissingIdentity`] if the name or e-mail is missing,
    /// [`SubmissionError::InvalidEmail`] if the e-mail fails the format check.
    pub fn from_payload(payload: &Payload) -> Result<Self, SubmissionError> {
        let names = match payload.text(Field::Name.name()) {
            Some(full) => Some(split_full_name(full)),
            None => payload
                .text(Field::FirstName.name())
                .zip(payload.text(Field::LastName.name())),
        };

        let (Some((given, family)), Some(email)) = (names, payload.text(Field::Email.name()))
        else {
            return Err(SubmissionError::MissingIdentity);
        };

        if !is_valid_email(email) {
            return Err(SubmissionError::InvalidEmail);
        }

        let organization = owned(payload.text(Field::Organization.name()));
        let kind = if organization.is_some() {
            FormKind::Corporate
        } else {
            FormKind::Workshop
        };

        Ok(Self {
            kind,
            given_name: given.to_owned(),
            family_name: family.to_owned(),
            email: email.to_owned(),
            organization,
            phone: owned(payload.text(Field::Phone.name())),
            questions: owned(payload.text(Field::Questions.name())),
            challenges: owned(payload.text(Field::Challenges.name())),
            role: owned_list(payload.selection(Field::Role.name())),
            interest: owned_list(payload.selection(Field::Interest.name())),
            contact_method: owned_list(payload.selection(Field::ContactMethod.name())),
        })
    }
}

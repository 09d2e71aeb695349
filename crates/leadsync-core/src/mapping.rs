//! Mapping from a [`Submission`] to the CRM contact representation.
//!
//! Custom fields and tags are identified by numeric ids configured per CRM
//! account. A field whose id is not configured is left out of the contact;
//! that is not an error.

use leadsync_crm::ContactDraft;
use leadsync_crm::model::{Company, CustomField, EmailAddress, PhoneNumber};

use crate::form::FormKind;
use crate::submission::Submission;

/// Separator used when a checkbox selection is written to one custom field.
pub const SELECTION_SEPARATOR: &str = ", ";

/// Configured custom field ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomFieldIds {
    pub role: Option<u64>,
    pub questions: Option<u64>,
    pub interest: Option<u64>,
    pub challenges: Option<u64>,
    pub preferred_contact: Option<u64>,
}

/// Configured tag ids, one per form kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagIds {
    pub workshop: Option<u64>,
    pub corporate: Option<u64>,
}

impl TagIds {
    /// The tag to apply for a form kind, if one is configured.
    #[must_use]
    pub fn for_kind(&self, kind: FormKind) -> Option<u64> {
        match kind {
            FormKind::Workshop => self.workshop,
            FormKind::Corporate => self.corporate,
        }
    }
}

/// Everything account-specific the pipeline needs besides the CRM itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMapping {
    pub custom_fields: CustomFieldIds,
    pub tags: TagIds,
}

fn push_text(fields: &mut Vec<CustomField>, id: Option<u64>, value: Option<&String>) {
    if let (Some(id), Some(content)) = (id, value) {
        fields.push(CustomField {
            id,
            content: content.clone(),
        });
    }
}

fn push_selection(fields: &mut Vec<CustomField>, id: Option<u64>, selected: &[String]) {
    if let Some(id) = id {
        if !selected.is_empty() {
            fields.push(CustomField {
                id,
                content: selected.join(SELECTION_SEPARATOR),
            });
        }
    }
}

/// Build the contact body sent on create or update.
///
/// Workshop submissions carry role and questions. Corporate submissions
/// carry company, phone, interest, challenges, and preferred contact method.
#[must_use]
pub fn build_contact(submission: &Submission, ids: &CustomFieldIds) -> ContactDraft {
    let mut draft = ContactDraft {
        given_name: submission.given_name.clone(),
        family_name: submission.family_name.clone(),
        email_addresses: vec![EmailAddress::primary(submission.email.clone())],
        ..ContactDraft::default()
    };

    let mut fields = Vec::new();
    match submission.kind {
        FormKind::Workshop => {
            push_selection(&mut fields, ids.role, &submission.role);
            push_text(&mut fields, ids.questions, submission.questions.as_ref());
        }
        FormKind::Corporate => {
            draft.company = submission
                .organization
                .clone()
                .map(|company_name| Company { company_name });
            if let Some(phone) = &submission.phone {
                draft.phone_numbers.push(PhoneNumber::primary(phone.clone()));
            }
            push_selection(&mut fields, ids.interest, &submission.interest);
            push_text(&mut fields, ids.challenges, submission.challenges.as_ref());
            push_selection(&mut fields, ids.preferred_contact, &submission.contact_method);
        }
    }
    draft.custom_fields = fields;
    draft
}

//! The contact upsert pipeline.
//!
//! One run handles one submission, strictly in order:
//!
//! 1. drop the submission if the honeypot is filled
//! 2. check identity and e-mail, classify the form
//! 3. build the contact body
//! 4. search the CRM by e-mail
//! 5. update the first match, or create a new contact
//! 6. apply the form kind's tag, if configured
//!
//! Each CRM call waits for the previous one. The first failure ends the run;
//! nothing is retried.

use std::fmt;
use std::sync::Arc;

use leadsync_crm::{ContactId, CrmBackend};
use tracing::{debug, info};

use crate::error::SyncError;
use crate::form::FormKind;
use crate::mapping::{FieldMapping, build_contact};
use crate::payload::Payload;
use crate::submission::Submission;

/// How the contact was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Created,
    Updated,
}

impl UpsertAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The contact was written and, when configured, tagged.
    Synced {
        contact_id: ContactId,
        kind: FormKind,
        action: UpsertAction,
        tag: Option<u64>,
    },
    /// The honeypot was filled; nothing was sent to the CRM.
    Discarded,
}

/// Runs submissions against a CRM backend.
#[derive(Clone)]
pub struct ContactSync {
    crm: Arc<dyn CrmBackend>,
    mapping: FieldMapping,
}

impl fmt::Debug for ContactSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactSync")
            .field("mapping", &self.mapping)
            .finish_non_exhaustive()
    }
}

impl ContactSync {
    #[must_use]
    pub fn new(crm: Arc<dyn CrmBackend>, mapping: FieldMapping) -> Self {
        Self { crm, mapping }
    }

    /// Run the full pipeline for a raw payload.
    ///
    /// # Errors
    ///
    /// [`SyncError::Rejected`] if the payload fails the input checks (no CRM
    /// call is made), [`SyncError::Crm`] if any CRM call fails.
    pub async fn submit(&self, payload: &Payload) -> Result<SyncOutcome, SyncError> {
        if payload.honeypot_filled() {
            info!("honeypot field filled, discarding submission");
            return Ok(SyncOutcome::Discarded);
        }

        let submission = Submission::from_payload(payload)?;
        self.upsert(&submission).await
    }

    /// Write an already checked submission to the CRM.
    ///
    /// # Errors
    ///
    /// [`SyncError::Crm`] if the search, write, or tag call fails.
    pub async fn upsert(&self, submission: &Submission) -> Result<SyncOutcome, SyncError> {
        let draft = build_contact(submission, &self.mapping.custom_fields);
        debug!(
            kind = %submission.kind,
            custom_fields = draft.custom_fields.len(),
            "contact body assembled"
        );

        let (contact_id, action) = match self.crm.find_by_email(&submission.email).await? {
            Some(id) => {
                self.crm.update_contact(&id, &draft).await?;
                (id, UpsertAction::Updated)
            }
            None => {
                let id = self.crm.create_contact(&draft).await?;
                (id, UpsertAction::Created)
            }
        };

        let tag = self.mapping.tags.for_kind(submission.kind);
        if let Some(tag_id) = tag {
            self.crm.apply_tags(&contact_id, &[tag_id]).await?;
        }

        info!(
            kind = %submission.kind,
            contact_id = %contact_id,
            action = action.as_str(),
            tagged = tag.is_some(),
            "submission synced to CRM"
        );

        Ok(SyncOutcome::Synced {
            contact_id,
            kind: submission.kind,
            action,
            tag,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::SubmissionError;
    use crate::mapping::{CustomFieldIds, TagIds};
    use leadsync_crm::model::EmailAddress;
    use leadsync_crm::{ContactDraft, CrmCall, CrmError, CrmOperation, MemoryCrm};
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    fn mapping() -> FieldMapping {
        FieldMapping {
            custom_fields: CustomFieldIds {
                role: Some(42),
                ..CustomFieldIds::default()
            },
            tags: TagIds {
                workshop: Some(7),
                corporate: Some(8),
            },
        }
    }

    fn sync_with(crm: &MemoryCrm, mapping: FieldMapping) -> ContactSync {
        ContactSync::new(Arc::new(crm.clone()), mapping)
    }

    #[tokio::test]
    async fn new_contact_is_created_then_tagged() {
        let crm = MemoryCrm::new();
        let sync = sync_with(&crm, mapping());

        let outcome = sync
            .submit(&payload(json!({
                "name": "Jane Doe",
                "email": "jane@x.com",
                "role": ["Manager"],
            })))
            .await
            .unwrap();

        let SyncOutcome::Synced { contact_id, action, tag, kind } = outcome else {
            panic!("expected a synced outcome");
        };
        assert_eq!(action, UpsertAction::Created);
        assert_eq!(kind, FormKind::Workshop);
        assert_eq!(tag, Some(7));

        let calls = crm.calls().await;
        let ops: Vec<_> = calls.iter().map(CrmCall::operation).collect();
        assert_eq!(
            ops,
            vec![CrmOperation::Search, CrmOperation::Create, CrmOperation::ApplyTags]
        );

        let CrmCall::Create { draft } = &calls[1] else {
            panic!("second call should be a create");
        };
        assert_eq!(draft.given_name, "Jane");
        assert_eq!(draft.family_name, "Doe");
        assert_eq!(draft.custom_field(42), Some("Manager"));

        assert_eq!(
            calls[2],
            CrmCall::ApplyTags {
                id: contact_id.clone(),
                tag_ids: vec![7]
            }
        );
        assert!(crm.contact(&contact_id).await.unwrap().tags.contains(&7));
    }

    #[tokio::test]
    async fn existing_contact_is_updated_and_keeps_its_id() {
        let crm = MemoryCrm::new();
        let existing = crm
            .insert(ContactDraft {
                given_name: "J".to_owned(),
                email_addresses: vec![EmailAddress::primary("jane@x.com")],
                ..ContactDraft::default()
            })
            .await;
        let sync = sync_with(&crm, mapping());

        let outcome = sync
            .submit(&payload(json!({ "name": "Jane Doe", "email": "jane@x.com" })))
            .await
            .unwrap();

        let SyncOutcome::Synced { contact_id, action, .. } = outcome else {
            panic!("expected a synced outcome");
        };
        assert_eq!(contact_id, existing);
        assert_eq!(action, UpsertAction::Updated);
        assert!(
            !crm.calls()
                .await
                .iter()
                .any(|c| c.operation() == CrmOperation::Create)
        );
        assert_eq!(crm.len().await, 1);
        assert_eq!(crm.contact(&existing).await.unwrap().draft.given_name, "Jane");
    }

    #[tokio::test]
    async fn resubmitting_converges_on_one_contact() {
        let crm = MemoryCrm::new();
        let sync = sync_with(&crm, mapping());
        let body = payload(json!({
            "name": "Jane Doe",
            "email": "jane@x.com",
            "role": ["Manager"],
        }));

        let first = sync.submit(&body).await.unwrap();
        let second = sync.submit(&body).await.unwrap();

        let (SyncOutcome::Synced { contact_id: a, .. }, SyncOutcome::Synced { contact_id: b, .. }) =
            (first, second)
        else {
            panic!("expected two synced outcomes");
        };
        assert_eq!(a, b);
        assert_eq!(crm.len().await, 1);
    }

    #[tokio::test]
    async fn corporate_submission_gets_corporate_tag() {
        let crm = MemoryCrm::new();
        let sync = sync_with(&crm, mapping());
        let outcome = sync
            .submit(&payload(json!({
                "first-name": "Jane",
                "last-name": "Doe",
                "email": "jane@x.com",
                "organization": "Acme",
            })))
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            SyncOutcome::Synced { kind: FormKind::Corporate, tag: Some(8), .. }
        ));
    }

    #[tokio::test]
    async fn no_tag_configured_means_no_tag_call() {
        let crm = MemoryCrm::new();
        let sync = sync_with(&crm, FieldMapping::default());
        sync.submit(&payload(json!({ "name": "Jane Doe", "email": "jane@x.com" })))
            .await
            .unwrap();
        let ops: Vec<_> = crm.calls().await.iter().map(CrmCall::operation).collect();
        assert_eq!(ops, vec![CrmOperation::Search, CrmOperation::Create]);
    }

    #[tokio::test]
    async fn honeypot_makes_no_crm_call() {
        let crm = MemoryCrm::new();
        let sync = sync_with(&crm, mapping());
        let outcome = sync
            .submit(&payload(json!({
                "name": "Jane Doe",
                "email": "jane@x.com",
                "website": "http://spam.example",
            })))
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Discarded);
        assert!(crm.calls().await.is_empty());
    }

    #[tokio::test]
    async fn rejected_payload_makes_no_crm_call() {
        let crm = MemoryCrm::new();
        let sync = sync_with(&crm, mapping());
        let err = sync
            .submit(&payload(json!({ "name": "Jane Doe", "email": "" })))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Rejected(SubmissionError::MissingIdentity)
        ));
        assert!(crm.calls().await.is_empty());
    }

    #[tokio::test]
    async fn failed_search_stops_the_run() {
        let crm = MemoryCrm::new();
        crm.fail_on(CrmOperation::Search, 500).await;
        let sync = sync_with(&crm, mapping());
        let err = sync
            .submit(&payload(json!({ "name": "Jane Doe", "email": "jane@x.com" })))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Crm(CrmError::Api { status: 500, .. })));
        assert_eq!(crm.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_tag_call_fails_the_run_after_create() {
        let crm = MemoryCrm::new();
        crm.fail_on(CrmOperation::ApplyTags, 400).await;
        let sync = sync_with(&crm, mapping());
        let err = sync
            .submit(&payload(json!({ "name": "Jane Doe", "email": "jane@x.com" })))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Crm(_)));
        assert_eq!(crm.len().await, 1);
    }
}

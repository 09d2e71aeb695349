//! In-memory CRM for development and testing.
//!
//! Contacts live in a `BTreeMap` behind a `RwLock` and receive sequential
//! numeric ids. Every call is appended to a journal so tests can assert
//! exactly which CRM operations a submission produced, and in which order.
//! Nothing is persisted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::{ContactDraft, ContactId};
use crate::{CrmBackend, CrmError};

/// The four operations a [`CrmBackend`] exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrmOperation {
    Search,
    Create,
    Update,
    ApplyTags,
}

/// One recorded call against a [`MemoryCrm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrmCall {
    Search { email: String },
    Create { draft: ContactDraft },
    Update { id: ContactId, draft: ContactDraft },
    ApplyTags { id: ContactId, tag_ids: Vec<u64> },
}

impl CrmCall {
    /// Which operation this call was.
    #[must_use]
    pub fn operation(&self) -> CrmOperation {
        match self {
            Self::Search { .. } => CrmOperation::Search,
            Self::Create { .. } => CrmOperation::Create,
            Self::Update { .. } => CrmOperation::Update,
            Self::ApplyTags { .. } => CrmOperation::ApplyTags,
        }
    }
}

/// A contact as held by the in-memory CRM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContact {
    pub id: ContactId,
    pub draft: ContactDraft,
    pub tags: BTreeSet<u64>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    contacts: BTreeMap<ContactId, StoredContact>,
    calls: Vec<CrmCall>,
    failures: BTreeMap<CrmOperation, u16>,
}

impl MemoryState {
    fn check_failure(&self, op: CrmOperation) -> Result<(), CrmError> {
        match self.failures.get(&op) {
            Some(&status) => Err(CrmError::Api {
                status,
                body: format!("{{\"message\":\"injected {op:?} failure\"}}"),
            }),
            None => Ok(()),
        }
    }

    fn allocate_id(&mut self) -> ContactId {
        self.next_id = self.next_id.saturating_add(1);
        ContactId::from(self.next_id)
    }
}

/// An in-memory CRM keyed by primary e-mail.
///
/// Cloning shares the underlying contact table and journal.
#[derive(Debug, Clone, Default)]
pub struct MemoryCrm {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryCrm {
    /// Create an empty CRM.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a contact directly, bypassing the journal. Returns its id.
    pub async fn insert(&self, draft: ContactDraft) -> ContactId {
        let mut state = self.state.write().await;
        let id = state.allocate_id();
        state.contacts.insert(
            id.clone(),
            StoredContact {
                id: id.clone(),
                draft,
                tags: BTreeSet::new(),
            },
        );
        id
    }

    /// Make every future call of `op` fail with the given HTTP status.
    pub async fn fail_on(&self, op: CrmOperation, status: u16) {
        self.state.write().await.failures.insert(op, status);
    }

    /// All calls received so far, oldest first.
    pub async fn calls(&self) -> Vec<CrmCall> {
        self.state.read().await.calls.clone()
    }

    /// Look up a stored contact.
    pub async fn contact(&self, id: &ContactId) -> Option<StoredContact> {
        self.state.read().await.contacts.get(id).cloned()
    }

    /// Number of stored contacts.
    pub async fn len(&self) -> usize {
        self.state.read().await.contacts.len()
    }

    /// Whether no contacts are stored.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.contacts.is_empty()
    }
}

fn merge_into(target: &mut ContactDraft, patch: &ContactDraft) {
    target.given_name.clone_from(&patch.given_name);
    target.family_name.clone_from(&patch.family_name);
    if !patch.email_addresses.is_empty() {
        target.email_addresses.clone_from(&patch.email_addresses);
    }
    if patch.company.is_some() {
        target.company.clone_from(&patch.company);
    }
    if !patch.phone_numbers.is_empty() {
        target.phone_numbers.clone_from(&patch.phone_numbers);
    }
    for field in &patch.custom_fields {
        match target.custom_fields.iter_mut().find(|f| f.id == field.id) {
            Some(existing) => existing.content.clone_from(&field.content),
            None => target.custom_fields.push(field.clone()),
        }
    }
}

#[async_trait::async_trait]
impl CrmBackend for MemoryCrm {
    async fn find_by_email(&self, email: &str) -> Result<Option<ContactId>, CrmError> {
        let mut state = self.state.write().await;
        state.calls.push(CrmCall::Search {
            email: email.to_owned(),
        });
        state.check_failure(CrmOperation::Search)?;

        Ok(state
            .contacts
            .values()
            .find(|c| c.draft.primary_email() == Some(email))
            .map(|c| c.id.clone()))
    }

    async fn create_contact(&self, draft: &ContactDraft) -> Result<ContactId, CrmError> {
        let mut state = self.state.write().await;
        state.calls.push(CrmCall::Create {
            draft: draft.clone(),
        });
        state.check_failure(CrmOperation::Create)?;

        let id = state.allocate_id();
        state.contacts.insert(
            id.clone(),
            StoredContact {
                id: id.clone(),
                draft: draft.clone(),
                tags: BTreeSet::new(),
            },
        );
        Ok(id)
    }

    async fn update_contact(&self, id: &ContactId, draft: &ContactDraft) -> Result<(), CrmError> {
        let mut state = self.state.write().await;
        state.calls.push(CrmCall::Update {
            id: id.clone(),
            draft: draft.clone(),
        });
        state.check_failure(CrmOperation::Update)?;

        let stored = state.contacts.get_mut(id).ok_or_else(|| CrmError::Api {
            status: 404,
            body: format!("{{\"message\":\"contact {id} not found\"}}"),
        })?;
        merge_into(&mut stored.draft, draft);
        Ok(())
    }

    async fn apply_tags(&self, id: &ContactId, tag_ids: &[u64]) -> Result<(), CrmError> {
        let mut state = self.state.write().await;
        state.calls.push(CrmCall::ApplyTags {
            id: id.clone(),
            tag_ids: tag_ids.to_vec(),
        });
        state.check_failure(CrmOperation::ApplyTags)?;

        let stored = state.contacts.get_mut(id).ok_or_else(|| CrmError::Api {
            status: 404,
            body: format!("{{\"message\":\"contact {id} not found\"}}"),
        })?;
        stored.tags.extend(tag_ids.iter().copied());
        Ok(())
    }
}

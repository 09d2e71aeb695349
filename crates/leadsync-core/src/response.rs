//! JSON envelope returned by the submission endpoint.

use leadsync_crm::ContactId;
use serde::{Deserialize, Serialize};

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully";
pub const FAILURE_MESSAGE: &str = "Failed to submit form. Please try again.";
pub const CONFIG_ERROR_MESSAGE: &str = "Server configuration error";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// `{success, message?, contactId?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
}

impl SubmitResponse {
    /// The contact was written.
    #[must_use]
    pub fn synced(contact_id: &ContactId) -> Self {
        Self {
            success: true,
            message: Some(SUCCESS_MESSAGE.to_owned()),
            contact_id: Some(contact_id.to_string()),
        }
    }

    /// A discarded bot submission. Indistinguishable from success to the caller
    /// except for the missing contact id.
    #[must_use]
    pub fn discarded() -> Self {
        Self {
            success: true,
            message: Some(SUCCESS_MESSAGE.to_owned()),
            contact_id: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            contact_id: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn synced_uses_camel_case_contact_id() {
        let body = serde_json::to_value(SubmitResponse::synced(&ContactId::from(202))).unwrap();
        assert_eq!(
            body,
            json!({ "success": true, "message": SUCCESS_MESSAGE, "contactId": "202" })
        );
    }

    #[test]
    fn failure_omits_contact_id() {
        let body = serde_json::to_value(SubmitResponse::failure("nope")).unwrap();
        assert_eq!(body, json!({ "success": false, "message": "nope" }));
    }

    #[test]
    fn parses_minimal_envelope() {
        let parsed: SubmitResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.contact_id, None);
    }
}

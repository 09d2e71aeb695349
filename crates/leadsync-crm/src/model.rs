//! Contact wire model shared by every CRM backend.
//!
//! The shapes follow the Keap REST contact resource. E-mail addresses and
//! phone numbers are lists of slots named by `field` (`EMAIL1`, `PHONE1`);
//! custom fields are `{id, content}` pairs keyed by the CRM's numeric field id.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Slot name the CRM uses for a contact's primary e-mail address.
pub const PRIMARY_EMAIL_SLOT: &str = "EMAIL1";

/// Slot name the CRM uses for a contact's primary phone number.
pub const PRIMARY_PHONE_SLOT: &str = "PHONE1";

/// Identifier the CRM assigned to a contact.
///
/// Keap returns ids as JSON numbers; other deployments proxy them as strings.
/// Both decode into the same value and it always serializes as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as it appears in CRM URLs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ContactId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self::from(n),
            Raw::Text(s) => Self(s),
        })
    }
}

/// An e-mail address slot on a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email: String,
    pub field: String,
}

impl EmailAddress {
    /// The contact's primary address.
    #[must_use]
    pub fn primary(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            field: PRIMARY_EMAIL_SLOT.to_owned(),
        }
    }
}

/// A phone number slot on a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub number: String,
    pub field: String,
}

impl PhoneNumber {
    /// The contact's primary phone number.
    #[must_use]
    pub fn primary(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            field: PRIMARY_PHONE_SLOT.to_owned(),
        }
    }
}

/// Company reference on a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub company_name: String,
}

/// A value for a CRM-defined custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: u64,
    pub content: String,
}

/// Contact representation sent on create and on partial update.
///
/// Optional parts are omitted from the JSON body entirely so a `PATCH`
/// leaves the corresponding CRM values untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub given_name: String,
    pub family_name: String,
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
}

impl ContactDraft {
    /// The address in the `EMAIL1` slot, if any.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .iter()
            .find(|e| e.field == PRIMARY_EMAIL_SLOT)
            .map(|e| e.email.as_str())
    }

    /// Look up the content recorded for a custom field id.
    #[must_use]
    pub fn custom_field(&self, id: u64) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.content.as_str())
    }
}

/// Body of a tag-apply call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRequest {
    #[serde(rename = "tagIds")]
    pub tag_ids: Vec<u64>,
}

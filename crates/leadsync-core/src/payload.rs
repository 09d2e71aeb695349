//! Submission payload: the JSON object a form posts to the endpoint.
//!
//! A payload maps field names to a string or to an ordered list of strings
//! (checkbox groups). Values travel untrimmed; trimming is a validation
//! concern only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::form::{Field, HONEYPOT_FIELD};

/// One value in a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    /// Any other JSON value. Carried through but never read.
    Other(serde_json::Value),
}

/// Field name → value mapping, as posted to the submission endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, FieldValue>);

impl Payload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a text value, replacing any previous value for the key.
    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), FieldValue::Text(value.into()));
    }

    /// Append one selected option to a list value, creating it if needed.
    pub fn push_selection(&mut self, key: impl Into<String>, option: impl Into<String>) {
        let entry = self
            .0
            .entry(key.into())
            .or_insert_with(|| FieldValue::List(Vec::new()));
        match entry {
            FieldValue::List(items) => items.push(option.into()),
            other => *other = FieldValue::List(vec![option.into()]),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// A non-empty text value. Lists and other JSON types yield `None`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(FieldValue::Text(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Selected options of a checkbox group.
    ///
    /// A bare string is read as a single selection. Anything else, including
    /// a missing key, is an empty selection.
    #[must_use]
    pub fn selection(&self, key: &str) -> Vec<&str> {
        match self.0.get(key) {
            Some(FieldValue::List(items)) => items.iter().map(String::as_str).collect(),
            Some(FieldValue::Text(s)) if !s.is_empty() => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    /// Whether the honeypot field carries a value.
    #[must_use]
    pub fn honeypot_filled(&self) -> bool {
        match self.0.get(HONEYPOT_FIELD) {
            Some(FieldValue::Text(s)) => !s.is_empty(),
            Some(FieldValue::List(items)) => !items.is_empty(),
            Some(FieldValue::Other(v)) => !v.is_null(),
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build a payload from form entries in form order.
///
/// Repeated checkbox fields (`role`, `interest`, `contact-method`) are
/// collected into lists in entry order. The honeypot is always left out.
/// For any other repeated key the last value wins.
pub fn assemble<'a, I>(entries: I) -> Payload
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut payload = Payload::new();
    for (key, value) in entries {
        if Field::from_name(key).is_some_and(Field::is_group) {
            payload.push_selection(key, value);
        } else if key != HONEYPOT_FIELD {
            payload.insert_text(key, value);
        }
    }
    payload
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_checkboxes_and_drops_honeypot() {
        let payload = assemble([
            ("first-name", "Jane"),
            ("role", "Developer"),
            ("website", ""),
            ("role", "Manager"),
            ("email", "jane@x.com"),
        ]);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "first-name": "Jane",
                "role": ["Developer", "Manager"],
                "email": "jane@x.com",
            })
        );
    }

    #[test]
    fn honeypot_is_excluded_even_when_filled() {
        let payload = assemble([("website", "http://spam"), ("email", "a@b.co")]);
        assert!(payload.get("website").is_none());
        assert!(!payload.honeypot_filled());
    }

    #[test]
    fn values_are_not_trimmed() {
        let payload = assemble([("first-name", "  Jane ")]);
        assert_eq!(payload.text("first-name"), Some("  Jane "));
    }

    #[test]
    fn last_text_value_wins() {
        let payload = assemble([("phone", "1"), ("phone", "2")]);
        assert_eq!(payload.text("phone"), Some("2"));
    }

    #[test]
    fn deserializes_mixed_value_types() {
        let payload: Payload = serde_json::from_value(json!({
            "name": "Jane Doe",
            "role": ["Manager"],
            "interest": "Coaching",
            "consent": true,
            "website": "",
        }))
        .unwrap();
        assert_eq!(payload.text("name"), Some("Jane Doe"));
        assert_eq!(payload.selection("role"), vec!["Manager"]);
        assert_eq!(payload.selection("interest"), vec!["Coaching"]);
        assert!(matches!(payload.get("consent"), Some(FieldValue::Other(_))));
        assert_eq!(payload.text("consent"), None);
        assert!(!payload.honeypot_filled());
    }

    #[test]
    fn empty_text_reads_as_absent() {
        let payload: Payload = serde_json::from_value(json!({ "organization": "" })).unwrap();
        assert_eq!(payload.text("organization"), None);
    }

    #[test]
    fn honeypot_detected_on_raw_payload() {
        let payload: Payload =
            serde_json::from_value(json!({ "website": "http://spam" })).unwrap();
        assert!(payload.honeypot_filled());
    }
}

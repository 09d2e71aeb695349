//! Form layout and editable form state.
//!
//! [`FormState`] is the explicit stand-in for a rendered lead form: it holds
//! the entered values in form order, the per-field error display state, and
//! implements the interaction rules (clear on edit, re-validate on blur,
//! validate everything on submit and report the field to focus).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;
use crate::payload::{Payload, assemble};
use crate::validate;

/// Name of the hidden anti-bot field.
pub const HONEYPOT_FIELD: &str = "website";

/// Every field a lead form can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    FirstName,
    LastName,
    Organization,
    Email,
    Phone,
    Questions,
    Challenges,
    Role,
    Interest,
    ContactMethod,
    Website,
}

impl Field {
    /// Wire name used in form data and JSON payloads.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FirstName => "first-name",
            Self::LastName => "last-name",
            Self::Organization => "organization",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Questions => "questions",
            Self::Challenges => "challenges",
            Self::Role => "role",
            Self::Interest => "interest",
            Self::ContactMethod => "contact-method",
            Self::Website => HONEYPOT_FIELD,
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [Field; 12] = [
            Field::Name,
            Field::FirstName,
            Field::LastName,
            Field::Organization,
            Field::Email,
            Field::Phone,
            Field::Questions,
            Field::Challenges,
            Field::Role,
            Field::Interest,
            Field::ContactMethod,
            Field::Website,
        ];
        ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether the field is a multi-select checkbox group.
    #[must_use]
    pub fn is_group(self) -> bool {
        matches!(self, Self::Role | Self::Interest | Self::ContactMethod)
    }

    /// Lower-case phrase used in "Please enter your …" messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Organization => "organization name",
            Self::Email => "email address",
            Self::Phone => "phone number",
            Self::Questions => "questions",
            Self::Challenges => "challenges",
            Self::Role => "role",
            Self::Interest => "interest",
            Self::ContactMethod => "preferred contact method",
            Self::Website => "website",
        }
    }

    /// Sentence-case name used at the start of a message.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Organization => "Organization",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Questions => "Questions",
            Self::Challenges => "Challenges",
            Self::Role => "Role",
            Self::Interest => "Interest",
            Self::ContactMethod => "Contact method",
            Self::Website => "Website",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the two landing-page forms a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    /// Workshop registration.
    Workshop,
    /// Corporate contact.
    Corporate,
}

impl FormKind {
    /// The checkbox group that must have at least one option checked.
    #[must_use]
    pub fn required_group(self) -> Field {
        match self {
            Self::Workshop => Field::Role,
            Self::Corporate => Field::Interest,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workshop => "workshop",
            Self::Corporate => "corporate",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "workshop" => Ok(Self::Workshop),
            "corporate" => Ok(Self::Corporate),
            other => Err(format!("unknown form '{other}' (expected workshop or corporate)")),
        }
    }
}

/// How the form asks for the person's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// Separate `first-name` and `last-name` inputs.
    #[default]
    Split,
    /// One `name` input, split at the first space server-side.
    Single,
}

/// Static description of a form: its kind and name inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLayout {
    pub kind: FormKind,
    pub name_style: NameStyle,
}

impl FormLayout {
    #[must_use]
    pub fn new(kind: FormKind, name_style: NameStyle) -> Self {
        Self { kind, name_style }
    }

    #[must_use]
    pub fn workshop() -> Self {
        Self::new(FormKind::Workshop, NameStyle::Split)
    }

    #[must_use]
    pub fn corporate() -> Self {
        Self::new(FormKind::Corporate, NameStyle::Split)
    }

    /// Required inputs in the order they appear on the form, checkbox group last.
    #[must_use]
    pub fn required_fields(&self) -> Vec<Field> {
        let mut fields = match self.name_style {
            NameStyle::Split => vec![Field::FirstName, Field::LastName],
            NameStyle::Single => vec![Field::Name],
        };
        if self.kind == FormKind::Corporate {
            fields.push(Field::Organization);
        }
        fields.push(Field::Email);
        fields.push(self.kind.required_group());
        fields
    }
}

/// Values and error display state of one form instance.
#[derive(Debug, Clone)]
pub struct FormState {
    layout: FormLayout,
    entries: Vec<(Field, String)>,
    errors: BTreeMap<Field, FieldError>,
}

impl FormState {
    /// An empty form.
    #[must_use]
    pub fn new(layout: FormLayout) -> Self {
        Self {
            layout,
            entries: Vec::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Replace a field's value. Any error shown on the field is cleared
    /// immediately; it is not re-validated until blur or submit.
    pub fn set_text(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter().position(|(f, _)| *f == field) {
            Some(pos) => {
                self.entries[pos].1 = value;
                let mut idx = pos + 1;
                while idx < self.entries.len() {
                    if self.entries[idx].0 == field {
                        self.entries.remove(idx);
                    } else {
                        idx += 1;
                    }
                }
            }
            None => self.entries.push((field, value)),
        }
        self.errors.remove(&field);
    }

    /// Check an option in a checkbox group. Checking twice is a no-op.
    pub fn check(&mut self, group: Field, option: impl Into<String>) {
        let option = option.into();
        if !self.entries.iter().any(|(f, v)| *f == group && *v == option) {
            self.entries.push((group, option));
        }
        self.errors.remove(&group);
    }

    /// Uncheck an option in a checkbox group.
    pub fn uncheck(&mut self, group: Field, option: &str) {
        self.entries.retain(|(f, v)| !(*f == group && v == option));
        self.errors.remove(&group);
    }

    /// Current value of a text field; empty if never set.
    #[must_use]
    pub fn text(&self, field: Field) -> &str {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map_or("", |(_, v)| v.as_str())
    }

    /// Checked options of a group, in the order they were checked.
    #[must_use]
    pub fn selected(&self, group: Field) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(f, _)| *f == group)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Validate a single field without touching the others.
    ///
    /// # Errors
    ///
    /// Returns the [`FieldError`] the field currently violates.
    pub fn check_field(&self, field: Field) -> Result<(), FieldError> {
        match field {
            Field::Name | Field::FirstName | Field::LastName => {
                validate::validate_name(field, self.text(field))
            }
            Field::Organization => validate::validate_organization(self.text(field)),
            Field::Email => validate::validate_email(self.text(field)),
            Field::Role | Field::Interest => {
                validate::validate_selection(field, &self.selected(field))
            }
            _ => Ok(()),
        }
    }

    /// Focus left a field: re-validate it and update its error display.
    pub fn blur(&mut self, field: Field) -> Option<&FieldError> {
        self.record(field);
        self.errors.get(&field)
    }

    /// Validate every required field of the layout.
    ///
    /// All errors are recorded for display.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field in form order, which is the one to focus.
    pub fn validate_all(&mut self) -> Result<(), Field> {
        let mut first_invalid = None;
        for field in self.layout.required_fields() {
            if !self.record(field) && first_invalid.is_none() {
                first_invalid = Some(field);
            }
        }
        first_invalid.map_or(Ok(()), Err)
    }

    /// Errors currently displayed, keyed by field.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<Field, FieldError> {
        &self.errors
    }

    #[must_use]
    pub fn error(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// Whether the hidden honeypot input has been filled in.
    #[must_use]
    pub fn is_bot(&self) -> bool {
        !self.text(Field::Website).is_empty()
    }

    /// Entries as `(name, value)` pairs, in form order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, v)| (f.name(), v.as_str()))
    }

    /// The JSON payload this form would submit.
    #[must_use]
    pub fn payload(&self) -> Payload {
        assemble(self.entries())
    }

    /// Clear all values and errors.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.errors.clear();
    }

    fn record(&mut self, field: Field) -> bool {
        match self.check_field(field) {
            Ok(()) => {
                self.errors.remove(&field);
                true
            }
            Err(err) => {
                self.errors.insert(field, err);
                false
            }
        }
    }
}

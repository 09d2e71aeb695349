//! Pure field validators.
//!
//! Shared by the form state (client side) and the submission pipeline
//! (server side) so both ends apply the same e-mail rule.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldError;
use crate::form::Field;

/// Minimum trimmed length of a name part.
pub const MIN_NAME_LEN: usize = 2;

/// `local@domain.tld`: no whitespace, exactly one `@`, a dot inside the domain.
#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid literal")
});

/// Whether `value` matches the basic e-mail pattern. The value is not trimmed.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Validate a name-like field (`name`, `first-name`, `last-name`).
///
/// # Errors
///
/// [`FieldError::Required`] when blank, [`FieldError::TooShort`] when the
/// trimmed value has fewer than [`MIN_NAME_LEN`] characters.
pub fn validate_name(field: Field, value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required(field));
    }
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(FieldError::TooShort {
            field,
            min: MIN_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate the organization field of the corporate form.
///
/// # Errors
///
/// [`FieldError::Required`] when blank.
pub fn validate_organization(value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required(Field::Organization));
    }
    Ok(())
}

/// Validate an e-mail field.
///
/// # Errors
///
/// [`FieldError::Required`] when blank, [`FieldError::InvalidEmail`] when the
/// raw value fails the pattern.
pub fn validate_email(value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required(Field::Email));
    }
    if !is_valid_email(value) {
        return Err(FieldError::InvalidEmail);
    }
    Ok(())
}

/// Validate that a checkbox group has at least one option checked.
///
/// # Errors
///
/// [`FieldError::NothingSelected`] when `selected` is empty.
pub fn validate_selection<S: AsRef<str>>(group: Field, selected: &[S]) -> Result<(), FieldError> {
    if selected.is_empty() {
        return Err(FieldError::NothingSelected(group));
    }
    Ok(())
}

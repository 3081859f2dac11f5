//! Field-level validation shared by every rule module.

use thiserror::Error;

/// A single input field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Name of the offending field.
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Maximum length of names and titles.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of free-text descriptions.
pub const MAX_TEXT_LEN: usize = 10_000;

/// Trims a required text value and checks its length.
///
/// # Errors
///
/// Returns a `FieldError` if the trimmed value is empty or longer than `max_len`.
pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    if trimmed.chars().count() > max_len {
        return Err(FieldError::new(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Normalizes an optional text value: blank becomes `None`.
///
/// # Errors
///
/// Returns a `FieldError` if the value is longer than `max_len`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, FieldError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => require_text(field, v, max_len).map(Some),
    }
}

//! Retention policy validation.

use super::error::ContextError;
use crate::gdpr::DeletionMethod;
use crate::validation::{MAX_NAME_LEN, MAX_TEXT_LEN, optional_text, require_text};

/// Raw retention policy fields.
#[derive(Debug, Clone, Copy)]
pub struct RetentionDraft<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub retention_period_days: Option<i32>,
    pub retention_criteria: Option<&'a str>,
    pub deletion_method: &'a str,
    pub legal_reference: Option<&'a str>,
}

/// Retention policy fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRetention {
    pub name: String,
    pub description: Option<String>,
    pub retention_period_days: Option<i32>,
    pub retention_criteria: Option<String>,
    pub deletion_method: DeletionMethod,
    pub legal_reference: Option<String>,
}

/// Validates retention policy fields.
///
/// A policy states how long data is kept: a positive number of days,
/// free-text criteria, or both.
///
/// # Errors
///
/// Returns `RetentionUndefined`, `NonPositivePeriod` or a field error.
pub fn validate_retention(draft: &RetentionDraft<'_>) -> Result<ValidatedRetention, ContextError> {
    let retention_criteria =
        optional_text("retention_criteria", draft.retention_criteria, MAX_TEXT_LEN)?;

    match (draft.retention_period_days, &retention_criteria) {
        (None, None) => return Err(ContextError::RetentionUndefined),
        (Some(days), _) if days <= 0 => return Err(ContextError::NonPositivePeriod(days)),
        _ => {}
    }

    Ok(ValidatedRetention {
        name: require_text("name", draft.name, MAX_NAME_LEN)?,
        description: optional_text("description", draft.description, MAX_TEXT_LEN)?,
        retention_period_days: draft.retention_period_days,
        retention_criteria,
        deletion_method: draft.deletion_method.parse()?,
        legal_reference: optional_text("legal_reference", draft.legal_reference, MAX_TEXT_LEN)?,
    })
}

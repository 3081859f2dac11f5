//! Per-section answer validation.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::error::DpiaError;
use super::template::{FieldType, TemplateField, TemplateSection};
use crate::validation::{FieldError, MAX_TEXT_LEN};

/// Answers keyed by field id.
pub type Answers = Map<String, Value>;

/// Validates answers for one section and returns them normalized.
///
/// Strings are trimmed, blank and `null` answers are dropped. Every failing
/// field is reported, each with the template's validation message when it
/// has one.
///
/// # Errors
///
/// Returns `DpiaError::InvalidAnswers` listing the failing fields.
pub fn validate_section(section: &TemplateSection, answers: &Answers) -> Result<Answers, DpiaError> {
    let mut errors = Vec::new();
    let mut cleaned = Answers::new();

    for key in answers.keys() {
        if section.field(key).is_none() {
            errors.push(FieldError::new(key.as_str(), "is not part of this section"));
        }
    }

    for field in &section.fields {
        let value = answers.get(&field.id).and_then(normalize);
        match value {
            None if field.required => errors.push(rejection(field, "is required")),
            None => {}
            Some(value) => match check_value(field, value) {
                Ok(value) => {
                    cleaned.insert(field.id.clone(), value);
                }
                Err(reason) => errors.push(rejection(field, reason)),
            },
        }
    }

    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(DpiaError::InvalidAnswers {
            section: section.id.clone(),
            errors,
        })
    }
}

/// Trims strings; maps null, blank strings and empty arrays to `None`.
fn normalize(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
        }
        Value::Array(items) if items.is_empty() => None,
        other => Some(other.clone()),
    }
}

fn check_value(field: &TemplateField, value: Value) -> Result<Value, &'static str> {
    match (field.field_type, value) {
        (FieldType::Text | FieldType::Textarea, Value::String(s)) => {
            if s.chars().count() > MAX_TEXT_LEN {
                Err("is too long")
            } else {
                Ok(Value::String(s))
            }
        }
        (FieldType::Select, Value::String(s)) => {
            if field.allows(&s) {
                Ok(Value::String(s))
            } else {
                Err("is not one of the allowed options")
            }
        }
        (FieldType::Multiselect, Value::Array(items)) => {
            let mut picked: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if !item.as_str().is_some_and(|s| field.allows(s)) {
                    return Err("contains a value that is not an allowed option");
                }
                if !picked.contains(&item) {
                    picked.push(item);
                }
            }
            Ok(Value::Array(picked))
        }
        (FieldType::Checkbox, Value::Bool(checked)) => {
            if field.required && !checked {
                Err("must be checked")
            } else {
                Ok(Value::Bool(checked))
            }
        }
        (FieldType::Number, Value::Number(n)) => Ok(Value::Number(n)),
        (FieldType::Date, Value::String(s)) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(|_| Value::String(s))
            .map_err(|_| "must be a date (YYYY-MM-DD)"),
        (FieldType::Text | FieldType::Textarea | FieldType::Select | FieldType::Date, _) => {
            Err("must be a string")
        }
        (FieldType::Multiselect, _) => Err("must be a list"),
        (FieldType::Checkbox, _) => Err("must be true or false"),
        (FieldType::Number, _) => Err("must be a number"),
    }
}

fn rejection(field: &TemplateField, fallback: &str) -> FieldError {
    FieldError::new(
        field.id.as_str(),
        field
            .validation_message
            .clone()
            .unwrap_or_else(|| fallback.to_string()),
    )
}

//! Physical locations and jurisdiction codes.

use super::error::ContextError;
use crate::validation::{MAX_NAME_LEN, MAX_TEXT_LEN, optional_text, require_text};

/// Raw location fields.
#[derive(Debug, Clone, Copy)]
pub struct LocationDraft<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
}

/// Location fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLocation {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Validates location fields.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_location(draft: &LocationDraft<'_>) -> Result<ValidatedLocation, ContextError> {
    Ok(ValidatedLocation {
        name: require_text("name", draft.name, MAX_NAME_LEN)?,
        description: optional_text("description", draft.description, MAX_TEXT_LEN)?,
        address: optional_text("address", draft.address, MAX_TEXT_LEN)?,
        city: optional_text("city", draft.city, MAX_NAME_LEN)?,
    })
}

/// Normalizes an ISO 3166-1 alpha-2 code to upper case.
///
/// # Errors
///
/// Returns `InvalidCountryCode` unless the trimmed input is two ASCII letters.
pub fn normalize_country_code(code: &str) -> Result<String, ContextError> {
    let trimmed = code.trim();
    if trimmed.len() == 2 && trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(ContextError::InvalidCountryCode(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("de", "DE")]
    #[case(" Fr ", "FR")]
    #[case("US", "US")]
    fn test_country_code_normalized(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_country_code(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("D")]
    #[case("DEU")]
    #[case("D1")]
    #[case("ÄÖ")]
    fn test_country_code_rejected(#[case] input: &str) {
        assert!(matches!(
            normalize_country_code(input),
            Err(ContextError::InvalidCountryCode(_))
        ));
    }

    #[test]
    fn test_location_requires_name() {
        let draft = LocationDraft {
            name: "",
            description: None,
            address: None,
            city: Some("Berlin"),
        };
        assert!(matches!(
            validate_location(&draft),
            Err(ContextError::Field(_))
        ));
    }
}

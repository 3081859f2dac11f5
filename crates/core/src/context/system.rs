//! System and endpoint validation.

use super::error::ContextError;
use crate::gdpr::{Criticality, EndpointType, SystemStatus, SystemType};
use crate::validation::{MAX_NAME_LEN, MAX_TEXT_LEN, optional_text, require_text};

/// Raw system fields.
#[derive(Debug, Clone, Copy)]
pub struct SystemDraft<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub system_type: &'a str,
    pub owner: Option<&'a str>,
    pub criticality: &'a str,
    pub status: &'a str,
}

/// System fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSystem {
    pub name: String,
    pub description: Option<String>,
    pub system_type: SystemType,
    pub owner: Option<String>,
    pub criticality: Criticality,
    pub status: SystemStatus,
}

/// Validates system fields.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_system(draft: &SystemDraft<'_>) -> Result<ValidatedSystem, ContextError> {
    Ok(ValidatedSystem {
        name: require_text("name", draft.name, MAX_NAME_LEN)?,
        description: optional_text("description", draft.description, MAX_TEXT_LEN)?,
        system_type: draft.system_type.parse()?,
        owner: optional_text("owner", draft.owner, MAX_NAME_LEN)?,
        criticality: draft.criticality.parse()?,
        status: draft.status.parse()?,
    })
}

/// Validates endpoint fields.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_endpoint(
    name: &str,
    endpoint_type: &str,
    url: Option<&str>,
) -> Result<(String, EndpointType, Option<String>), ContextError> {
    Ok((
        require_text("name", name, MAX_NAME_LEN)?,
        endpoint_type.parse()?,
        optional_text("url", url, MAX_TEXT_LEN)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_system() {
        let validated = validate_system(&SystemDraft {
            name: "HRIS",
            description: Some(""),
            system_type: "saas",
            owner: Some("People Ops"),
            criticality: "high",
            status: "active",
        })
        .unwrap();
        assert_eq!(validated.system_type, SystemType::Saas);
        assert!(validated.description.is_none());
    }

    #[test]
    fn test_unknown_criticality() {
        let result = validate_system(&SystemDraft {
            name: "HRIS",
            description: None,
            system_type: "saas",
            owner: None,
            criticality: "extreme",
            status: "active",
        });
        assert!(matches!(result, Err(ContextError::UnknownValue(_))));
    }

    #[test]
    fn test_endpoint() {
        let (name, kind, url) = validate_endpoint("Payroll API", "api", Some(" ")).unwrap();
        assert_eq!(name, "Payroll API");
        assert_eq!(kind, EndpointType::Api);
        assert!(url.is_none());
        assert!(validate_endpoint(" ", "api", None).is_err());
    }
}

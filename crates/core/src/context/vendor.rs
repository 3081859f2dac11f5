//! Vendor and contract validation.

use chrono::NaiveDate;

use super::error::ContextError;
use crate::gdpr::{ContractType, VendorRole, VendorStatus};
use crate::validation::{FieldError, MAX_NAME_LEN, MAX_TEXT_LEN, optional_text, require_text};

/// Raw vendor fields.
#[derive(Debug, Clone, Copy)]
pub struct VendorDraft<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub website: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub vendor_role: &'a str,
    pub status: &'a str,
}

/// Vendor fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedVendor {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub vendor_role: VendorRole,
    pub status: VendorStatus,
}

/// Raw contract fields.
#[derive(Debug, Clone, Copy)]
pub struct ContractDraft<'a> {
    pub contract_type: &'a str,
    pub title: &'a str,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub review_date: Option<NaiveDate>,
}

/// Contract fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContract {
    pub contract_type: ContractType,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub review_date: Option<NaiveDate>,
}

/// Validates vendor fields.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_vendor(draft: &VendorDraft<'_>) -> Result<ValidatedVendor, ContextError> {
    let contact_email = optional_text("contact_email", draft.contact_email, MAX_NAME_LEN)?;
    if let Some(email) = &contact_email
        && !looks_like_email(email)
    {
        return Err(FieldError::new("contact_email", "must be an email address").into());
    }

    Ok(ValidatedVendor {
        name: require_text("name", draft.name, MAX_NAME_LEN)?,
        description: optional_text("description", draft.description, MAX_TEXT_LEN)?,
        website: optional_text("website", draft.website, MAX_NAME_LEN)?,
        contact_email,
        vendor_role: draft.vendor_role.parse()?,
        status: draft.status.parse()?,
    })
}

/// Validates contract fields.
///
/// # Errors
///
/// Returns `ContractDatesOutOfOrder` when the end date precedes the start.
pub fn validate_contract(draft: &ContractDraft<'_>) -> Result<ValidatedContract, ContextError> {
    validate_contract_dates(draft.start_date, draft.end_date)?;

    Ok(ValidatedContract {
        contract_type: draft.contract_type.parse()?,
        title: require_text("title", draft.title, MAX_NAME_LEN)?,
        start_date: draft.start_date,
        end_date: draft.end_date,
        review_date: draft.review_date,
    })
}

/// An end date, when present, must not precede the start date.
///
/// # Errors
///
/// Returns `ContractDatesOutOfOrder`.
pub fn validate_contract_dates(
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<(), ContextError> {
    match end {
        Some(end) if end < start => Err(ContextError::ContractDatesOutOfOrder { start, end }),
        _ => Ok(()),
    }
}

fn looks_like_email(value: &str) -> bool {
    value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn vendor<'a>(email: Option<&'a str>) -> VendorDraft<'a> {
        VendorDraft {
            name: " Acme Cloud ",
            description: None,
            website: Some("https://acme.example"),
            contact_email: email,
            vendor_role: "processor",
            status: "active",
        }
    }

    #[test]
    fn test_valid_vendor() {
        let validated = validate_vendor(&vendor(Some("dpo@acme.example"))).unwrap();
        assert_eq!(validated.name, "Acme Cloud");
        assert_eq!(validated.vendor_role, VendorRole::Processor);
    }

    #[test]
    fn test_bad_email() {
        assert!(matches!(
            validate_vendor(&vendor(Some("not-an-email"))),
            Err(ContextError::Field(_))
        ));
    }

    #[test]
    fn test_unknown_role() {
        let draft = VendorDraft {
            vendor_role: "supplier",
            ..vendor(None)
        };
        assert!(matches!(
            validate_vendor(&draft),
            Err(ContextError::UnknownValue(_))
        ));
    }

    #[test]
    fn test_contract_dates() {
        let draft = ContractDraft {
            contract_type: "dpa",
            title: "Data processing agreement",
            start_date: date(2026, 1, 1),
            end_date: Some(date(2025, 12, 31)),
            review_date: None,
        };
        assert!(matches!(
            validate_contract(&draft),
            Err(ContextError::ContractDatesOutOfOrder { .. })
        ));

        let same_day = ContractDraft {
            end_date: Some(date(2026, 1, 1)),
            ..draft
        };
        assert_eq!(
            validate_contract(&same_day).unwrap().contract_type,
            ContractType::Dpa
        );
    }
}

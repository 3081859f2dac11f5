//! Processing activity validation.

use chrono::NaiveDate;

use super::error::ActivityError;
use super::types::{ActivityDraft, ValidatedActivity};
use crate::gdpr::{LawfulBasis, ProcessingStatus};
use crate::validation::{FieldError, MAX_NAME_LEN, MAX_TEXT_LEN, optional_text, require_text};

/// Maximum number of data subject types on one record.
pub const MAX_SUBJECT_TYPES: usize = 50;

/// Processing activity rules.
pub struct ProcessingActivityService;

impl ProcessingActivityService {
    /// Validates a complete set of activity fields.
    ///
    /// # Errors
    ///
    /// Returns the first rule the draft violates.
    pub fn validate(draft: &ActivityDraft<'_>) -> Result<ValidatedActivity, ActivityError> {
        let name = require_text("name", draft.name, MAX_NAME_LEN)?;
        let description = optional_text("description", draft.description, MAX_TEXT_LEN)?;
        let purpose = require_text("purpose", draft.purpose, MAX_TEXT_LEN)?;
        let status: ProcessingStatus = draft.status.parse()?;
        let (lawful_basis, legitimate_interest_assessment) =
            Self::validate_lawful_basis(draft.lawful_basis, draft.legitimate_interest_assessment)?;
        Self::validate_review_dates(draft.last_reviewed_at, draft.next_review_date)?;
        let data_subject_types = Self::normalize_subject_types(draft.data_subject_types)?;

        Ok(ValidatedActivity {
            name,
            description,
            purpose,
            lawful_basis,
            legitimate_interest_assessment,
            status,
            data_subject_types,
        })
    }

    /// Parses the basis; legitimate interests needs a non-empty assessment.
    ///
    /// The assessment is dropped for every other basis.
    ///
    /// # Errors
    ///
    /// Returns `UnknownValue` or `MissingLegitimateInterestAssessment`.
    pub fn validate_lawful_basis(
        basis: &str,
        assessment: Option<&str>,
    ) -> Result<(LawfulBasis, Option<String>), ActivityError> {
        let basis: LawfulBasis = basis.parse()?;
        let assessment = optional_text("legitimate_interest_assessment", assessment, MAX_TEXT_LEN)?;

        match (basis, assessment) {
            (LawfulBasis::LegitimateInterests, None) => {
                Err(ActivityError::MissingLegitimateInterestAssessment)
            }
            (LawfulBasis::LegitimateInterests, Some(text)) => Ok((basis, Some(text))),
            (other, _) => Ok((other, None)),
        }
    }

    /// Next review must come after the last one when both are set.
    ///
    /// # Errors
    ///
    /// Returns `ReviewDatesOutOfOrder`.
    pub fn validate_review_dates(
        last: Option<NaiveDate>,
        next: Option<NaiveDate>,
    ) -> Result<(), ActivityError> {
        match (last, next) {
            (Some(last), Some(next)) if next <= last => {
                Err(ActivityError::ReviewDatesOutOfOrder { last, next })
            }
            _ => Ok(()),
        }
    }

    /// Whether a scheduled review lies strictly in the past.
    #[must_use]
    pub fn is_review_overdue(next_review_date: Option<NaiveDate>, today: NaiveDate) -> bool {
        next_review_date.is_some_and(|next| next < today)
    }

    fn normalize_subject_types(types: &[String]) -> Result<Vec<String>, ActivityError> {
        if types.len() > MAX_SUBJECT_TYPES {
            return Err(FieldError::new(
                "data_subject_types",
                format!("at most {MAX_SUBJECT_TYPES} entries"),
            )
            .into());
        }

        let mut normalized: Vec<String> = Vec::with_capacity(types.len());
        for raw in types {
            let value = require_text("data_subject_types", raw, MAX_NAME_LEN)?;
            if !normalized.contains(&value) {
                normalized.push(value);
            }
        }
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft<'a>(basis: &'a str, lia: Option<&'a str>, subjects: &'a [String]) -> ActivityDraft<'a> {
        ActivityDraft {
            name: "Payroll",
            description: Some("Monthly salary run"),
            purpose: "Pay employees",
            lawful_basis: basis,
            legitimate_interest_assessment: lia,
            status: "active",
            data_subject_types: subjects,
            last_reviewed_at: None,
            next_review_date: None,
        }
    }

    #[test]
    fn test_valid_activity() {
        let subjects = vec!["employees".to_string(), " employees ".to_string()];
        let validated =
            ProcessingActivityService::validate(&draft("contract", None, &subjects)).unwrap();
        assert_eq!(validated.lawful_basis, LawfulBasis::Contract);
        assert_eq!(validated.status, ProcessingStatus::Active);
        assert_eq!(validated.data_subject_types, vec!["employees".to_string()]);
    }

    #[test]
    fn test_legitimate_interests_requires_assessment() {
        assert!(matches!(
            ProcessingActivityService::validate(&draft("legitimate_interests", None, &[])),
            Err(ActivityError::MissingLegitimateInterestAssessment)
        ));
        assert!(matches!(
            ProcessingActivityService::validate(&draft("legitimate_interests", Some(" "), &[])),
            Err(ActivityError::MissingLegitimateInterestAssessment)
        ));

        let ok = ProcessingActivityService::validate(&draft(
            "legitimate_interests",
            Some("Balancing test on file"),
            &[],
        ))
        .unwrap();
        assert_eq!(
            ok.legitimate_interest_assessment.as_deref(),
            Some("Balancing test on file")
        );
    }

    #[test]
    fn test_assessment_dropped_for_other_bases() {
        let validated =
            ProcessingActivityService::validate(&draft("consent", Some("irrelevant"), &[]))
                .unwrap();
        assert!(validated.legitimate_interest_assessment.is_none());
    }

    #[test]
    fn test_unknown_basis_rejected() {
        assert!(matches!(
            ProcessingActivityService::validate(&draft("because", None, &[])),
            Err(ActivityError::UnknownValue(_))
        ));
    }

    #[test]
    fn test_review_dates() {
        assert!(
            ProcessingActivityService::validate_review_dates(
                Some(date(2026, 1, 1)),
                Some(date(2026, 7, 1))
            )
            .is_ok()
        );
        assert!(matches!(
            ProcessingActivityService::validate_review_dates(
                Some(date(2026, 7, 1)),
                Some(date(2026, 7, 1))
            ),
            Err(ActivityError::ReviewDatesOutOfOrder { .. })
        ));
        assert!(ProcessingActivityService::validate_review_dates(None, Some(date(2020, 1, 1))).is_ok());
    }

    #[test]
    fn test_review_overdue() {
        let today = date(2026, 10, 18);
        assert!(ProcessingActivityService::is_review_overdue(
            Some(date(2026, 10, 17)),
            today
        ));
        assert!(!ProcessingActivityService::is_review_overdue(
            Some(today),
            today
        ));
        assert!(!ProcessingActivityService::is_review_overdue(None, today));
    }

    #[test]
    fn test_too_many_subject_types() {
        let subjects: Vec<String> = (0..=MAX_SUBJECT_TYPES).map(|i| format!("s{i}")).collect();
        assert!(matches!(
            ProcessingActivityService::validate(&draft("contract", None, &subjects)),
            Err(ActivityError::Field(_))
        ));
    }
}

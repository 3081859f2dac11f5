//! Data category validation.

use super::error::CategoryError;
use super::types::{CategoryDraft, ValidatedCategory};
use crate::gdpr::{DataCategoryType, SensitivityLevel, SpecialCategoryBasis};
use crate::validation::{MAX_NAME_LEN, MAX_TEXT_LEN, optional_text, require_text};

/// Data category rules.
pub struct DataCategoryService;

impl DataCategoryService {
    /// Validates a complete set of category fields.
    ///
    /// On update the caller merges stored values with the changes first, so
    /// the special-basis rule is always checked against the final state.
    ///
    /// # Errors
    ///
    /// Returns the first rule the draft violates.
    pub fn validate(draft: &CategoryDraft<'_>) -> Result<ValidatedCategory, CategoryError> {
        let name = require_text("name", draft.name, MAX_NAME_LEN)?;
        let description = optional_text("description", draft.description, MAX_TEXT_LEN)?;
        let category_type: DataCategoryType = draft.category_type.parse()?;
        let sensitivity_level: SensitivityLevel = draft.sensitivity_level.parse()?;
        let special_category_basis =
            Self::validate_special_basis(category_type, draft.special_category_basis)?;

        Ok(ValidatedCategory {
            name,
            description,
            category_type,
            sensitivity_level,
            special_category_basis,
        })
    }

    /// A special category must name an Article 9 basis; any other type must not.
    ///
    /// Blank strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns `MissingSpecialBasis`, `UnexpectedSpecialBasis` or
    /// `UnknownValue` for an unrecognised basis.
    pub fn validate_special_basis(
        category_type: DataCategoryType,
        basis: Option<&str>,
    ) -> Result<Option<SpecialCategoryBasis>, CategoryError> {
        let basis = basis.map(str::trim).filter(|b| !b.is_empty());

        match (category_type, basis) {
            (DataCategoryType::Special, None) => Err(CategoryError::MissingSpecialBasis),
            (DataCategoryType::Special, Some(raw)) => Ok(Some(raw.parse()?)),
            (_, None) => Ok(None),
            (other, Some(_)) => Err(CategoryError::UnexpectedSpecialBasis(other)),
        }
    }
}

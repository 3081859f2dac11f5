//! Data category error types.

use thiserror::Error;

use crate::gdpr::{DataCategoryType, UnknownValue};
use crate::validation::FieldError;
use dataguard_shared::types::DataCategoryId;

/// Data category rule violations.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// A field failed shape validation.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// An enumerated field carried an unknown value.
    #[error(transparent)]
    UnknownValue(#[from] UnknownValue),

    /// Special category data without an Article 9 basis.
    #[error("Special category data requires a special category legal basis")]
    MissingSpecialBasis,

    /// A non-special category carrying an Article 9 basis.
    #[error("Only special category data may carry a special category basis (type is {0})")]
    UnexpectedSpecialBasis(DataCategoryType),

    /// A category named as its own parent.
    #[error("A data category cannot be its own parent")]
    SelfParent,

    /// The new parent is a descendant of the category.
    #[error("Moving category {category} under {new_parent} would create a circular hierarchy")]
    CircularHierarchy {
        /// Category being moved.
        category: DataCategoryId,
        /// Requested parent.
        new_parent: DataCategoryId,
    },
}

//! Processing activity error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::gdpr::UnknownValue;
use crate::validation::FieldError;

/// Processing activity rule violations.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// A field failed shape validation.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// An enumerated field carried an unknown value.
    #[error(transparent)]
    UnknownValue(#[from] UnknownValue),

    /// Legitimate interests chosen without a balancing test.
    #[error("Legitimate interests requires a legitimate interest assessment")]
    MissingLegitimateInterestAssessment,

    /// Next review scheduled before the last one.
    #[error("Next review date {next} must be after last review {last}")]
    ReviewDatesOutOfOrder {
        /// Last completed review.
        last: NaiveDate,
        /// Scheduled review.
        next: NaiveDate,
    },
}

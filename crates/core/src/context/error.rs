//! Error types for the context registers.

use chrono::NaiveDate;
use thiserror::Error;

use crate::gdpr::UnknownValue;
use crate::validation::FieldError;

/// Rule violations in vendors, systems, locations and retention policies.
#[derive(Debug, Error)]
pub enum ContextError {
    /// A field failed shape validation.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// An enumerated field carried an unknown value.
    #[error(transparent)]
    UnknownValue(#[from] UnknownValue),

    /// Contract ends before it starts.
    #[error("Contract end date {end} is before start date {start}")]
    ContractDatesOutOfOrder {
        /// Contract start.
        start: NaiveDate,
        /// Contract end.
        end: NaiveDate,
    },

    /// Neither a retention period nor criteria were given.
    #[error("A retention policy needs a retention period or retention criteria")]
    RetentionUndefined,

    /// Retention period of zero or fewer days.
    #[error("Retention period must be positive, got {0} days")]
    NonPositivePeriod(i32),

    /// Not an ISO 3166-1 alpha-2 code.
    #[error("Invalid country code '{0}'")]
    InvalidCountryCode(String),
}

//! Data flow error types.

use thiserror::Error;

use crate::gdpr::UnknownValue;
use crate::validation::FieldError;

/// Which end of an edge failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSide {
    /// Where data comes from.
    Source,
    /// Where data goes.
    Destination,
}

impl std::fmt::Display for EdgeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Destination => "destination",
        })
    }
}

/// Data flow rule violations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A field failed shape validation.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// An enumerated field carried an unknown value.
    #[error(transparent)]
    UnknownValue(#[from] UnknownValue),

    /// Zero or two endpoints were given for one side.
    #[error("An edge must have exactly one {0} (system or vendor)")]
    EndpointCount(EdgeSide),

    /// Source and destination are the same endpoint.
    #[error("An edge cannot start and end at the same endpoint")]
    SelfLoop,

    /// Negative sequence number.
    #[error("Edge sequence must not be negative")]
    NegativeSequence,

    /// Another edge of the flow uses the sequence number.
    #[error("Edge sequence {0} is already used in this flow")]
    DuplicateSequence(i32),

    /// Exporter and importer jurisdictions are identical.
    #[error("Exporter and importer jurisdictions must differ")]
    SameJurisdiction,

    /// Adequacy decision chosen for an importer without one.
    #[error("Importer jurisdiction has no adequacy decision; choose another transfer mechanism")]
    AdequacyNotAvailable,
}

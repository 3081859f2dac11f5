//! Data flows: edge endpoint rules and cross-border transfers.

pub mod edge;
pub mod error;
pub mod transfer;

pub use edge::{EdgeEndpoint, EdgeEndpoints, next_sequence, validate_edge_sequence};
pub use error::{EdgeSide, FlowError};
pub use transfer::{JurisdictionFacts, TransferAssessment, validate_transfer};

use crate::gdpr::DataFlowStatus;
use crate::validation::{MAX_NAME_LEN, MAX_TEXT_LEN, optional_text, require_text};

/// Validates the header fields of a data flow.
///
/// # Errors
///
/// Returns a `FlowError` for a blank name, overlong text or unknown status.
pub fn validate_flow(
    name: &str,
    description: Option<&str>,
    status: &str,
) -> Result<(String, Option<String>, DataFlowStatus), FlowError> {
    let name = require_text("name", name, MAX_NAME_LEN)?;
    let description = optional_text("description", description, MAX_TEXT_LEN)?;
    let status = status.parse()?;
    Ok((name, description, status))
}

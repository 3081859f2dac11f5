//! Data flow edge endpoints and ordering.

use serde::Serialize;
use uuid::Uuid;

use super::error::{EdgeSide, FlowError};
use dataguard_shared::types::{SystemId, VendorId};

/// One end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EdgeEndpoint {
    /// Internal system.
    System(SystemId),
    /// External vendor.
    Vendor(VendorId),
}

/// Nullable endpoint columns exactly as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeEndpoints {
    /// Source system column.
    pub source_system_id: Option<Uuid>,
    /// Source vendor column.
    pub source_vendor_id: Option<Uuid>,
    /// Destination system column.
    pub destination_system_id: Option<Uuid>,
    /// Destination vendor column.
    pub destination_vendor_id: Option<Uuid>,
}

impl EdgeEndpoints {
    /// Validated `(source, destination)` pair.
    ///
    /// # Errors
    ///
    /// Returns `EndpointCount` unless each side has exactly one non-null
    /// column, and `SelfLoop` if both sides name the same endpoint.
    pub fn resolve(&self) -> Result<(EdgeEndpoint, EdgeEndpoint), FlowError> {
        let source = side(EdgeSide::Source, self.source_system_id, self.source_vendor_id)?;
        let destination = side(
            EdgeSide::Destination,
            self.destination_system_id,
            self.destination_vendor_id,
        )?;

        if source == destination {
            return Err(FlowError::SelfLoop);
        }

        Ok((source, destination))
    }
}

fn side(
    which: EdgeSide,
    system: Option<Uuid>,
    vendor: Option<Uuid>,
) -> Result<EdgeEndpoint, FlowError> {
    match (system, vendor) {
        (Some(id), None) => Ok(EdgeEndpoint::System(SystemId::from_uuid(id))),
        (None, Some(id)) => Ok(EdgeEndpoint::Vendor(VendorId::from_uuid(id))),
        _ => Err(FlowError::EndpointCount(which)),
    }
}

/// Checks a sequence number against those already used in the flow.
///
/// # Errors
///
/// Returns `NegativeSequence` or `DuplicateSequence`.
pub fn validate_edge_sequence(existing: &[i32], sequence: i32) -> Result<(), FlowError> {
    if sequence < 0 {
        return Err(FlowError::NegativeSequence);
    }
    if existing.contains(&sequence) {
        return Err(FlowError::DuplicateSequence(sequence));
    }
    Ok(())
}

/// Next free sequence number after the highest one in use.
#[must_use]
pub fn next_sequence(existing: &[i32]) -> i32 {
    existing.iter().max().map_or(0, |max| max.saturating_add(1))
}

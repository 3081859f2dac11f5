//! `SeaORM` entity models.
//!
//! Enumerated columns are stored as strings and parsed through the
//! `dataguard_core::gdpr` vocabulary, which keeps the schema portable
//! between `PostgreSQL` and `SQLite`.

pub mod activity_data_categories;
pub mod activity_data_flows;
pub mod activity_retention_policies;
pub mod activity_systems;
pub mod activity_vendors;
pub mod cross_border_transfers;
pub mod data_categories;
pub mod data_flow_edge_categories;
pub mod data_flow_edges;
pub mod data_flows;
pub mod dpia_assessments;
pub mod jurisdictions;
pub mod physical_locations;
pub mod processing_activities;
pub mod retention_policies;
pub mod system_endpoints;
pub mod system_locations;
pub mod systems;
pub mod vendor_contracts;
pub mod vendor_locations;
pub mod vendors;

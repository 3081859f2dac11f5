//! Repository abstractions for data access.
//!
//! Every tenant repository is bound to one `TenantScope` and filters each
//! query by tenant and workspace; soft-deleted rows are never returned.

pub mod data_category;
pub mod data_flow;
pub mod dpia;
pub mod jurisdiction;
pub mod location;
pub mod processing_activity;
pub mod retention_policy;
pub mod scope;
pub mod system;
pub mod vendor;

pub use data_category::{
    CreateDataCategoryInput, DataCategoryError, DataCategoryFilter, DataCategoryRepository,
    UpdateDataCategoryInput,
};
pub use data_flow::{
    CreateDataFlowInput, CreateEdgeInput, DataFlowDetails, DataFlowError, DataFlowFilter,
    DataFlowRepository, EdgeDetails, TransferInput, TransferRecord, UpdateDataFlowInput,
    UpdateEdgeInput,
};
pub use dpia::{CreateDpiaInput, DpiaFilter, DpiaRepoError, DpiaRepository, DpiaView};
pub use jurisdiction::{JurisdictionError, JurisdictionFilter, JurisdictionRepository};
pub use location::{
    CreateLocationInput, LocationError, LocationFilter, LocationRepository, UpdateLocationInput,
};
pub use processing_activity::{
    ActivityDetails, ActivityFilter, ActivityRepoError, CreateActivityInput, LinkKind,
    LinkedDataCategory, LinkedSystem, LinkedVendor, NewActivityLink, ProcessingActivityRepository,
    UpdateActivityInput,
};
pub use retention_policy::{
    CreateRetentionPolicyInput, RetentionPolicyError, RetentionPolicyFilter,
    RetentionPolicyRepository, UpdateRetentionPolicyInput,
};
pub use scope::{Scoped, SoftDeletable};
pub use system::{
    CreateEndpointInput, CreateSystemInput, SystemDetails, SystemError, SystemFilter,
    SystemRepository, UpdateSystemInput,
};
pub use vendor::{
    CreateContractInput, CreateVendorInput, UpdateContractInput, UpdateVendorInput, VendorDetails,
    VendorError, VendorFilter, VendorRepository,
};

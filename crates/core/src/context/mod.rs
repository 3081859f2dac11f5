//! Context registers: vendors, systems, physical locations and retention policies.

pub mod error;
pub mod location;
pub mod retention;
pub mod system;
pub mod vendor;

pub use error::ContextError;
pub use location::{LocationDraft, ValidatedLocation, normalize_country_code, validate_location};
pub use retention::{RetentionDraft, ValidatedRetention, validate_retention};
pub use system::{SystemDraft, ValidatedSystem, validate_endpoint, validate_system};
pub use vendor::{
    ContractDraft, ValidatedContract, ValidatedVendor, VendorDraft, validate_contract,
    validate_contract_dates, validate_vendor,
};

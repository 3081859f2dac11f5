//! GDPR vocabulary shared by every rule module.
//!
//! The enumerations here are the single source of truth for values that are
//! accepted on input and stored in the database.

pub mod vocabulary;

pub use vocabulary::{
    ActivitySystemRole, ContractType, Criticality, DataCategoryType, DataFlowStatus,
    DeletionMethod, DpiaStatus, EndpointType, LawfulBasis, ProcessingStatus, SensitivityLevel,
    SpecialCategoryBasis, SystemStatus, SystemType, TransferMechanism, UnknownValue, VendorRole,
    VendorStatus,
};

//! Data categories: Article 9 basis rule, hierarchy and statistics.

pub mod error;
pub mod hierarchy;
pub mod service;
pub mod types;

pub use error::CategoryError;
pub use hierarchy::CategoryTree;
pub use service::DataCategoryService;
pub use types::{
    CategoryDraft, CategoryStatistics, CategoryUsage, ValidatedCategory, percentage,
};

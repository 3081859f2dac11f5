//! Shared types, errors, and configuration for DataGuard.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and the tenant/workspace scope derived from them

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
mod jwt_tests;

pub use auth::{Claims, TenantScope, WorkspaceRole};
pub use config::{AppConfig, ComplianceConfig, LogFormat};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};

//! Core business rules for DataGuard.
//!
//! This crate contains pure GDPR business logic with ZERO web or database
//! dependencies. Validation rules, hierarchy checks and scoring live here.
//!
//! # Modules
//!
//! - `gdpr` - Enumerated GDPR vocabulary (bases, statuses, roles)
//! - `category` - Data categories, Art. 9 bases and hierarchy checks
//! - `activity` - Art. 30 processing records and compliance scoring
//! - `flow` - Data flow edges and cross-border transfers
//! - `context` - Vendors, systems, locations and retention policies
//! - `dpia` - DPIA template, answer validation and wizard

pub mod activity;
pub mod category;
pub mod context;
pub mod dpia;
pub mod flow;
pub mod gdpr;
pub mod validation;

//! Shared types and configuration for Leavewise.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - `Days`, the two-decimal day quantity used by every ledger counter
//! - Pagination types for list queries
//! - Configuration management

pub mod config;
pub mod types;

pub use config::{AppConfig, LeaveConfig, OverlapPolicySetting};

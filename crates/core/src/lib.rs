//! Core business logic for Leavewise.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and ledger arithmetic live here; the
//! `leavewise-db` crate wraps them in transactions.
//!
//! # Modules
//!
//! - `calendar` - Working-day counting
//! - `balance` - Ledger rows and the operations that mutate their counters
//! - `overlap` - Date-range intersection and the overlap policy
//! - `leave_type` - Leave type policy and registration rules
//! - `request` - Leave request lifecycle state machine
//! - `adjustment` - Balance adjustment approval workflow
//! - `policy` - Configurable business-rule toggles

pub mod adjustment;
pub mod balance;
pub mod calendar;
pub mod error;
pub mod leave_type;
pub mod overlap;
pub mod policy;
pub mod request;

pub use error::{ErrorKind, LeaveError};
pub use policy::LeavePolicy;

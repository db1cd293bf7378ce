//! Balance adjustment approval workflow.
//!
//! An adjustment proposes a signed change to a ledger row's `total_days`.
//! It starts `pending` and is decided once; only entering `approved` touches
//! the ledger.

pub mod service;
pub mod types;

pub use service::AdjustmentService;
pub use types::{
    AdjustmentDecision, AdjustmentOutcome, AdjustmentStatus, NewAdjustment, ValidatedAdjustment,
};

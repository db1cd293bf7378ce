//! Leave request lifecycle.
//!
//! Requests move through a fixed state machine:
//!
//! ```text
//! (new) ──reserve──▶ pending ──commit──▶ approved ──release_used──▶ cancelled
//!                       │                    (only before start date)
//!                       ├──release──▶ rejected
//!                       └──release──▶ cancelled
//! ```
//!
//! [`LifecycleService`] validates and plans each step. The plan names the
//! ledger operation to run; the storage layer executes it under a row lock.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::LifecycleService;
pub use types::{
    LeaveAction, LeaveRequestSnapshot, LeaveStatus, NewLeaveRequest, TransitionPlan,
    ValidatedLeaveRequest,
};

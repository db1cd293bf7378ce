//! Repository layer for database operations.
//!
//! Every mutating operation runs in its own transaction; see
//! [`BalanceLedger`](crate::ledger::BalanceLedger) for the locking rules.

pub mod adjustment;
pub mod balance;
pub mod leave_request;
pub mod leave_type;

pub use adjustment::AdjustmentRepository;
pub use balance::{LeaveBalanceRepository, YearInitialization};
pub use leave_request::{LeaveRequestFilter, LeaveRequestRepository};
pub use leave_type::LeaveTypeRepository;

//! Leave balance ledger.
//!
//! A ledger row holds `total`, `used` and `pending` days for one
//! (employee, leave type, year) key. `remaining` is always derived.
//!
//! # Modules
//!
//! - `types` - Ledger key and row
//! - `ledger` - Counter operations and their expected pre-conditions

pub mod ledger;
pub mod types;

#[cfg(test)]
mod ledger_props;

pub use ledger::{LedgerOperation, MAX_COUNTER_DAYS, check_counter};
pub use types::{BalanceKey, LeaveBalance};

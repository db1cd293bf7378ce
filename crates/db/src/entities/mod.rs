//! `SeaORM` entities for the leave schema.

pub mod leave_balance_adjustments;
pub mod leave_balances;
pub mod leave_request_history;
pub mod leave_requests;
pub mod leave_types;
pub mod sea_orm_active_enums;

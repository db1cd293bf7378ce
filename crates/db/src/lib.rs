//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The transaction-scoped [`BalanceLedger`] handle
//! - Repositories for leave types, balances, requests and adjustments
//! - Database migrations

pub mod entities;
pub mod error;
pub mod ledger;
pub mod migration;
pub mod repositories;

pub use ledger::BalanceLedger;
pub use repositories::{
    AdjustmentRepository, LeaveBalanceRepository, LeaveRequestRepository, LeaveTypeRepository,
};

use leavewise_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection using the configured pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}

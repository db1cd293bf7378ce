//! Leave balance repository: yearly initialization and ledger reads.

use std::collections::HashMap;

use leavewise_core::LeaveError;
use leavewise_core::balance::{BalanceKey, LeaveBalance};
use leavewise_core::leave_type::LeaveTypePolicy;
use leavewise_shared::types::{Days, EmployeeId, LeaveBalanceId, LeaveTypeId, OrganizationId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::entities::{leave_balances, leave_types};
use crate::error::map_db_err;
use crate::ledger::{BalanceLedger, to_domain};
use crate::repositories::leave_type::to_policy;

/// Outcome of a yearly initialization run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct YearInitialization {
    /// Rows created by this run.
    pub created: Vec<LeaveBalance>,
    /// Keys that already had a row and were left untouched.
    pub skipped: Vec<BalanceKey>,
}

/// Leave balance repository.
#[derive(Debug, Clone)]
pub struct LeaveBalanceRepository {
    db: DatabaseConnection,
}

impl LeaveBalanceRepository {
    /// Creates a new leave balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the ledger rows for `year` for every employee × leave type pair.
    ///
    /// Each new row starts at the leave type's default entitlement. Existing
    /// keys are reported in `skipped`. All rows are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any leave type is not found in the organization
    /// - Database operation fails
    #[instrument(skip(self, employee_ids, leave_type_ids), fields(
        employees = employee_ids.len(),
        leave_types = leave_type_ids.len()
    ))]
    pub async fn initialize_yearly_balances(
        &self,
        organization_id: OrganizationId,
        year: i32,
        employee_ids: &[EmployeeId],
        leave_type_ids: &[LeaveTypeId],
    ) -> Result<YearInitialization, LeaveError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let found: HashMap<LeaveTypeId, LeaveTypePolicy> = leave_types::Entity::find()
            .filter(leave_types::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(
                leave_types::Column::Id
                    .is_in(leave_type_ids.iter().map(|id| id.into_inner())),
            )
            .filter(leave_types::Column::DeletedAt.is_null())
            .all(&txn)
            .await
            .map_err(map_db_err)?
            .iter()
            .map(|model| {
                let policy = to_policy(model);
                (policy.id, policy)
            })
            .collect();

        let mut policies = Vec::with_capacity(leave_type_ids.len());
        for id in leave_type_ids {
            let policy = found.get(id).ok_or(LeaveError::LeaveTypeNotFound(*id))?;
            policies.push(policy);
        }

        let ledger = BalanceLedger::new(&txn);
        let mut result = YearInitialization::default();
        for employee_id in employee_ids {
            for policy in &policies {
                let key = BalanceKey::new(*employee_id, policy.id, year);
                match ledger
                    .try_initialize_year(organization_id, key, policy.default_entitlement())
                    .await?
                {
                    Some(balance) => result.created.push(balance),
                    None => result.skipped.push(key),
                }
            }
        }

        txn.commit().await.map_err(map_db_err)?;
        info!(
            created = result.created.len(),
            skipped = result.skipped.len(),
            "yearly balances initialized"
        );
        Ok(result)
    }

    /// Creates a single ledger row.
    ///
    /// # Errors
    ///
    /// Returns `BalanceAlreadyExists` if the key has a row, or
    /// `LeaveTypeNotFound` if the leave type is not in the organization.
    #[instrument(skip(self))]
    pub async fn initialize_year(
        &self,
        organization_id: OrganizationId,
        key: BalanceKey,
        total_days: Days,
    ) -> Result<LeaveBalance, LeaveError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        super::leave_type::find_in_org(&txn, organization_id, key.leave_type_id, None).await?;
        let balance = BalanceLedger::new(&txn)
            .initialize_year(organization_id, key, total_days)
            .await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(balance)
    }

    /// Gets the ledger row for a key.
    ///
    /// # Errors
    ///
    /// Returns `BalanceNotFound` if no row exists.
    pub async fn get_by_key(
        &self,
        organization_id: OrganizationId,
        key: BalanceKey,
    ) -> Result<LeaveBalance, LeaveError> {
        leave_balances::Entity::find()
            .filter(leave_balances::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(leave_balances::Column::EmployeeId.eq(key.employee_id.into_inner()))
            .filter(leave_balances::Column::LeaveTypeId.eq(key.leave_type_id.into_inner()))
            .filter(leave_balances::Column::Year.eq(key.year))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(|model| to_domain(&model))
            .ok_or(LeaveError::BalanceNotFound(key))
    }

    /// Gets a ledger row by id.
    ///
    /// # Errors
    ///
    /// Returns `BalanceIdNotFound` if no row exists.
    pub async fn get(
        &self,
        organization_id: OrganizationId,
        balance_id: LeaveBalanceId,
    ) -> Result<LeaveBalance, LeaveError> {
        leave_balances::Entity::find_by_id(balance_id.into_inner())
            .filter(leave_balances::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(|model| to_domain(&model))
            .ok_or(LeaveError::BalanceIdNotFound(balance_id))
    }

    /// Lists an employee's ledger rows for a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_employee(
        &self,
        organization_id: OrganizationId,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<Vec<LeaveBalance>, LeaveError> {
        let rows = leave_balances::Entity::find()
            .filter(leave_balances::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(leave_balances::Column::EmployeeId.eq(employee_id.into_inner()))
            .filter(leave_balances::Column::Year.eq(year))
            .order_by_asc(leave_balances::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.iter().map(to_domain).collect())
    }
}

//! Transaction-scoped access to the balance ledger.
//!
//! Every mutation locks the ledger row with `SELECT ... FOR UPDATE` before
//! its read-modify-write, so concurrent operations on one key serialize and
//! operations on different keys do not block each other. The handle borrows
//! the caller's transaction; nothing is persisted until the caller commits.
//!
//! Ledger effects are [`LedgerOperation`] values: `Reserve`, `Commit`,
//! `Release`, `ReleaseUsed` and `AdjustTotal` all go through
//! [`BalanceLedger::apply`] or [`BalanceLedger::apply_checked`].

use chrono::Utc;
use leavewise_core::LeaveError;
use leavewise_core::balance::{BalanceKey, LeaveBalance, LedgerOperation, check_counter};
use leavewise_shared::types::{
    Days, EmployeeId, LeaveBalanceId, LeaveTypeId, OrganizationId,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, DbErr,
    EntityTrait, QueryFilter, QuerySelect, Set, Statement,
};
use tracing::debug;

use crate::entities::leave_balances;
use crate::error::map_db_err;

/// Converts a stored ledger row into the domain type.
#[must_use]
pub fn to_domain(model: &leave_balances::Model) -> LeaveBalance {
    LeaveBalance {
        id: LeaveBalanceId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        key: BalanceKey::new(
            EmployeeId::from_uuid(model.employee_id),
            LeaveTypeId::from_uuid(model.leave_type_id),
            model.year,
        ),
        total_days: Days::from_stored(model.total_days),
        used_days: Days::from_stored(model.used_days),
        pending_days: Days::from_stored(model.pending_days),
    }
}

/// A ledger row locked for the rest of the enclosing transaction.
#[derive(Debug, Clone)]
pub struct LockedBalance {
    model: leave_balances::Model,
    balance: LeaveBalance,
}

impl LockedBalance {
    fn new(model: leave_balances::Model) -> Self {
        let balance = to_domain(&model);
        Self { model, balance }
    }

    /// Current counters of the locked row.
    #[must_use]
    pub fn balance(&self) -> &LeaveBalance {
        &self.balance
    }
}

/// Ledger handle bound to one database transaction.
pub struct BalanceLedger<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> BalanceLedger<'a> {
    /// Binds a ledger handle to `txn`.
    #[must_use]
    pub const fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Takes the employee's transaction-scoped advisory lock.
    ///
    /// Held until commit or rollback. Request creation takes it before
    /// reading the employee's active requests, so concurrent creations for
    /// one employee see each other across leave types.
    pub async fn lock_employee(&self, employee_id: EmployeeId) -> Result<(), LeaveError> {
        self.txn
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT pg_advisory_xact_lock(hashtext('leave_employee'), hashtext($1))",
                [employee_id.to_string().into()],
            ))
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Locks the row for `key`, failing with `BalanceNotFound` if it does not exist.
    pub async fn lock(
        &self,
        organization_id: OrganizationId,
        key: BalanceKey,
    ) -> Result<LockedBalance, LeaveError> {
        leave_balances::Entity::find()
            .filter(leave_balances::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(leave_balances::Column::EmployeeId.eq(key.employee_id.into_inner()))
            .filter(leave_balances::Column::LeaveTypeId.eq(key.leave_type_id.into_inner()))
            .filter(leave_balances::Column::Year.eq(key.year))
            .lock_exclusive()
            .one(self.txn)
            .await
            .map_err(map_db_err)?
            .map(LockedBalance::new)
            .ok_or(LeaveError::BalanceNotFound(key))
    }

    /// Locks the row with `balance_id`.
    pub async fn lock_by_id(
        &self,
        organization_id: OrganizationId,
        balance_id: LeaveBalanceId,
    ) -> Result<LockedBalance, LeaveError> {
        leave_balances::Entity::find_by_id(balance_id.into_inner())
            .filter(leave_balances::Column::OrganizationId.eq(organization_id.into_inner()))
            .lock_exclusive()
            .one(self.txn)
            .await
            .map_err(map_db_err)?
            .map(LockedBalance::new)
            .ok_or(LeaveError::BalanceIdNotFound(balance_id))
    }

    /// Applies `op` to a locked row and writes the counters back.
    ///
    /// Only the column capacity is checked; a negative remaining balance is
    /// written as-is.
    pub async fn apply(
        &self,
        locked: LockedBalance,
        op: LedgerOperation,
    ) -> Result<LeaveBalance, LeaveError> {
        op.check_capacity(locked.balance())?;
        let LockedBalance { model, mut balance } = locked;
        op.apply(&mut balance);

        let mut active: leave_balances::ActiveModel = model.into();
        active.total_days = Set(balance.total_days.value());
        active.used_days = Set(balance.used_days.value());
        active.pending_days = Set(balance.pending_days.value());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(self.txn).await.map_err(map_db_err)?;

        debug!(
            balance_id = %balance.id,
            op = op.name(),
            days = %op.days(),
            total = %balance.total_days,
            used = %balance.used_days,
            pending = %balance.pending_days,
            "ledger updated"
        );
        Ok(to_domain(&updated))
    }

    /// Like [`apply`](Self::apply), but first checks that the row still holds
    /// what `op` takes back.
    pub async fn apply_checked(
        &self,
        locked: LockedBalance,
        op: LedgerOperation,
    ) -> Result<LeaveBalance, LeaveError> {
        op.expect_counters(locked.balance())?;
        self.apply(locked, op).await
    }

    /// Creates the row for `key` with nothing used or pending.
    ///
    /// Fails with `BalanceAlreadyExists` if the key is taken.
    pub async fn initialize_year(
        &self,
        organization_id: OrganizationId,
        key: BalanceKey,
        total_days: Days,
    ) -> Result<LeaveBalance, LeaveError> {
        self.try_initialize_year(organization_id, key, total_days)
            .await?
            .ok_or(LeaveError::BalanceAlreadyExists(key))
    }

    /// Creates the row for `key` unless it exists; `Ok(None)` if it did.
    ///
    /// An existing row is left untouched and does not abort the transaction.
    pub async fn try_initialize_year(
        &self,
        organization_id: OrganizationId,
        key: BalanceKey,
        total_days: Days,
    ) -> Result<Option<LeaveBalance>, LeaveError> {
        check_counter(key, total_days)?;
        let id = LeaveBalanceId::new();
        let now = Utc::now();
        let row = leave_balances::ActiveModel {
            id: Set(id.into_inner()),
            organization_id: Set(organization_id.into_inner()),
            employee_id: Set(key.employee_id.into_inner()),
            leave_type_id: Set(key.leave_type_id.into_inner()),
            year: Set(key.year),
            total_days: Set(total_days.value()),
            used_days: Set(Days::ZERO.value()),
            pending_days: Set(Days::ZERO.value()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let inserted = leave_balances::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    leave_balances::Column::EmployeeId,
                    leave_balances::Column::LeaveTypeId,
                    leave_balances::Column::Year,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(self.txn)
            .await;

        match inserted {
            Ok(_) => {
                let model = leave_balances::Entity::find_by_id(id.into_inner())
                    .one(self.txn)
                    .await
                    .map_err(map_db_err)?
                    .ok_or(LeaveError::BalanceIdNotFound(id))?;
                debug!(balance_id = %id, %key, total = %total_days, "ledger initialized");
                Ok(Some(to_domain(&model)))
            }
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(e) => Err(map_db_err(e)),
        }
    }
}

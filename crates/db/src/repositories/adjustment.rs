//! Balance adjustment repository.

use chrono::Utc;
use leavewise_core::LeaveError;
use leavewise_core::adjustment::{
    AdjustmentDecision, AdjustmentOutcome, AdjustmentService, NewAdjustment,
};
use leavewise_shared::types::{AdjustmentId, Days, LeaveBalanceId, OrganizationId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::{info, instrument};

use crate::entities::{
    leave_balance_adjustments, leave_balances, sea_orm_active_enums::AdjustmentStatus,
};
use crate::error::map_db_err;
use crate::ledger::BalanceLedger;

/// Balance adjustment repository.
#[derive(Debug, Clone)]
pub struct AdjustmentRepository {
    db: DatabaseConnection,
}

impl AdjustmentRepository {
    /// Creates a new adjustment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits a pending adjustment against a ledger row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The delta is zero, too precise or too large
    /// - The reason or comments fail validation
    /// - The ledger row is not found in the organization
    /// - Database operation fails
    #[instrument(skip(self, input), fields(balance_id = %input.balance_id, delta = %input.delta))]
    pub async fn submit_adjustment(
        &self,
        organization_id: OrganizationId,
        input: &NewAdjustment,
    ) -> Result<leave_balance_adjustments::Model, LeaveError> {
        let validated = AdjustmentService::validate_new(input)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        // Existence check only; the row is not mutated until approval.
        leave_balances::Entity::find_by_id(validated.balance_id.into_inner())
            .filter(leave_balances::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LeaveError::BalanceIdNotFound(validated.balance_id))?;

        let now = Utc::now().into();
        let adjustment = leave_balance_adjustments::ActiveModel {
            id: Set(AdjustmentId::new().into_inner()),
            organization_id: Set(organization_id.into_inner()),
            leave_balance_id: Set(validated.balance_id.into_inner()),
            delta: Set(validated.delta.value()),
            reason: Set(validated.reason),
            requested_by: Set(validated.requested_by.into_inner()),
            approved_by: Set(None),
            approved_at: Set(None),
            comments: Set(validated.comments),
            status: Set(AdjustmentStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        info!(adjustment_id = %adjustment.id, "balance adjustment submitted");
        Ok(adjustment)
    }

    /// Approves or rejects an adjustment.
    ///
    /// Approval adds the delta to the ledger's `total_days` in the same
    /// transaction. Repeating the decision the adjustment already carries
    /// returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The adjustment is not found in the organization
    /// - The adjustment was already decided the other way
    /// - The new total does not fit the ledger (`LedgerCapacityExceeded`)
    /// - The transaction is aborted by contention
    /// - Database operation fails
    #[instrument(skip(self, comments))]
    pub async fn decide_adjustment(
        &self,
        organization_id: OrganizationId,
        adjustment_id: AdjustmentId,
        decision: AdjustmentDecision,
        approver: UserId,
        comments: Option<&str>,
    ) -> Result<leave_balance_adjustments::Model, LeaveError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let adjustment = leave_balance_adjustments::Entity::find_by_id(adjustment_id.into_inner())
            .filter(
                leave_balance_adjustments::Column::OrganizationId.eq(organization_id.into_inner()),
            )
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LeaveError::AdjustmentNotFound(adjustment_id))?;

        let outcome = AdjustmentService::decide(
            adjustment.status.into(),
            decision,
            Days::from_stored(adjustment.delta),
            approver,
            comments,
        )?;

        let AdjustmentOutcome::Applied {
            status,
            ledger_op,
            decided_by,
            comments,
        } = outcome
        else {
            info!("adjustment already decided; nothing to do");
            return Ok(adjustment);
        };

        if let Some(op) = ledger_op {
            let ledger = BalanceLedger::new(&txn);
            let balance_id = LeaveBalanceId::from_uuid(adjustment.leave_balance_id);
            let locked = ledger.lock_by_id(organization_id, balance_id).await?;
            ledger.apply(locked, op).await?;
        }

        let now = Utc::now().into();
        let mut active: leave_balance_adjustments::ActiveModel = adjustment.into();
        active.status = Set(status.into());
        active.approved_by = Set(Some(decided_by.into_inner()));
        active.approved_at = Set(Some(now));
        if comments.is_some() {
            active.comments = Set(comments);
        }
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        info!(status = %status, "balance adjustment decided");
        Ok(updated)
    }

    /// Gets an adjustment by id.
    ///
    /// # Errors
    ///
    /// Returns `AdjustmentNotFound` if it does not exist in the organization.
    pub async fn get(
        &self,
        organization_id: OrganizationId,
        adjustment_id: AdjustmentId,
    ) -> Result<leave_balance_adjustments::Model, LeaveError> {
        leave_balance_adjustments::Entity::find_by_id(adjustment_id.into_inner())
            .filter(
                leave_balance_adjustments::Column::OrganizationId.eq(organization_id.into_inner()),
            )
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(LeaveError::AdjustmentNotFound(adjustment_id))
    }

    /// Lists a ledger row's adjustments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_balance(
        &self,
        organization_id: OrganizationId,
        balance_id: LeaveBalanceId,
    ) -> Result<Vec<leave_balance_adjustments::Model>, LeaveError> {
        leave_balance_adjustments::Entity::find()
            .filter(
                leave_balance_adjustments::Column::OrganizationId.eq(organization_id.into_inner()),
            )
            .filter(leave_balance_adjustments::Column::LeaveBalanceId.eq(balance_id.into_inner()))
            .order_by_desc(leave_balance_adjustments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}

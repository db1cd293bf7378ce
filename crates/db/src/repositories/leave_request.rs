//! Leave request repository.
//!
//! Creation and every transition run in one transaction that locks the
//! request row (for transitions) and then the ledger row, applies the
//! ledger operation planned by [`LifecycleService`], updates the request and
//! appends one history row.

use chrono::{NaiveDate, Utc};
use leavewise_core::LeaveError;
use leavewise_core::balance::BalanceKey;
use leavewise_core::overlap::{DateRange, ExistingLeave, find_overlaps};
use leavewise_core::policy::LeavePolicy;
use leavewise_core::request::{
    LeaveAction, LeaveRequestSnapshot, LeaveStatus, LifecycleService, NewLeaveRequest,
};
use leavewise_shared::types::{
    Days, EmployeeId, HistoryEntryId, LeaveRequestId, LeaveTypeId, OrganizationId, PageRequest,
    PageResponse, UserId,
};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, instrument, warn};

use crate::entities::{
    leave_request_history, leave_requests, sea_orm_active_enums::LeaveRequestStatus,
};
use crate::error::map_db_err;
use crate::ledger::BalanceLedger;
use crate::repositories::leave_type::{find_in_org, to_policy};

const ACTIVE_STATUSES: [LeaveRequestStatus; 2] =
    [LeaveRequestStatus::Pending, LeaveRequestStatus::Approved];

/// Filter for listing leave requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveRequestFilter {
    /// Only this employee's requests.
    pub employee_id: Option<EmployeeId>,
    /// Only requests in this status.
    pub status: Option<LeaveStatus>,
}

/// Leave request repository.
#[derive(Debug, Clone)]
pub struct LeaveRequestRepository {
    db: DatabaseConnection,
    policy: LeavePolicy,
}

impl LeaveRequestRepository {
    /// Creates a new leave request repository with the default policy.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_policy(db, LeavePolicy::default())
    }

    /// Creates a repository that applies `policy` on creation.
    #[must_use]
    pub const fn with_policy(db: DatabaseConnection, policy: LeavePolicy) -> Self {
        Self { db, policy }
    }

    /// Creates a pending leave request and reserves its days.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The leave type is not found in the organization
    /// - The input fails validation (reason, dates, no working days, per-request maximum)
    /// - An enabled policy check fails (notice, overlap, overdraft)
    /// - No ledger row exists for the employee, leave type and start year
    /// - Database operation fails
    #[instrument(skip(self, input), fields(
        employee_id = %input.employee_id,
        leave_type_id = %input.leave_type_id,
        start = %input.start_date,
        end = %input.end_date
    ))]
    pub async fn create_leave_request(
        &self,
        organization_id: OrganizationId,
        input: &NewLeaveRequest,
    ) -> Result<leave_requests::Model, LeaveError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let today = Utc::now().date_naive();

        let leave_type = find_in_org(
            &txn,
            organization_id,
            input.leave_type_id,
            Some(LockType::Share),
        )
        .await?;
        let validated = LifecycleService::validate_new_request(
            input,
            &to_policy(&leave_type),
            &self.policy,
            today,
        )?;

        let ledger = BalanceLedger::new(&txn);
        ledger.lock_employee(validated.employee_id).await?;
        let locked = ledger.lock(organization_id, validated.key).await?;

        let overlapping = overlapping_in(
            &txn,
            organization_id,
            validated.employee_id,
            &validated.range,
        )
        .await?;
        if !overlapping.is_empty() {
            warn!(count = overlapping.len(), "request overlaps active leave");
        }
        self.policy.overlap.enforce(&overlapping)?;

        LifecycleService::check_balance(&self.policy, locked.balance(), validated.days)?;
        ledger.apply(locked, validated.reservation()).await?;

        let now = Utc::now().into();
        let request = leave_requests::ActiveModel {
            id: Set(LeaveRequestId::new().into_inner()),
            organization_id: Set(organization_id.into_inner()),
            employee_id: Set(validated.employee_id.into_inner()),
            leave_type_id: Set(validated.leave_type_id.into_inner()),
            start_date: Set(validated.range.start()),
            end_date: Set(validated.range.end()),
            days: Set(validated.days.value()),
            status: Set(LeaveRequestStatus::Pending),
            reason: Set(validated.reason.clone()),
            comments: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        append_history(
            &txn,
            request.id,
            LeaveAction::Create,
            LeaveStatus::Pending,
            validated.submitted_by,
            None,
        )
        .await?;

        txn.commit().await.map_err(map_db_err)?;
        info!(request_id = %request.id, days = %validated.days, "leave request created");
        Ok(request)
    }

    /// Moves a request to `target` and applies the matching ledger effect.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request is not found in the organization
    /// - `target` is not reachable from the current status
    /// - The ledger row no longer holds the request's days
    /// - The transaction is aborted by contention
    /// - Database operation fails
    #[instrument(skip(self, comment))]
    pub async fn transition_leave_request(
        &self,
        organization_id: OrganizationId,
        request_id: LeaveRequestId,
        target: LeaveStatus,
        actor: UserId,
        comment: Option<&str>,
    ) -> Result<leave_requests::Model, LeaveError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let request = leave_requests::Entity::find_by_id(request_id.into_inner())
            .filter(leave_requests::Column::OrganizationId.eq(organization_id.into_inner()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(LeaveError::LeaveRequestNotFound(request_id))?;

        let snapshot = LeaveRequestSnapshot {
            id: request_id,
            status: request.status.into(),
            start_date: request.start_date,
            days: Days::from_stored(request.days),
        };
        let plan = LifecycleService::plan_transition(
            &snapshot,
            target,
            actor,
            comment,
            Utc::now().date_naive(),
        )?;

        let key = BalanceKey::for_request(
            EmployeeId::from_uuid(request.employee_id),
            LeaveTypeId::from_uuid(request.leave_type_id),
            request.start_date,
        );
        let ledger = BalanceLedger::new(&txn);
        let locked = ledger.lock(organization_id, key).await?;
        ledger.apply_checked(locked, plan.ledger_op).await?;

        let now = Utc::now().into();
        let mut active: leave_requests::ActiveModel = request.into();
        active.status = Set(plan.to.into());
        if let Some(approver) = plan.approved_by {
            active.approved_by = Set(Some(approver.into_inner()));
            active.approved_at = Set(Some(now));
        }
        if plan.comment.is_some() {
            active.comments = Set(plan.comment.clone());
        }
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(map_db_err)?;

        append_history(&txn, updated.id, plan.action, plan.to, actor, plan.comment).await?;

        txn.commit().await.map_err(map_db_err)?;
        info!(from = %plan.from, to = %plan.to, "leave request transitioned");
        Ok(updated)
    }

    /// Gets a leave request by id.
    ///
    /// # Errors
    ///
    /// Returns `LeaveRequestNotFound` if it does not exist in the organization.
    pub async fn get(
        &self,
        organization_id: OrganizationId,
        request_id: LeaveRequestId,
    ) -> Result<leave_requests::Model, LeaveError> {
        leave_requests::Entity::find_by_id(request_id.into_inner())
            .filter(leave_requests::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(LeaveError::LeaveRequestNotFound(request_id))
    }

    /// Lists requests newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: OrganizationId,
        filter: LeaveRequestFilter,
        page: PageRequest,
    ) -> Result<PageResponse<leave_requests::Model>, LeaveError> {
        let page = page.normalized();

        let mut query = leave_requests::Entity::find()
            .filter(leave_requests::Column::OrganizationId.eq(organization_id.into_inner()));
        if let Some(employee_id) = filter.employee_id {
            query = query.filter(leave_requests::Column::EmployeeId.eq(employee_id.into_inner()));
        }
        if let Some(status) = filter.status {
            query = query.filter(leave_requests::Column::Status.eq(LeaveRequestStatus::from(status)));
        }

        let total = query.clone().count(&self.db).await.map_err(map_db_err)?;
        let data = query
            .order_by_desc(leave_requests::Column::CreatedAt)
            .order_by_desc(leave_requests::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Lists a request's history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LeaveRequestNotFound` if the request is not in the organization.
    pub async fn history(
        &self,
        organization_id: OrganizationId,
        request_id: LeaveRequestId,
    ) -> Result<Vec<leave_request_history::Model>, LeaveError> {
        self.get(organization_id, request_id).await?;
        leave_request_history::Entity::find()
            .filter(leave_request_history::Column::LeaveRequestId.eq(request_id.into_inner()))
            .order_by_desc(leave_request_history::Column::CreatedAt)
            .order_by_desc(leave_request_history::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Returns the employee's pending or approved requests sharing a day
    /// with `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if `start > end`, or an error if the query fails.
    pub async fn find_overlapping(
        &self,
        organization_id: OrganizationId,
        employee_id: EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<leave_requests::Model>, LeaveError> {
        let range = DateRange::new(start, end)?;
        active_in_range(&self.db, organization_id, employee_id, &range).await
    }
}

async fn active_in_range<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    employee_id: EmployeeId,
    range: &DateRange,
) -> Result<Vec<leave_requests::Model>, LeaveError> {
    leave_requests::Entity::find()
        .filter(leave_requests::Column::OrganizationId.eq(organization_id.into_inner()))
        .filter(leave_requests::Column::EmployeeId.eq(employee_id.into_inner()))
        .filter(leave_requests::Column::Status.is_in(ACTIVE_STATUSES))
        .filter(leave_requests::Column::StartDate.lte(range.end()))
        .filter(leave_requests::Column::EndDate.gte(range.start()))
        .order_by_asc(leave_requests::Column::StartDate)
        .all(conn)
        .await
        .map_err(map_db_err)
}

async fn overlapping_in<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    employee_id: EmployeeId,
    range: &DateRange,
) -> Result<Vec<LeaveRequestId>, LeaveError> {
    let rows = active_in_range(conn, organization_id, employee_id, range).await?;
    let existing = rows
        .iter()
        .map(|row| {
            Ok(ExistingLeave {
                id: LeaveRequestId::from_uuid(row.id),
                range: DateRange::new(row.start_date, row.end_date)?,
                status: row.status.into(),
            })
        })
        .collect::<Result<Vec<_>, LeaveError>>()?;
    Ok(find_overlaps(range, &existing))
}

async fn append_history<C: ConnectionTrait>(
    conn: &C,
    request_id: uuid::Uuid,
    action: LeaveAction,
    status: LeaveStatus,
    actor: UserId,
    comment: Option<String>,
) -> Result<leave_request_history::Model, LeaveError> {
    leave_request_history::ActiveModel {
        id: Set(HistoryEntryId::new().into_inner()),
        leave_request_id: Set(request_id),
        action: Set(action.into()),
        status: Set(status.into()),
        actor_id: Set(actor.into_inner()),
        comment: Set(comment),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)
}

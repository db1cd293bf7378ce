//! Leave type repository.
//!
//! Leave types are organization-scoped. Deletion is soft and refused while
//! pending or approved requests reference the type.

use chrono::Utc;
use leavewise_core::LeaveError;
use leavewise_core::leave_type::{LeaveTypeInput, LeaveTypePolicy};
use leavewise_shared::types::{LeaveTypeId, OrganizationId};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, instrument};

use crate::entities::{leave_requests, leave_types, sea_orm_active_enums::LeaveRequestStatus};
use crate::error::{is_unique_violation, map_db_err};

/// Converts a stored leave type into the policy the lifecycle reads.
#[must_use]
pub fn to_policy(model: &leave_types::Model) -> LeaveTypePolicy {
    LeaveTypePolicy {
        id: LeaveTypeId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        name: model.name.clone(),
        default_days: u32::try_from(model.default_days).unwrap_or(0),
        max_days_per_request: u32::try_from(model.max_days_per_request).unwrap_or(0),
        min_notice_days: u32::try_from(model.min_notice_days).unwrap_or(0),
        requires_approval: model.requires_approval,
        is_paid: model.is_paid,
    }
}

/// Loads a live leave type within an organization, optionally row-locked.
///
/// Request creation takes a shared lock and deletion an exclusive one, so a
/// type cannot be deleted while a request against it is being created.
pub(crate) async fn find_in_org<C: ConnectionTrait>(
    conn: &C,
    organization_id: OrganizationId,
    leave_type_id: LeaveTypeId,
    lock: Option<LockType>,
) -> Result<leave_types::Model, LeaveError> {
    let mut query = leave_types::Entity::find_by_id(leave_type_id.into_inner())
        .filter(leave_types::Column::OrganizationId.eq(organization_id.into_inner()))
        .filter(leave_types::Column::DeletedAt.is_null());
    if let Some(lock) = lock {
        query = query.lock(lock);
    }
    query
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or(LeaveError::LeaveTypeNotFound(leave_type_id))
}

fn to_db_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Leave type repository.
#[derive(Debug, Clone)]
pub struct LeaveTypeRepository {
    db: DatabaseConnection,
}

impl LeaveTypeRepository {
    /// Creates a new leave type repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a leave type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input fails validation
    /// - A live leave type with the same name exists in the organization
    /// - Database operation fails
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        organization_id: OrganizationId,
        input: &LeaveTypeInput,
    ) -> Result<leave_types::Model, LeaveError> {
        let (name, color) = input.validate()?;

        let existing = leave_types::Entity::find()
            .filter(leave_types::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(leave_types::Column::Name.eq(name.as_str()))
            .filter(leave_types::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        if existing > 0 {
            return Err(LeaveError::DuplicateLeaveTypeName(name));
        }

        let now = Utc::now().into();
        let row = leave_types::ActiveModel {
            id: Set(LeaveTypeId::new().into_inner()),
            organization_id: Set(organization_id.into_inner()),
            name: Set(name.clone()),
            description: Set(input
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(ToString::to_string)),
            default_days: Set(to_db_int(input.default_days)),
            max_days_per_request: Set(to_db_int(input.max_days_per_request)),
            min_notice_days: Set(to_db_int(input.min_notice_days)),
            is_paid: Set(input.is_paid),
            requires_approval: Set(input.requires_approval),
            color: Set(color),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let created = row.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LeaveError::DuplicateLeaveTypeName(name.clone())
            } else {
                map_db_err(e)
            }
        })?;

        info!(leave_type_id = %created.id, "leave type created");
        Ok(created)
    }

    /// Gets a leave type by id within an organization.
    ///
    /// # Errors
    ///
    /// Returns `LeaveTypeNotFound` if it does not exist, belongs to another
    /// organization, or was deleted.
    pub async fn get(
        &self,
        organization_id: OrganizationId,
        leave_type_id: LeaveTypeId,
    ) -> Result<leave_types::Model, LeaveError> {
        find_in_org(&self.db, organization_id, leave_type_id, None).await
    }

    /// Lists the organization's live leave types by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<leave_types::Model>, LeaveError> {
        leave_types::Entity::find()
            .filter(leave_types::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(leave_types::Column::DeletedAt.is_null())
            .order_by_asc(leave_types::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    /// Deletes a leave type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The leave type is not found
    /// - Pending or approved requests reference it
    /// - Database operation fails
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        organization_id: OrganizationId,
        leave_type_id: LeaveTypeId,
    ) -> Result<(), LeaveError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let leave_type =
            find_in_org(&txn, organization_id, leave_type_id, Some(LockType::Update)).await?;

        let active = leave_requests::Entity::find()
            .filter(leave_requests::Column::LeaveTypeId.eq(leave_type.id))
            .filter(
                leave_requests::Column::Status
                    .is_in([LeaveRequestStatus::Pending, LeaveRequestStatus::Approved]),
            )
            .count(&txn)
            .await
            .map_err(map_db_err)?;
        if active > 0 {
            return Err(LeaveError::LeaveTypeInUse(leave_type_id));
        }

        let now = Utc::now().into();
        let mut row: leave_types::ActiveModel = leave_type.into();
        row.deleted_at = Set(Some(now));
        row.updated_at = Set(now);
        row.update(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        info!("leave type deleted");
        Ok(())
    }
}

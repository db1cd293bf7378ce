//! `SeaORM` Entity for leave_request_history table.
//!
//! Append-only: a trigger rejects updates and deletes.

use super::sea_orm_active_enums::{LeaveHistoryAction, LeaveRequestStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_request_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub leave_request_id: Uuid,
    pub action: LeaveHistoryAction,
    pub status: LeaveRequestStatus,
    pub actor_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::leave_requests::Entity",
        from = "Column::LeaveRequestId",
        to = "super::leave_requests::Column::Id"
    )]
    LeaveRequests,
}

impl Related<super::leave_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for leave_balances table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub employee_id: Uuid,
    pub leave_type_id: Uuid,
    pub year: i32,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub total_days: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub used_days: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub pending_days: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::leave_types::Entity",
        from = "Column::LeaveTypeId",
        to = "super::leave_types::Column::Id"
    )]
    LeaveTypes,
    #[sea_orm(has_many = "super::leave_balance_adjustments::Entity")]
    LeaveBalanceAdjustments,
}

impl Related<super::leave_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveTypes.def()
    }
}

impl Related<super::leave_balance_adjustments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveBalanceAdjustments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

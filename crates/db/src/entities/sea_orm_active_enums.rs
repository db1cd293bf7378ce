//! `SeaORM` active enums for status columns.
//!
//! Status columns are `VARCHAR` with `CHECK` constraints, so every enum maps
//! to a string value.

use leavewise_core::adjustment::AdjustmentStatus as CoreAdjustmentStatus;
use leavewise_core::request::{LeaveAction as CoreLeaveAction, LeaveStatus as CoreLeaveStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LeaveRequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LeaveHistoryAction {
    #[sea_orm(string_value = "create")]
    Create,
    #[sea_orm(string_value = "approve")]
    Approve,
    #[sea_orm(string_value = "reject")]
    Reject,
    #[sea_orm(string_value = "cancel")]
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AdjustmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<LeaveRequestStatus> for CoreLeaveStatus {
    fn from(status: LeaveRequestStatus) -> Self {
        match status {
            LeaveRequestStatus::Pending => Self::Pending,
            LeaveRequestStatus::Approved => Self::Approved,
            LeaveRequestStatus::Rejected => Self::Rejected,
            LeaveRequestStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreLeaveStatus> for LeaveRequestStatus {
    fn from(status: CoreLeaveStatus) -> Self {
        match status {
            CoreLeaveStatus::Pending => Self::Pending,
            CoreLeaveStatus::Approved => Self::Approved,
            CoreLeaveStatus::Rejected => Self::Rejected,
            CoreLeaveStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoreLeaveAction> for LeaveHistoryAction {
    fn from(action: CoreLeaveAction) -> Self {
        match action {
            CoreLeaveAction::Create => Self::Create,
            CoreLeaveAction::Approve => Self::Approve,
            CoreLeaveAction::Reject => Self::Reject,
            CoreLeaveAction::Cancel => Self::Cancel,
        }
    }
}

impl From<AdjustmentStatus> for CoreAdjustmentStatus {
    fn from(status: AdjustmentStatus) -> Self {
        match status {
            AdjustmentStatus::Pending => Self::Pending,
            AdjustmentStatus::Approved => Self::Approved,
            AdjustmentStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CoreAdjustmentStatus> for AdjustmentStatus {
    fn from(status: CoreAdjustmentStatus) -> Self {
        match status {
            CoreAdjustmentStatus::Pending => Self::Pending,
            CoreAdjustmentStatus::Approved => Self::Approved,
            CoreAdjustmentStatus::Rejected => Self::Rejected,
        }
    }
}

//! Leave type policy and registration rules.
//!
//! A leave type is an organization-scoped policy record: default yearly
//! entitlement, per-request maximum and minimum notice. Requests read it at
//! creation; yearly initialization reads its default entitlement.

use chrono::NaiveDate;
use leavewise_shared::types::{Days, LeaveTypeId, OrganizationId};
use serde::{Deserialize, Serialize};

use crate::error::LeaveError;

/// Maximum leave type name length.
pub const MAX_NAME_LEN: usize = 100;
/// Upper bound for default entitlement and per-request maximum.
pub const MAX_DAYS_PER_YEAR: u32 = 365;
/// Default color used when none is supplied.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// The parts of a leave type the lifecycle needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypePolicy {
    /// Leave type id.
    pub id: LeaveTypeId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Yearly entitlement seeded by initialization.
    pub default_days: u32,
    /// Maximum working days in a single request.
    pub max_days_per_request: u32,
    /// Minimum calendar days between submission and start.
    pub min_notice_days: u32,
    /// Whether requests need an approver.
    pub requires_approval: bool,
    /// Paid or unpaid leave.
    pub is_paid: bool,
}

impl LeaveTypePolicy {
    /// Checks a request's working-day count against the per-request maximum.
    pub fn check_max_days(&self, requested: Days) -> Result<(), LeaveError> {
        if requested > Days::whole(i64::from(self.max_days_per_request)) {
            return Err(LeaveError::ExceedsMaxDaysPerRequest {
                requested,
                max: self.max_days_per_request,
            });
        }
        Ok(())
    }

    /// Checks that `start` is at least `min_notice_days` after `today`.
    pub fn check_notice(&self, start: NaiveDate, today: NaiveDate) -> Result<(), LeaveError> {
        let given = (start - today).num_days();
        if given < i64::from(self.min_notice_days) {
            return Err(LeaveError::InsufficientNotice {
                required: self.min_notice_days,
                given,
            });
        }
        Ok(())
    }

    /// Default yearly entitlement as a day quantity.
    #[must_use]
    pub fn default_entitlement(&self) -> Days {
        Days::whole(i64::from(self.default_days))
    }
}

/// Input for registering a leave type.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct LeaveTypeInput {
    pub name: String,
    pub description: Option<String>,
    pub default_days: u32,
    pub max_days_per_request: u32,
    #[serde(default)]
    pub min_notice_days: u32,
    #[serde(default = "default_true")]
    pub is_paid: bool,
    #[serde(default = "default_true")]
    pub requires_approval: bool,
    /// `#RRGGBB`; defaults to [`DEFAULT_COLOR`].
    pub color: Option<String>,
}

fn default_true() -> bool {
    true
}

impl LeaveTypeInput {
    /// Validates the input and returns the trimmed name and resolved color.
    pub fn validate(&self) -> Result<(String, String), LeaveError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(LeaveError::Validation("Leave type name is required".into()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(LeaveError::Validation(format!(
                "Leave type name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        if self.default_days > MAX_DAYS_PER_YEAR {
            return Err(LeaveError::Validation(format!(
                "Default days must be between 0 and {MAX_DAYS_PER_YEAR}"
            )));
        }
        if self.max_days_per_request == 0 || self.max_days_per_request > MAX_DAYS_PER_YEAR {
            return Err(LeaveError::Validation(format!(
                "Max days per request must be between 1 and {MAX_DAYS_PER_YEAR}"
            )));
        }

        let color = match self.color.as_deref() {
            Some(c) if is_hex_color(c) => c.to_string(),
            Some(c) => {
                return Err(LeaveError::Validation(format!(
                    "Color '{c}' must be a hex color like #RRGGBB"
                )));
            }
            None => DEFAULT_COLOR.to_string(),
        };

        Ok((name.to_string(), color))
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input() -> LeaveTypeInput {
        LeaveTypeInput {
            name: "  Annual Leave ".into(),
            description: None,
            default_days: 20,
            max_days_per_request: 10,
            min_notice_days: 0,
            is_paid: true,
            requires_approval: true,
            color: None,
        }
    }

    fn policy(max: u32, notice: u32) -> LeaveTypePolicy {
        LeaveTypePolicy {
            id: LeaveTypeId::new(),
            organization_id: OrganizationId::new(),
            name: "Annual".into(),
            default_days: 20,
            max_days_per_request: max,
            min_notice_days: notice,
            requires_approval: true,
            is_paid: true,
        }
    }

    #[test]
    fn test_valid_input_trims_and_defaults_color() {
        let (name, color) = input().validate().unwrap();
        assert_eq!(name, "Annual Leave");
        assert_eq!(color, DEFAULT_COLOR);
    }

    #[rstest]
    #[case::blank_name(LeaveTypeInput { name: "   ".into(), ..input() })]
    #[case::long_name(LeaveTypeInput { name: "x".repeat(101), ..input() })]
    #[case::too_many_default_days(LeaveTypeInput { default_days: 366, ..input() })]
    #[case::zero_max(LeaveTypeInput { max_days_per_request: 0, ..input() })]
    #[case::huge_max(LeaveTypeInput { max_days_per_request: 400, ..input() })]
    #[case::bad_color(LeaveTypeInput { color: Some("blue".into()), ..input() })]
    #[case::short_color(LeaveTypeInput { color: Some("#FFF".into()), ..input() })]
    fn test_invalid_input(#[case] bad: LeaveTypeInput) {
        assert!(matches!(bad.validate(), Err(LeaveError::Validation(_))));
    }

    #[test]
    fn test_custom_color_kept() {
        let ok = LeaveTypeInput {
            color: Some("#10b981".into()),
            ..input()
        };
        assert_eq!(ok.validate().unwrap().1, "#10b981");
    }

    #[test]
    fn test_max_days_per_request() {
        let p = policy(5, 0);
        assert!(p.check_max_days(Days::whole(5)).is_ok());
        let err = p.check_max_days(Days::whole(10)).unwrap_err();
        assert_eq!(
            err,
            LeaveError::ExceedsMaxDaysPerRequest {
                requested: Days::whole(10),
                max: 5
            }
        );
    }

    #[test]
    fn test_notice() {
        let p = policy(10, 7);
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let ok = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        let late = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert!(p.check_notice(ok, today).is_ok());
        assert_eq!(
            p.check_notice(late, today).unwrap_err(),
            LeaveError::InsufficientNotice { required: 7, given: 3 }
        );
    }
}

//! Business-rule toggles applied on request creation.

use leavewise_shared::{LeaveConfig, OverlapPolicySetting};

use crate::overlap::OverlapPolicy;

/// Optional checks layered on top of the always-on lifecycle rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeavePolicy {
    /// Overlap handling.
    pub overlap: OverlapPolicy,
    /// Enforce the leave type's minimum notice.
    pub enforce_min_notice: bool,
    /// Accept requests larger than the remaining balance.
    pub allow_negative_balance: bool,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            overlap: OverlapPolicy::Allow,
            enforce_min_notice: false,
            allow_negative_balance: true,
        }
    }
}

impl LeavePolicy {
    /// Every optional check turned on.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            overlap: OverlapPolicy::Reject,
            enforce_min_notice: true,
            allow_negative_balance: false,
        }
    }
}

impl From<&LeaveConfig> for LeavePolicy {
    fn from(config: &LeaveConfig) -> Self {
        let overlap = match config.overlap_policy {
            OverlapPolicySetting::Allow => OverlapPolicy::Allow,
            OverlapPolicySetting::Reject => OverlapPolicy::Reject,
        };
        Self {
            overlap,
            enforce_min_notice: config.enforce_min_notice,
            allow_negative_balance: config.allow_negative_balance,
        }
    }
}

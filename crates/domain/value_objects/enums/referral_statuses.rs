use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Seconds ahead of now within which a subscription counts as expiring.
pub const EXPIRING_WINDOW_SECS: i64 = 7 * 24 * 60 * 60;

/// Subscription state of a referred account, derived from `expired_at` alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    Active,
    Expired,
    Pending,
}

impl ReferralStatus {
    pub fn derive(expired_at: Option<i64>, now: i64) -> Self {
        match expired_at {
            None | Some(0) => ReferralStatus::Pending,
            Some(expired_at) if expired_at > now => ReferralStatus::Active,
            Some(_) => ReferralStatus::Expired,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralStatus::Active => "active",
            ReferralStatus::Expired => "expired",
            ReferralStatus::Pending => "pending",
        }
    }
}

impl Display for ReferralStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status buckets a caller can filter the referral list by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatusFilter {
    Normal,
    Expiring,
    Expired,
}

impl ReferralStatusFilter {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(ReferralStatusFilter::Normal),
            "expiring" => Some(ReferralStatusFilter::Expiring),
            "expired" => Some(ReferralStatusFilter::Expired),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000;
    const DAY: i64 = 24 * 60 * 60;

    #[test]
    fn derives_status_from_expiry() {
        assert_eq!(ReferralStatus::derive(None, NOW), ReferralStatus::Pending);
        assert_eq!(
            ReferralStatus::derive(Some(0), NOW),
            ReferralStatus::Pending
        );
        assert_eq!(
            ReferralStatus::derive(Some(NOW + 1), NOW),
            ReferralStatus::Active
        );
        assert_eq!(
            ReferralStatus::derive(Some(NOW), NOW),
            ReferralStatus::Expired
        );
        assert_eq!(
            ReferralStatus::derive(Some(NOW - 100), NOW),
            ReferralStatus::Expired
        );
    }

    #[test]
    fn derive_is_stable_for_fixed_clock() {
        let first = ReferralStatus::derive(Some(NOW + 3 * DAY), NOW);
        let second = ReferralStatus::derive(Some(NOW + 3 * DAY), NOW);
        assert_eq!(first, second);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&ReferralStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn unknown_filter_param_is_ignored() {
        assert_eq!(ReferralStatusFilter::from_param("active"), None);
        assert_eq!(
            ReferralStatusFilter::from_param("expiring"),
            Some(ReferralStatusFilter::Expiring)
        );
    }
}

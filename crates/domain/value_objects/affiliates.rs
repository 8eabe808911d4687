use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::{
    order_types::OrderType,
    referral_statuses::{ReferralStatus, ReferralStatusFilter},
    sort_order::{ReferredAccountSortField, SortOrder},
};

pub const DEFAULT_PER_PAGE: i64 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferredAccountSort {
    pub field: ReferredAccountSortField,
    pub order: SortOrder,
}

/// Narrowing applied to a referrer's account list. Empty means every referred account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReferredAccountsFilter {
    pub search: Option<String>,
    pub status: Option<ReferralStatusFilter>,
    pub sort: Option<ReferredAccountSort>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Paid orders of one referred account, bucketed by type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OrderStats {
    pub new_purchase: i64,
    pub renewal: i64,
    pub upgrade: i64,
}

impl OrderStats {
    pub fn add(&mut self, order_type: OrderType, count: i64) {
        match order_type {
            OrderType::NewPurchase => self.new_purchase += count,
            OrderType::Renewal => self.renewal += count,
            OrderType::Upgrade => self.upgrade += count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferredAccountDto {
    pub id: i32,
    pub email: String,
    pub created_at: i64,
    pub plan_name: String,
    pub expired_at: Option<i64>,
    pub status: ReferralStatus,
    pub order_stats: OrderStats,
    pub total_commission: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferredAccountsPageDto {
    pub data: Vec<ReferredAccountDto>,
    pub total: i64,
    pub current_page: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteCodesDto {
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommissionStatusDto {
    pub pending: i64,
    pub confirmed: i64,
    pub available: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserGrowthDto {
    pub month: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanDistributionDto {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardDto {
    pub total_users: i64,
    pub month_users: i64,
    pub balance: i64,
    pub commission_rate: i64,
    pub available_commission: i64,
    pub pending_commission: i64,
    pub commission_status: CommissionStatusDto,
    pub month_commission: i64,
    pub last_month_commission: i64,
    pub user_growth: Vec<UserGrowthDto>,
    pub plan_distribution: Vec<PlanDistributionDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_starts_at_zero() {
        assert_eq!(PageRequest::default().offset(), 0);
        assert_eq!(
            PageRequest {
                page: 3,
                per_page: 20
            }
            .offset(),
            40
        );
    }

    #[test]
    fn order_stats_accumulate_per_bucket() {
        let mut stats = OrderStats::default();
        stats.add(OrderType::NewPurchase, 1);
        stats.add(OrderType::Renewal, 4);
        stats.add(OrderType::Upgrade, 2);
        stats.add(OrderType::Renewal, 1);

        assert_eq!(
            stats,
            OrderStats {
                new_purchase: 1,
                renewal: 5,
                upgrade: 2
            }
        );
    }

    #[test]
    fn referred_account_serializes_null_expiry() {
        let dto = ReferredAccountDto {
            id: 7,
            email: "a@example.com".to_string(),
            created_at: 1_700_000_000,
            plan_name: "Basic".to_string(),
            expired_at: None,
            status: ReferralStatus::Pending,
            order_stats: OrderStats::default(),
            total_commission: 0,
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json["expired_at"].is_null());
        assert_eq!(json["status"], "pending");
        assert_eq!(json["order_stats"]["new_purchase"], 0);
    }
}

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::{accounts::AccountEntity, plans::PlanEntity},
    value_objects::{
        affiliates::{PageRequest, ReferredAccountsFilter},
        report_periods::TimeWindow,
    },
};

/// Read-side queries behind the affiliate panel. Nothing here writes.
#[automock]
#[async_trait]
pub trait AffiliateRepository {
    async fn find_account(&self, account_id: i32) -> Result<Option<AccountEntity>>;

    /// One page of accounts referred by `referrer_id`. `now` anchors the status filter.
    async fn list_referred_accounts(
        &self,
        referrer_id: i32,
        filter: &ReferredAccountsFilter,
        page: PageRequest,
        now: i64,
    ) -> Result<Vec<AccountEntity>>;

    async fn count_referred_accounts(
        &self,
        referrer_id: i32,
        filter: &ReferredAccountsFilter,
        now: i64,
    ) -> Result<i64>;

    async fn list_all_referred_accounts(&self, referrer_id: i32) -> Result<Vec<AccountEntity>>;

    async fn count_referred_accounts_created_in(
        &self,
        referrer_id: i32,
        window: TimeWindow,
    ) -> Result<i64>;

    /// `(plan_id, accounts)` for referred accounts that have a plan, ordered by plan id.
    async fn count_referred_accounts_by_plan(&self, referrer_id: i32) -> Result<Vec<(i32, i64)>>;

    async fn list_plans(&self) -> Result<Vec<PlanEntity>>;

    /// `(account_id, order_type, orders)` over paid orders of the given accounts.
    async fn count_paid_orders_by_type(
        &self,
        account_ids: Vec<i32>,
    ) -> Result<Vec<(i32, i32, i64)>>;

    /// `(account_id, confirmed commission)` for the given purchasing accounts, all time.
    async fn sum_commission_by_account(&self, account_ids: Vec<i32>) -> Result<Vec<(i32, i64)>>;

    /// Commission accrued on the referrer's paid orders that has not been confirmed yet.
    async fn sum_pending_order_commission(&self, referrer_id: i32) -> Result<i64>;

    /// Confirmed commission credited to the referrer, optionally limited to a window.
    async fn sum_earned_commission(
        &self,
        referrer_id: i32,
        window: Option<TimeWindow>,
    ) -> Result<i64>;

    async fn list_invite_codes(&self, account_id: i32) -> Result<Vec<String>>;
}

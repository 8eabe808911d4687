use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    RunQueryDsl,
    dsl::{count_star, sum},
    pg::Pg,
    prelude::*,
};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{accounts, commission_logs, invite_codes, orders, plans},
    },
};
use domain::{
    entities::{accounts::AccountEntity, plans::PlanEntity},
    repositories::affiliates::AffiliateRepository,
    value_objects::{
        affiliates::{PageRequest, ReferredAccountSort, ReferredAccountsFilter},
        enums::{
            order_statuses::{CommissionStatus, OrderStatus},
            referral_statuses::{EXPIRING_WINDOW_SECS, ReferralStatusFilter},
            sort_order::{ReferredAccountSortField, SortOrder},
        },
        report_periods::TimeWindow,
    },
};

pub struct AffiliatePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AffiliatePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    /// Referred accounts of `referrer_id` narrowed by search and status, unsorted.
    fn referred_accounts_query<'a>(
        referrer_id: i32,
        filter: &ReferredAccountsFilter,
        now: i64,
    ) -> accounts::BoxedQuery<'a, Pg> {
        let mut query = accounts::table
            .filter(accounts::referrer_id.eq(referrer_id))
            .into_boxed();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(accounts::email.ilike(format!("%{}%", escape_like(search))));
        }

        let horizon = now + EXPIRING_WINDOW_SECS;
        query = match filter.status {
            // `expired_at > now` is implied by the horizon bound; kept to match the panel's query.
            Some(ReferralStatusFilter::Normal) => query.filter(
                accounts::expired_at
                    .is_null()
                    .or(accounts::expired_at.eq(0_i64))
                    .or(accounts::expired_at
                        .gt(now)
                        .and(accounts::expired_at.gt(horizon))),
            ),
            Some(ReferralStatusFilter::Expiring) => query
                .filter(accounts::expired_at.gt(now))
                .filter(accounts::expired_at.le(horizon)),
            Some(ReferralStatusFilter::Expired) => query
                .filter(accounts::expired_at.gt(0_i64))
                .filter(accounts::expired_at.le(now)),
            None => query,
        };

        query
    }

    /// One sorted page. Account id always breaks ties so pages never overlap.
    fn referred_accounts_page_query<'a>(
        referrer_id: i32,
        filter: &ReferredAccountsFilter,
        page: PageRequest,
        now: i64,
    ) -> accounts::BoxedQuery<'a, Pg> {
        let query = Self::referred_accounts_query(referrer_id, filter, now);

        let query = match filter.sort {
            Some(ReferredAccountSort { field, order }) => match (field, order) {
                (ReferredAccountSortField::CreatedAt, SortOrder::Asc) => {
                    query.order_by(accounts::created_at.asc())
                }
                (ReferredAccountSortField::CreatedAt, SortOrder::Desc) => {
                    query.order_by(accounts::created_at.desc())
                }
                (ReferredAccountSortField::ExpiredAt, SortOrder::Asc) => {
                    query.order_by(accounts::expired_at.asc())
                }
                (ReferredAccountSortField::ExpiredAt, SortOrder::Desc) => {
                    query.order_by(accounts::expired_at.desc())
                }
            }
            .then_order_by(accounts::id.asc()),
            None => query.order_by(accounts::id.asc()),
        };

        query.limit(page.per_page).offset(page.offset())
    }

    fn referred_accounts_created_in_query<'a>(
        referrer_id: i32,
        window: TimeWindow,
    ) -> accounts::BoxedQuery<'a, Pg> {
        accounts::table
            .filter(accounts::referrer_id.eq(referrer_id))
            .filter(accounts::created_at.ge(window.start))
            .filter(accounts::created_at.lt(window.end))
            .into_boxed()
    }

    fn paid_orders_query<'a>(account_ids: Vec<i32>) -> orders::BoxedQuery<'a, Pg> {
        orders::table
            .filter(orders::account_id.eq_any(account_ids))
            .filter(orders::status.eq(OrderStatus::Paid.code()))
            .into_boxed()
    }

    fn pending_order_commission_query<'a>(referrer_id: i32) -> orders::BoxedQuery<'a, Pg> {
        orders::table
            .filter(orders::referrer_id.eq(referrer_id))
            .filter(orders::status.eq(OrderStatus::Paid.code()))
            .filter(orders::commission_status.eq(CommissionStatus::Unconfirmed.code()))
            .into_boxed()
    }

    fn earned_commission_query<'a>(
        referrer_id: i32,
        window: Option<TimeWindow>,
    ) -> commission_logs::BoxedQuery<'a, Pg> {
        let mut query = commission_logs::table
            .filter(commission_logs::referrer_id.eq(referrer_id))
            .into_boxed();

        if let Some(window) = window {
            query = query
                .filter(commission_logs::created_at.ge(window.start))
                .filter(commission_logs::created_at.lt(window.end));
        }

        query
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[async_trait]
impl AffiliateRepository for AffiliatePostgres {
    async fn find_account(&self, account_id: i32) -> Result<Option<AccountEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let account = accounts::table
            .filter(accounts::id.eq(account_id))
            .select(AccountEntity::as_select())
            .first::<AccountEntity>(&mut conn)
            .optional()?;

        Ok(account)
    }

    async fn list_referred_accounts(
        &self,
        referrer_id: i32,
        filter: &ReferredAccountsFilter,
        page: PageRequest,
        now: i64,
    ) -> Result<Vec<AccountEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = Self::referred_accounts_page_query(referrer_id, filter, page, now)
            .select(AccountEntity::as_select())
            .load::<AccountEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_referred_accounts(
        &self,
        referrer_id: i32,
        filter: &ReferredAccountsFilter,
        now: i64,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::referred_accounts_query(referrer_id, filter, now)
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn list_all_referred_accounts(&self, referrer_id: i32) -> Result<Vec<AccountEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = accounts::table
            .filter(accounts::referrer_id.eq(referrer_id))
            .select(AccountEntity::as_select())
            .order(accounts::id.asc())
            .load::<AccountEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_referred_accounts_created_in(
        &self,
        referrer_id: i32,
        window: TimeWindow,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::referred_accounts_created_in_query(referrer_id, window)
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn count_referred_accounts_by_plan(&self, referrer_id: i32) -> Result<Vec<(i32, i64)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = accounts::table
            .filter(accounts::referrer_id.eq(referrer_id))
            .filter(accounts::plan_id.is_not_null())
            .group_by(accounts::plan_id)
            .select((accounts::plan_id, count_star()))
            .order_by(accounts::plan_id.asc())
            .load::<(Option<i32>, i64)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .filter_map(|(plan_id, count)| plan_id.map(|plan_id| (plan_id, count)))
            .collect())
    }

    async fn list_plans(&self) -> Result<Vec<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = plans::table
            .select(PlanEntity::as_select())
            .load::<PlanEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_paid_orders_by_type(
        &self,
        account_ids: Vec<i32>,
    ) -> Result<Vec<(i32, i32, i64)>> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = Self::paid_orders_query(account_ids)
            .group_by((orders::account_id, orders::type_))
            .select((orders::account_id, orders::type_, count_star()))
            .load::<(i32, i32, i64)>(&mut conn)?;

        Ok(rows)
    }

    async fn sum_commission_by_account(&self, account_ids: Vec<i32>) -> Result<Vec<(i32, i64)>> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = commission_logs::table
            .filter(commission_logs::account_id.eq_any(account_ids))
            .group_by(commission_logs::account_id)
            .select((commission_logs::account_id, sum(commission_logs::get_amount)))
            .load::<(i32, Option<i64>)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(account_id, total)| (account_id, total.unwrap_or(0)))
            .collect())
    }

    async fn sum_pending_order_commission(&self, referrer_id: i32) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::pending_order_commission_query(referrer_id)
            .select(sum(orders::commission_balance))
            .first::<Option<i64>>(&mut conn)?;

        Ok(total.unwrap_or(0))
    }

    async fn sum_earned_commission(
        &self,
        referrer_id: i32,
        window: Option<TimeWindow>,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::earned_commission_query(referrer_id, window)
            .select(sum(commission_logs::get_amount))
            .first::<Option<i64>>(&mut conn)?;

        Ok(total.unwrap_or(0))
    }

    async fn list_invite_codes(&self, account_id: i32) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let codes = invite_codes::table
            .filter(invite_codes::account_id.eq(account_id))
            .select(invite_codes::code)
            .order(invite_codes::id.asc())
            .load::<String>(&mut conn)?;

        Ok(codes)
    }
}

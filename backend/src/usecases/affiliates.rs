use std::{collections::HashMap, sync::Arc};

use anyhow::Result as AnyResult;
use chrono::{DateTime, Utc};
use crates::domain::{
    entities::accounts::AccountEntity,
    repositories::affiliates::AffiliateRepository,
    value_objects::{
        affiliates::{
            CommissionStatusDto, DashboardDto, InviteCodesDto, OrderStats, PageRequest,
            PlanDistributionDto, ReferredAccountDto, ReferredAccountsFilter,
            ReferredAccountsPageDto, UserGrowthDto,
        },
        enums::{order_types::OrderType, referral_statuses::ReferralStatus},
        locale::Locale,
        report_periods::CalendarMonth,
    },
};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    config::config_model::{Affiliate, Report},
    usecases::invited_users_csv::{self, CsvExport},
};

/// Number of monthly points in the dashboard growth chart, current month included.
pub const USER_GROWTH_MONTHS: u32 = 6;

#[derive(Debug, Error)]
pub enum AffiliateError {
    #[error("account {0} not found")]
    AccountNotFound(i32),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type UseCaseResult<T> = std::result::Result<T, AffiliateError>;

/// Referral reporting for the signed-in account: referred users, invite codes, commission
/// dashboard and the CSV export. Read-only.
pub struct AffiliateUseCase<R>
where
    R: AffiliateRepository + Send + Sync + 'static,
{
    affiliate_repo: Arc<R>,
    affiliate: Affiliate,
    report: Report,
}

impl<R> AffiliateUseCase<R>
where
    R: AffiliateRepository + Send + Sync + 'static,
{
    pub fn new(affiliate_repo: Arc<R>, affiliate: Affiliate, report: Report) -> Self {
        Self {
            affiliate_repo,
            affiliate,
            report,
        }
    }

    pub fn locale(&self) -> Locale {
        self.report.locale
    }

    pub async fn invited_users(
        &self,
        referrer_id: i32,
        filter: ReferredAccountsFilter,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> UseCaseResult<ReferredAccountsPageDto> {
        let now = now.timestamp();

        let total = self
            .affiliate_repo
            .count_referred_accounts(referrer_id, &filter, now)
            .await?;
        let accounts = self
            .affiliate_repo
            .list_referred_accounts(referrer_id, &filter, page, now)
            .await?;

        debug!(
            referrer_id,
            total,
            page = page.page,
            rows = accounts.len(),
            "affiliates: loaded referred accounts page"
        );

        let data = self.describe_referred_accounts(accounts, now).await?;

        Ok(ReferredAccountsPageDto {
            data,
            total,
            current_page: page.page,
            per_page: page.per_page,
        })
    }

    /// Never fails: an empty list and a storage error both collapse into a one-element
    /// placeholder list the panel renders as-is.
    pub async fn invite_codes(&self, account_id: i32) -> InviteCodesDto {
        let locale = self.locale();

        let codes = match self.affiliate_repo.list_invite_codes(account_id).await {
            Ok(codes) if codes.is_empty() => vec![locale.no_invite_codes().to_string()],
            Ok(codes) => codes,
            Err(err) => {
                error!(account_id, error = ?err, "affiliates: failed to list invite codes");
                vec![locale.invite_codes_error().to_string()]
            }
        };

        InviteCodesDto { codes }
    }

    pub async fn dashboard(
        &self,
        account_id: i32,
        now: DateTime<Utc>,
    ) -> UseCaseResult<DashboardDto> {
        let account = self
            .affiliate_repo
            .find_account(account_id)
            .await?
            .ok_or(AffiliateError::AccountNotFound(account_id))?;

        let offset = &self.report.utc_offset;
        let current_month = CalendarMonth::containing(now, offset);
        let month_window = current_month.window(offset)?;
        let last_month_window = current_month.months_before(1).window(offset)?;

        let total_users = self
            .affiliate_repo
            .count_referred_accounts(
                account_id,
                &ReferredAccountsFilter::default(),
                now.timestamp(),
            )
            .await?;
        let month_users = self
            .affiliate_repo
            .count_referred_accounts_created_in(account_id, month_window)
            .await?;

        let pending_commission = apply_distribution(
            self.affiliate_repo
                .sum_pending_order_commission(account_id)
                .await?,
            &self.affiliate,
        );
        let available_commission = i64::from(account.commission_balance);
        let confirmed_commission = self
            .affiliate_repo
            .sum_earned_commission(account_id, None)
            .await?;
        let month_commission = self
            .affiliate_repo
            .sum_earned_commission(account_id, Some(month_window))
            .await?;
        let last_month_commission = self
            .affiliate_repo
            .sum_earned_commission(account_id, Some(last_month_window))
            .await?;

        let user_growth = self.user_growth(account_id, current_month).await?;
        let plan_distribution = self.plan_distribution(account_id).await?;

        Ok(DashboardDto {
            total_users,
            month_users,
            balance: account.balance.map(i64::from).unwrap_or(0),
            commission_rate: effective_commission_rate(&account, &self.affiliate),
            available_commission,
            pending_commission,
            commission_status: CommissionStatusDto {
                pending: pending_commission,
                confirmed: confirmed_commission,
                available: available_commission,
            },
            month_commission,
            last_month_commission,
            user_growth,
            plan_distribution,
        })
    }

    /// Every referred account, unfiltered and unpaged, as a CSV sheet.
    pub async fn export_invited_users(
        &self,
        referrer_id: i32,
        now: DateTime<Utc>,
    ) -> UseCaseResult<CsvExport> {
        let accounts = self
            .affiliate_repo
            .list_all_referred_accounts(referrer_id)
            .await?;
        let rows = self
            .describe_referred_accounts(accounts, now.timestamp())
            .await?;

        let export =
            invited_users_csv::render(&rows, self.report.locale, &self.report.utc_offset, now)?;

        debug!(
            referrer_id,
            rows = rows.len(),
            bytes = export.bytes.len(),
            "affiliates: rendered invited users export"
        );

        Ok(export)
    }

    async fn describe_referred_accounts(
        &self,
        accounts: Vec<AccountEntity>,
        now: i64,
    ) -> AnyResult<Vec<ReferredAccountDto>> {
        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let account_ids: Vec<i32> = accounts.iter().map(|account| account.id).collect();
        let plan_names = self.plan_names().await?;

        let mut order_stats: HashMap<i32, OrderStats> = HashMap::new();
        for (account_id, order_type, count) in self
            .affiliate_repo
            .count_paid_orders_by_type(account_ids.clone())
            .await?
        {
            if let Some(order_type) = OrderType::from_code(order_type) {
                order_stats
                    .entry(account_id)
                    .or_default()
                    .add(order_type, count);
            }
        }

        let commissions: HashMap<i32, i64> = self
            .affiliate_repo
            .sum_commission_by_account(account_ids)
            .await?
            .into_iter()
            .collect();

        Ok(accounts
            .into_iter()
            .map(|account| ReferredAccountDto {
                id: account.id,
                plan_name: self.plan_label(account.plan_id, &plan_names),
                status: ReferralStatus::derive(account.expired_at, now),
                order_stats: order_stats.get(&account.id).copied().unwrap_or_default(),
                total_commission: commissions.get(&account.id).copied().unwrap_or(0),
                email: account.email,
                created_at: account.created_at,
                expired_at: account.expired_at,
            })
            .collect())
    }

    async fn user_growth(
        &self,
        referrer_id: i32,
        current_month: CalendarMonth,
    ) -> AnyResult<Vec<UserGrowthDto>> {
        let offset = &self.report.utc_offset;
        let mut points = Vec::with_capacity(USER_GROWTH_MONTHS as usize);

        for months_back in (0..USER_GROWTH_MONTHS).rev() {
            let month = current_month.months_before(months_back);
            let count = self
                .affiliate_repo
                .count_referred_accounts_created_in(referrer_id, month.window(offset)?)
                .await?;

            points.push(UserGrowthDto {
                month: month.label(),
                count,
            });
        }

        Ok(points)
    }

    async fn plan_distribution(&self, referrer_id: i32) -> AnyResult<Vec<PlanDistributionDto>> {
        let counts = self
            .affiliate_repo
            .count_referred_accounts_by_plan(referrer_id)
            .await?;
        if counts.is_empty() {
            return Ok(Vec::new());
        }

        let plan_names = self.plan_names().await?;
        let unknown_plan = self.locale().unknown_plan();

        Ok(counts
            .into_iter()
            .map(|(plan_id, count)| PlanDistributionDto {
                name: plan_names
                    .get(&plan_id)
                    .cloned()
                    .unwrap_or_else(|| unknown_plan.to_string()),
                count,
            })
            .collect())
    }

    async fn plan_names(&self) -> AnyResult<HashMap<i32, String>> {
        Ok(self
            .affiliate_repo
            .list_plans()
            .await?
            .into_iter()
            .map(|plan| (plan.id, plan.name))
            .collect())
    }

    fn plan_label(&self, plan_id: Option<i32>, plan_names: &HashMap<i32, String>) -> String {
        let locale = self.locale();
        match plan_id {
            Some(plan_id) => plan_names
                .get(&plan_id)
                .cloned()
                .unwrap_or_else(|| locale.unknown_plan().to_string()),
            None => locale.unsubscribed().to_string(),
        }
    }
}

/// A personal rate of zero means "not set" and falls back to the global default.
pub fn effective_commission_rate(account: &AccountEntity, affiliate: &Affiliate) -> i64 {
    match account.commission_rate {
        Some(rate) if rate != 0 => i64::from(rate),
        _ => affiliate.invite_commission,
    }
}

/// Scales pending commission down to the first-level share when distribution is on.
pub fn apply_distribution(pending: i64, affiliate: &Affiliate) -> i64 {
    if affiliate.commission_distribution_enable {
        pending * affiliate.commission_distribution_l1 / 100
    } else {
        pending
    }
}

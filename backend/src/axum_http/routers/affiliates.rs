use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use crates::{
    domain::{
        repositories::affiliates::AffiliateRepository,
        value_objects::{
            affiliates::{
                DEFAULT_PER_PAGE, PageRequest, ReferredAccountSort, ReferredAccountsFilter,
            },
            enums::{
                referral_statuses::ReferralStatusFilter,
                sort_order::{ReferredAccountSortField, SortOrder},
            },
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::affiliates::AffiliatePostgres,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    config::config_model::DotEnvyConfig,
    usecases::affiliates::AffiliateUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let affiliate_repository = AffiliatePostgres::new(Arc::clone(&db_pool));
    let affiliate_usecase = AffiliateUseCase::new(
        Arc::new(affiliate_repository),
        config.affiliate.clone(),
        config.report.clone(),
    );

    Router::new()
        .route("/fetch", get(invited_users))
        .route("/invite/fetch", get(fetch_invite_codes))
        .route("/dashboard", get(dashboard))
        .route("/export", get(export_invited_users))
        .with_state(Arc::new(affiliate_usecase))
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvitedUsersQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub status: Option<String>,
}

impl InvitedUsersQuery {
    /// `None` for a non-positive page size. Pages below 1 read as the first page; unknown sort
    /// or status values are ignored.
    pub fn into_request(self) -> Option<(ReferredAccountsFilter, PageRequest)> {
        let page = PageRequest {
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        };
        if page.per_page < 1 {
            return None;
        }

        let sort = self
            .sort_by
            .as_deref()
            .and_then(ReferredAccountSortField::from_param)
            .map(|field| ReferredAccountSort {
                field,
                order: SortOrder::from_param(self.sort_order.as_deref()),
            });

        let filter = ReferredAccountsFilter {
            search: self
                .search
                .map(|search| search.trim().to_string())
                .filter(|search| !search.is_empty()),
            status: self
                .status
                .as_deref()
                .and_then(ReferralStatusFilter::from_param),
            sort,
        };

        Some((filter, page))
    }
}

pub async fn invited_users<T>(
    State(affiliate_usecase): State<Arc<AffiliateUseCase<T>>>,
    auth: AuthUser,
    Query(query): Query<InvitedUsersQuery>,
) -> Result<Response, AppError>
where
    T: AffiliateRepository + Send + Sync + 'static,
{
    info!(
        account_id = auth.account_id,
        "affiliates router: invited_users handler invoked"
    );
    let locale = affiliate_usecase.locale();

    let (filter, page) = query
        .into_request()
        .ok_or_else(|| AppError::BadRequest(locale.invalid_paging().to_string()))?;

    match affiliate_usecase
        .invited_users(auth.account_id, filter, page, Utc::now())
        .await
    {
        Ok(page) => Ok(Json(DataResponse { data: page }).into_response()),
        Err(err) => {
            error!(
                account_id = auth.account_id,
                error = ?err,
                "affiliates: invited_users failed"
            );
            Err(AppError::Internal {
                message: locale.invited_users_failed().to_string(),
                detail: Some(err.to_string()),
            })
        }
    }
}

pub async fn fetch_invite_codes<T>(
    State(affiliate_usecase): State<Arc<AffiliateUseCase<T>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    T: AffiliateRepository + Send + Sync + 'static,
{
    info!(
        account_id = auth.account_id,
        "affiliates router: fetch_invite_codes handler invoked"
    );

    Json(affiliate_usecase.invite_codes(auth.account_id).await)
}

pub async fn dashboard<T>(
    State(affiliate_usecase): State<Arc<AffiliateUseCase<T>>>,
    auth: AuthUser,
) -> Result<Response, AppError>
where
    T: AffiliateRepository + Send + Sync + 'static,
{
    info!(
        account_id = auth.account_id,
        "affiliates router: dashboard handler invoked"
    );

    match affiliate_usecase.dashboard(auth.account_id, Utc::now()).await {
        Ok(dashboard) => Ok(Json(DataResponse { data: dashboard }).into_response()),
        Err(err) => {
            error!(
                account_id = auth.account_id,
                error = ?err,
                "affiliates: dashboard failed"
            );
            Err(AppError::Internal {
                message: affiliate_usecase.locale().dashboard_failed().to_string(),
                detail: Some(err.to_string()),
            })
        }
    }
}

pub async fn export_invited_users<T>(
    State(affiliate_usecase): State<Arc<AffiliateUseCase<T>>>,
    auth: AuthUser,
) -> Result<Response, AppError>
where
    T: AffiliateRepository + Send + Sync + 'static,
{
    info!(
        account_id = auth.account_id,
        "affiliates router: export_invited_users handler invoked"
    );

    match affiliate_usecase
        .export_invited_users(auth.account_id, Utc::now())
        .await
    {
        Ok(export) => {
            let headers = [
                (header::CONTENT_TYPE, "text/csv; charset=UTF-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.filename),
                ),
            ];
            Ok((headers, export.bytes).into_response())
        }
        Err(err) => {
            error!(
                account_id = auth.account_id,
                error = ?err,
                "affiliates: export failed"
            );
            Err(AppError::Internal {
                message: affiliate_usecase.locale().export_failed().to_string(),
                detail: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use axum::{body::to_bytes, http::StatusCode};
    use crates::domain::{
        entities::accounts::AccountEntity, repositories::affiliates::MockAffiliateRepository,
    };
    use serde_json::Value;

    use crate::config::config_model::{Affiliate, Report};

    fn auth() -> AuthUser {
        AuthUser {
            account_id: 1,
            email: None,
        }
    }

    fn state(
        repo: MockAffiliateRepository,
    ) -> State<Arc<AffiliateUseCase<MockAffiliateRepository>>> {
        State(Arc::new(AffiliateUseCase::new(
            Arc::new(repo),
            Affiliate::default(),
            Report::default(),
        )))
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn query_defaults_to_first_page() {
        let (filter, page) = InvitedUsersQuery::default().into_request().unwrap();

        assert_eq!(filter, ReferredAccountsFilter::default());
        assert_eq!(page, PageRequest::default());
    }

    #[test]
    fn query_ignores_unknown_sort_and_status() {
        let query = InvitedUsersQuery {
            sort_by: Some("email".to_string()),
            sort_order: Some("asc".to_string()),
            status: Some("forever".to_string()),
            search: Some("   ".to_string()),
            ..Default::default()
        };

        let (filter, _) = query.into_request().unwrap();

        assert_eq!(filter, ReferredAccountsFilter::default());
    }

    #[test]
    fn query_maps_known_values() {
        let query = InvitedUsersQuery {
            page: Some(2),
            per_page: Some(50),
            search: Some(" gmail ".to_string()),
            sort_by: Some("expired_at".to_string()),
            sort_order: Some("sideways".to_string()),
            status: Some("expiring".to_string()),
        };

        let (filter, page) = query.into_request().unwrap();

        assert_eq!(filter.search.as_deref(), Some("gmail"));
        assert_eq!(filter.status, Some(ReferralStatusFilter::Expiring));
        assert_eq!(
            filter.sort,
            Some(ReferredAccountSort {
                field: ReferredAccountSortField::ExpiredAt,
                order: SortOrder::Desc,
            })
        );
        assert_eq!(
            page,
            PageRequest {
                page: 2,
                per_page: 50
            }
        );
    }

    #[test]
    fn query_rejects_non_positive_page_size() {
        for per_page in [0, -5] {
            let query = InvitedUsersQuery {
                per_page: Some(per_page),
                ..Default::default()
            };
            assert!(query.into_request().is_none());
        }
    }

    #[test]
    fn query_accepts_large_page_size() {
        let query = InvitedUsersQuery {
            per_page: Some(200),
            ..Default::default()
        };

        let (_, page) = query.into_request().unwrap();

        assert_eq!(page.per_page, 200);
    }

    #[test]
    fn query_clamps_page_below_one() {
        for requested in [0, -3] {
            let query = InvitedUsersQuery {
                page: Some(requested),
                ..Default::default()
            };

            let (_, page) = query.into_request().unwrap();

            assert_eq!(page, PageRequest::default());
        }
    }

    #[tokio::test]
    async fn invited_users_wraps_page_in_data() {
        let mut repo = MockAffiliateRepository::new();
        repo.expect_count_referred_accounts()
            .returning(|_, _, _| Ok(0));
        repo.expect_list_referred_accounts()
            .returning(|_, _, _, _| Ok(Vec::new()));

        let response = invited_users(state(repo), auth(), Query(InvitedUsersQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["total"], 0);
        assert_eq!(body["data"]["current_page"], 1);
        assert_eq!(body["data"]["per_page"], 10);
        assert!(body["data"]["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invited_users_rejects_zero_page_size() {
        let query = InvitedUsersQuery {
            per_page: Some(0),
            ..Default::default()
        };

        let err = invited_users(state(MockAffiliateRepository::new()), auth(), Query(query))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invited_users_accepts_large_page_size() {
        let mut repo = MockAffiliateRepository::new();
        repo.expect_count_referred_accounts()
            .returning(|_, _, _| Ok(0));
        repo.expect_list_referred_accounts()
            .withf(|_, _, page, _| page.page == 1 && page.per_page == 200)
            .returning(|_, _, _, _| Ok(Vec::new()));
        let query = InvitedUsersQuery {
            page: Some(0),
            per_page: Some(200),
            ..Default::default()
        };

        let response = invited_users(state(repo), auth(), Query(query))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["current_page"], 1);
        assert_eq!(body["data"]["per_page"], 200);
    }

    #[tokio::test]
    async fn invited_users_failure_carries_detail() {
        let mut repo = MockAffiliateRepository::new();
        repo.expect_count_referred_accounts()
            .returning(|_, _, _| Err(anyhow!("relation \"accounts\" does not exist")));

        let response = invited_users(state(repo), auth(), Query(InvitedUsersQuery::default()))
            .await
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["message"], "获取邀请用户列表失败");
        assert_eq!(body["error"], "relation \"accounts\" does not exist");
    }

    #[tokio::test]
    async fn invite_codes_error_still_answers_ok() {
        let mut repo = MockAffiliateRepository::new();
        repo.expect_list_invite_codes()
            .returning(|_| Err(anyhow!("timeout")));

        let response = fetch_invite_codes(state(repo), auth()).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["codes"], serde_json::json!(["错误"]));
    }

    #[tokio::test]
    async fn dashboard_missing_account_is_internal_error() {
        let mut repo = MockAffiliateRepository::new();
        repo.expect_find_account().returning(|_| Ok(None));

        let response = dashboard(state(repo), auth())
            .await
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["message"], "获取仪表盘数据失败");
        assert_eq!(body["error"], "account 1 not found");
    }

    #[tokio::test]
    async fn export_sets_csv_headers() {
        let mut repo = MockAffiliateRepository::new();
        repo.expect_list_all_referred_accounts().returning(|_| {
            Ok(vec![AccountEntity {
                id: 5,
                email: "a@example.com".to_string(),
                referrer_id: Some(1),
                plan_id: None,
                created_at: 1_704_067_200,
                expired_at: None,
                balance: None,
                commission_balance: 0,
                commission_rate: None,
            }])
        });
        repo.expect_list_plans().returning(|| Ok(Vec::new()));
        repo.expect_count_paid_orders_by_type()
            .returning(|_| Ok(Vec::new()));
        repo.expect_sum_commission_by_account()
            .returning(|_| Ok(Vec::new()));

        let response = export_invited_users(state(repo), auth()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=UTF-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(
            disposition.starts_with("attachment; filename=\"invited_users_")
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    }

    #[tokio::test]
    async fn export_failure_hides_detail() {
        let mut repo = MockAffiliateRepository::new();
        repo.expect_list_all_referred_accounts()
            .returning(|_| Err(anyhow!("boom")));

        let response = export_invited_users(state(repo), auth())
            .await
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["message"], "导出失败");
        assert!(body.get("error").is_none());
    }
}

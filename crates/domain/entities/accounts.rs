use diesel::prelude::*;

use crate::infra::db::postgres::schema::accounts;

/// Panel account row. Timestamps are unix seconds; `expired_at` of `None` or `0` means no
/// subscription has ever been attached.
#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = accounts)]
pub struct AccountEntity {
    pub id: i32,
    pub email: String,
    pub referrer_id: Option<i32>,
    pub plan_id: Option<i32>,
    pub created_at: i64,
    pub expired_at: Option<i64>,
    pub balance: Option<i32>,
    pub commission_balance: i32,
    pub commission_rate: Option<i32>,
}

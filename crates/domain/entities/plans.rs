use diesel::prelude::*;

use crate::infra::db::postgres::schema::plans;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanEntity {
    pub id: i32,
    pub name: String,
}

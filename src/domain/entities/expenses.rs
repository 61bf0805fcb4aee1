use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::expenses;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = expenses)]
pub struct ExpenseEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub billing_period: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// An expense materialized from a subscription. `id` and `created_at` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = expenses)]
pub struct InsertSubscriptionExpenseEntity {
    pub user_id: Uuid,
    pub subscription_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub billing_period: NaiveDate,
}

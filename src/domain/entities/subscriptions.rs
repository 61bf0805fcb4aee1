use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::value_objects::enums::subscription_states::{LifecycleError, SubscriptionState};
use crate::infrastructure::postgres::schema::subscriptions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub amount: Option<i64>,
    pub currency: String,
    pub category: String,
    pub billing_day: Option<i32>,
    pub is_active: bool,
    pub is_paused: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionEntity {
    pub fn state(&self) -> Result<SubscriptionState, LifecycleError> {
        SubscriptionState::from_flags(self.is_active, self.is_paused, self.cancelled_at)
    }
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = subscriptions)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateSubscriptionLifecycleEntity {
    pub is_active: bool,
    pub is_paused: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

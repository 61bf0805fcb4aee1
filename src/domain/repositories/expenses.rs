use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::expenses::{ExpenseEntity, InsertSubscriptionExpenseEntity},
    value_objects::billing_period::BillingPeriod,
};

#[async_trait]
#[automock]
pub trait ExpenseRepository {
    /// Expense tied to `subscription_id` for `billing_period`. Rows written
    /// before `billing_period` existed are matched by their date instead.
    async fn find_subscription_expense_for_period(
        &self,
        subscription_id: Uuid,
        billing_period: BillingPeriod,
    ) -> Result<Option<ExpenseEntity>>;

    /// Returns `None` when the store already holds an expense for the same
    /// subscription and billing period.
    async fn insert_subscription_expense(
        &self,
        insert_expense_entity: InsertSubscriptionExpenseEntity,
    ) -> Result<Option<Uuid>>;
}

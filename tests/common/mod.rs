#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use recurring_expenses::{
    application::usecases::materialize_recurring_expenses::{
        MaterializeRecurringExpensesUseCase, MaterializerSettings,
    },
    domain::{
        entities::{
            expenses::{ExpenseEntity, InsertSubscriptionExpenseEntity},
            subscriptions::{SubscriptionEntity, UpdateSubscriptionLifecycleEntity},
        },
        repositories::{expenses::ExpenseRepository, subscriptions::SubscriptionRepository},
        value_objects::billing_period::BillingPeriod,
    },
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Store double holding both tables, enforcing the same
/// (subscription_id, billing_period) uniqueness as the Postgres schema.
#[derive(Default)]
pub struct InMemoryStore {
    subscriptions: Mutex<Vec<SubscriptionEntity>>,
    expenses: Mutex<Vec<ExpenseEntity>>,
    failing_inserts: Mutex<Vec<Uuid>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_subscription(&self, subscription: SubscriptionEntity) {
        self.subscriptions.lock().unwrap().push(subscription);
    }

    pub fn add_expense(&self, expense: ExpenseEntity) {
        self.expenses.lock().unwrap().push(expense);
    }

    pub fn fail_inserts_for(&self, subscription_id: Uuid) {
        self.failing_inserts.lock().unwrap().push(subscription_id);
    }

    pub fn expenses_for(&self, subscription_id: Uuid) -> Vec<ExpenseEntity> {
        self.expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|expense| expense.subscription_id == Some(subscription_id))
            .cloned()
            .collect()
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.lock().unwrap().len()
    }

    pub fn subscription(&self, subscription_id: Uuid) -> Option<SubscriptionEntity> {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|subscription| subscription.id == subscription_id)
            .cloned()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn list_active_uncancelled_subscriptions(&self) -> Result<Vec<SubscriptionEntity>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|subscription| subscription.is_active && subscription.cancelled_at.is_none())
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        Ok(self.subscription(subscription_id))
    }

    async fn update_lifecycle(
        &self,
        subscription_id: Uuid,
        lifecycle: UpdateSubscriptionLifecycleEntity,
    ) -> Result<()> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions
            .iter_mut()
            .find(|subscription| subscription.id == subscription_id)
            .ok_or_else(|| anyhow!("subscription {subscription_id} not found"))?;

        subscription.is_active = lifecycle.is_active;
        subscription.is_paused = lifecycle.is_paused;
        subscription.cancelled_at = lifecycle.cancelled_at;
        subscription.updated_at = lifecycle.updated_at;
        Ok(())
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryStore {
    async fn find_subscription_expense_for_period(
        &self,
        subscription_id: Uuid,
        billing_period: BillingPeriod,
    ) -> Result<Option<ExpenseEntity>> {
        Ok(self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .find(|expense| {
                expense.subscription_id == Some(subscription_id)
                    && match expense.billing_period {
                        Some(period) => period == billing_period.first_day(),
                        None => billing_period.contains(expense.date),
                    }
            })
            .cloned())
    }

    async fn insert_subscription_expense(
        &self,
        insert_expense_entity: InsertSubscriptionExpenseEntity,
    ) -> Result<Option<Uuid>> {
        if self
            .failing_inserts
            .lock()
            .unwrap()
            .contains(&insert_expense_entity.subscription_id)
        {
            return Err(anyhow!("insert rejected by store"));
        }

        let mut expenses = self.expenses.lock().unwrap();
        let duplicate = expenses.iter().any(|expense| {
            expense.subscription_id == Some(insert_expense_entity.subscription_id)
                && expense.billing_period == Some(insert_expense_entity.billing_period)
        });
        if duplicate {
            return Ok(None);
        }

        let id = Uuid::new_v4();
        expenses.push(ExpenseEntity {
            id,
            user_id: insert_expense_entity.user_id,
            subscription_id: Some(insert_expense_entity.subscription_id),
            amount: insert_expense_entity.amount,
            currency: insert_expense_entity.currency,
            description: insert_expense_entity.description,
            category: insert_expense_entity.category,
            date: insert_expense_entity.date,
            billing_period: Some(insert_expense_entity.billing_period),
            created_at: Utc::now(),
        });
        Ok(Some(id))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn subscription(billing_day: i32, amount: i64) -> SubscriptionEntity {
    let now = Utc::now();
    SubscriptionEntity {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: "Netflix".to_string(),
        amount: Some(amount),
        currency: "KRW".to_string(),
        category: "subscription".to_string(),
        billing_day: Some(billing_day),
        is_active: true,
        is_paused: false,
        cancelled_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn materializer(
    store: &Arc<InMemoryStore>,
    settings: MaterializerSettings,
) -> MaterializeRecurringExpensesUseCase {
    MaterializeRecurringExpensesUseCase::new(store.clone(), store.clone(), settings)
}

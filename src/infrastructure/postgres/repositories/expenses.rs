use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::{
    domain::{
        entities::expenses::{ExpenseEntity, InsertSubscriptionExpenseEntity},
        repositories::expenses::ExpenseRepository,
        value_objects::billing_period::BillingPeriod,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::expenses},
};

pub struct ExpensePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ExpensePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ExpenseRepository for ExpensePostgres {
    async fn find_subscription_expense_for_period(
        &self,
        subscription_id: Uuid,
        billing_period: BillingPeriod,
    ) -> Result<Option<ExpenseEntity>> {
        let db_pool = Arc::clone(&self.db_pool);
        let first_day = billing_period.first_day();
        let last_day = billing_period.last_day();

        Ok(task::spawn_blocking(move || -> Result<Option<ExpenseEntity>> {
            let mut conn = db_pool.get()?;

            let result = expenses::table
                .filter(expenses::subscription_id.eq(subscription_id))
                .filter(
                    expenses::billing_period.eq(first_day).or(expenses::billing_period
                        .is_null()
                        .and(expenses::date.between(first_day, last_day))),
                )
                .order(expenses::created_at.asc())
                .select(ExpenseEntity::as_select())
                .first::<ExpenseEntity>(&mut conn)
                .optional()?;

            Ok(result)
        })
        .await??)
    }

    async fn insert_subscription_expense(
        &self,
        insert_expense_entity: InsertSubscriptionExpenseEntity,
    ) -> Result<Option<Uuid>> {
        let db_pool = Arc::clone(&self.db_pool);

        Ok(task::spawn_blocking(move || -> Result<Option<Uuid>> {
            let mut conn = db_pool.get()?;

            // Unique (subscription_id, billing_period) turns a racing duplicate into no row.
            let inserted_id = insert_into(expenses::table)
                .values(&insert_expense_entity)
                .on_conflict_do_nothing()
                .returning(expenses::id)
                .get_result::<Uuid>(&mut conn)
                .optional()?;

            Ok(inserted_id)
        })
        .await??)
    }
}

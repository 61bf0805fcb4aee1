use anyhow::{Result, bail};
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*, update};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscriptions::{SubscriptionEntity, UpdateSubscriptionLifecycleEntity},
        repositories::subscriptions::SubscriptionRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

// Diesel is synchronous; DB work runs on the blocking threadpool.
#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn list_active_uncancelled_subscriptions(&self) -> Result<Vec<SubscriptionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        Ok(task::spawn_blocking(move || -> Result<Vec<SubscriptionEntity>> {
            let mut conn = db_pool.get()?;

            let result = subscriptions::table
                .filter(subscriptions::is_active.eq(true))
                .filter(subscriptions::cancelled_at.is_null())
                .order(subscriptions::created_at.asc())
                .select(SubscriptionEntity::as_select())
                .load::<SubscriptionEntity>(&mut conn)?;

            Ok(result)
        })
        .await??)
    }

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        Ok(task::spawn_blocking(move || -> Result<Option<SubscriptionEntity>> {
            let mut conn = db_pool.get()?;

            let result = subscriptions::table
                .filter(subscriptions::id.eq(subscription_id))
                .select(SubscriptionEntity::as_select())
                .first::<SubscriptionEntity>(&mut conn)
                .optional()?;

            Ok(result)
        })
        .await??)
    }

    async fn update_lifecycle(
        &self,
        subscription_id: Uuid,
        lifecycle: UpdateSubscriptionLifecycleEntity,
    ) -> Result<()> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<()> {
            let mut conn = db_pool.get()?;

            let updated = update(subscriptions::table.filter(subscriptions::id.eq(subscription_id)))
                .set(&lifecycle)
                .execute(&mut conn)?;

            if updated == 0 {
                bail!("subscription {subscription_id} not found");
            }

            Ok(())
        })
        .await?
    }
}

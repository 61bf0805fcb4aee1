use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{
    SubscriptionEntity, UpdateSubscriptionLifecycleEntity,
};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// Subscriptions with `is_active = true` and no `cancelled_at`. Paused ones
    /// are included; callers decide what to do with them.
    async fn list_active_uncancelled_subscriptions(&self) -> Result<Vec<SubscriptionEntity>>;

    async fn find_by_id(&self, subscription_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    async fn update_lifecycle(
        &self,
        subscription_id: Uuid,
        lifecycle: UpdateSubscriptionLifecycleEntity,
    ) -> Result<()>;
}

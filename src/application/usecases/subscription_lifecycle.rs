use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::UpdateSubscriptionLifecycleEntity,
    repositories::subscriptions::SubscriptionRepository,
    value_objects::enums::subscription_states::{LifecycleError, SubscriptionState},
};

#[derive(Debug, Error)]
pub enum SubscriptionLifecycleError {
    #[error("subscription not found")]
    NotFound,
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionLifecycleError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionLifecycleError::NotFound => StatusCode::NOT_FOUND,
            SubscriptionLifecycleError::Lifecycle(_) => StatusCode::CONFLICT,
            SubscriptionLifecycleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionLifecycleError>;

#[derive(Debug, Clone, Copy)]
enum LifecycleAction {
    Pause,
    Resume,
    Cancel,
}

/// Write boundary for subscription state changes. Every change goes through
/// the [`SubscriptionState`] transition rules before it reaches the store.
pub struct SubscriptionLifecycleUseCase {
    subscription_repository: Arc<dyn SubscriptionRepository + Send + Sync>,
}

impl SubscriptionLifecycleUseCase {
    pub fn new(subscription_repository: Arc<dyn SubscriptionRepository + Send + Sync>) -> Self {
        Self {
            subscription_repository,
        }
    }

    pub async fn pause(&self, subscription_id: Uuid) -> UseCaseResult<SubscriptionState> {
        self.transition(subscription_id, LifecycleAction::Pause, Utc::now())
            .await
    }

    pub async fn resume(&self, subscription_id: Uuid) -> UseCaseResult<SubscriptionState> {
        self.transition(subscription_id, LifecycleAction::Resume, Utc::now())
            .await
    }

    pub async fn cancel(
        &self,
        subscription_id: Uuid,
        cancelled_at: DateTime<Utc>,
    ) -> UseCaseResult<SubscriptionState> {
        self.transition(subscription_id, LifecycleAction::Cancel, cancelled_at)
            .await
    }

    async fn transition(
        &self,
        subscription_id: Uuid,
        action: LifecycleAction,
        now: DateTime<Utc>,
    ) -> UseCaseResult<SubscriptionState> {
        let subscription = self
            .subscription_repository
            .find_by_id(subscription_id)
            .await?
            .ok_or(SubscriptionLifecycleError::NotFound)?;

        let current = subscription.state()?;
        let next = match action {
            LifecycleAction::Pause => current.pause()?,
            LifecycleAction::Resume => current.resume()?,
            LifecycleAction::Cancel => current.cancel()?,
        };

        let lifecycle = match next {
            SubscriptionState::Active => UpdateSubscriptionLifecycleEntity {
                is_active: true,
                is_paused: false,
                cancelled_at: None,
                updated_at: now,
            },
            SubscriptionState::Paused => UpdateSubscriptionLifecycleEntity {
                is_active: true,
                is_paused: true,
                cancelled_at: None,
                updated_at: now,
            },
            SubscriptionState::Cancelled => UpdateSubscriptionLifecycleEntity {
                is_active: false,
                is_paused: subscription.is_paused,
                cancelled_at: Some(now),
                updated_at: now,
            },
        };

        self.subscription_repository
            .update_lifecycle(subscription_id, lifecycle)
            .await?;

        info!(
            %subscription_id,
            from = %current,
            to = %next,
            "subscription_lifecycle: state changed"
        );

        Ok(next)
    }
}

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{
    application::usecases::{
        subscription_lifecycle::{SubscriptionLifecycleError, SubscriptionLifecycleUseCase},
        subscription_pause_observer::SubscriptionPauseObserverUseCase,
    },
    config::config_model::DotEnvyConfig,
    domain::value_objects::{
        enums::subscription_states::SubscriptionState,
        pause_classifications::PauseClassification,
        subscription_snapshots::SubscriptionSnapshot,
    },
    infrastructure::axum_http::internal_auth,
    services::daily_scheduler::DailySchedule,
};

#[derive(Clone)]
pub struct SubscriptionRouteState {
    config: Arc<DotEnvyConfig>,
    pause_observer: Arc<SubscriptionPauseObserverUseCase>,
    lifecycle: Arc<SubscriptionLifecycleUseCase>,
    schedule: DailySchedule,
}

pub fn routes(
    config: Arc<DotEnvyConfig>,
    pause_observer: Arc<SubscriptionPauseObserverUseCase>,
    lifecycle: Arc<SubscriptionLifecycleUseCase>,
    schedule: DailySchedule,
) -> Router {
    Router::new()
        .route("/:subscription_id/changes", post(subscription_changed))
        .route("/:subscription_id/pause", post(pause))
        .route("/:subscription_id/resume", post(resume))
        .route("/:subscription_id/cancel", post(cancel))
        .with_state(SubscriptionRouteState {
            config,
            pause_observer,
            lifecycle,
            schedule,
        })
}

/// Body posted by the document change feed for every subscription update.
#[derive(Debug, Deserialize)]
pub struct SubscriptionChangeRequest {
    pub before: SubscriptionSnapshot,
    pub after: SubscriptionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionChangeResponse {
    pub classification: Option<PauseClassification>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionStateResponse {
    pub subscription_id: Uuid,
    pub state: SubscriptionState,
}

pub async fn subscription_changed(
    State(state): State<SubscriptionRouteState>,
    Path(subscription_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<SubscriptionChangeRequest>,
) -> Response {
    if let Err(response) =
        internal_auth::authorize_internal(&headers, state.config.internal.api_token.as_deref())
    {
        return response;
    }

    let now = state.schedule.local_now(Utc::now());
    let classification = state.pause_observer.on_subscription_updated(
        subscription_id,
        &payload.before,
        &payload.after,
        now,
    );

    Json(SubscriptionChangeResponse { classification }).into_response()
}

pub async fn pause(
    State(state): State<SubscriptionRouteState>,
    Path(subscription_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) =
        internal_auth::authorize_internal(&headers, state.config.internal.api_token.as_deref())
    {
        return response;
    }

    state_response(subscription_id, state.lifecycle.pause(subscription_id).await)
}

pub async fn resume(
    State(state): State<SubscriptionRouteState>,
    Path(subscription_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) =
        internal_auth::authorize_internal(&headers, state.config.internal.api_token.as_deref())
    {
        return response;
    }

    state_response(subscription_id, state.lifecycle.resume(subscription_id).await)
}

pub async fn cancel(
    State(state): State<SubscriptionRouteState>,
    Path(subscription_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) =
        internal_auth::authorize_internal(&headers, state.config.internal.api_token.as_deref())
    {
        return response;
    }

    state_response(
        subscription_id,
        state.lifecycle.cancel(subscription_id, Utc::now()).await,
    )
}

fn state_response(
    subscription_id: Uuid,
    result: Result<SubscriptionState, SubscriptionLifecycleError>,
) -> Response {
    match result {
        Ok(state) => Json(SubscriptionStateResponse {
            subscription_id,
            state,
        })
        .into_response(),
        Err(SubscriptionLifecycleError::Internal(err)) => {
            error!(%subscription_id, error = ?err, "subscriptions: lifecycle update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
                .into_response()
        }
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

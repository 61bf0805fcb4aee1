use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    application::usecases::materialize_recurring_expenses::MaterializeRecurringExpensesUseCase,
    config::config_model::DotEnvyConfig, infrastructure::axum_http::internal_auth,
    services::daily_scheduler::DailySchedule,
};

// Run example
//   curl -X POST "http://localhost:$SERVER_PORT/internal/v1/materializations" \
//     -H "Authorization: Bearer $INTERNAL_API_TOKEN" \
//     -H "Content-Type: application/json" \
//     -d '{"run_date":"2024-06-05"}'

#[derive(Clone)]
pub struct MaterializationRouteState {
    config: Arc<DotEnvyConfig>,
    usecase: Arc<MaterializeRecurringExpensesUseCase>,
    schedule: DailySchedule,
}

pub fn routes(
    config: Arc<DotEnvyConfig>,
    usecase: Arc<MaterializeRecurringExpensesUseCase>,
    schedule: DailySchedule,
) -> Router {
    Router::new()
        .route("/", post(run_materialization))
        .with_state(MaterializationRouteState {
            config,
            usecase,
            schedule,
        })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterializationRequest {
    /// Defaults to today in the billing timezone.
    pub run_date: Option<NaiveDate>,
}

/// An empty body means "today"; anything else must be a valid request.
fn parse_request(body: &[u8]) -> Result<MaterializationRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MaterializationRequest::default());
    }
    serde_json::from_slice(body)
}

pub async fn run_materialization(
    State(state): State<MaterializationRouteState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(response) =
        internal_auth::authorize_internal(&headers, state.config.internal.api_token.as_deref())
    {
        return response;
    }

    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "materializations: rejected request body");
            return (StatusCode::BAD_REQUEST, format!("invalid request body: {err}"))
                .into_response();
        }
    };

    let run_date = request
        .run_date
        .unwrap_or_else(|| state.schedule.local_date(Utc::now()));

    info!(%run_date, "materializations: manual run requested");

    match state.usecase.run(run_date).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            error!(error = ?err, "materializations: usecase failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "materialization failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usecases::materialize_recurring_expenses::MaterializerSettings,
        config::config_model::{Database, Internal, Materializer, Server},
        domain::{
            repositories::{
                expenses::MockExpenseRepository, subscriptions::MockSubscriptionRepository,
            },
            value_objects::enums::billing_day_overflow::BillingDayOverflow,
        },
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header::AUTHORIZATION},
    };
    use chrono::NaiveTime;
    use tower::ServiceExt;

    const TOKEN: &str = "internal-token";

    fn config() -> Arc<DotEnvyConfig> {
        Arc::new(DotEnvyConfig {
            server: Server {
                port: 0,
                body_limit: 1,
                timeout: 30,
            },
            database: Database {
                url: "postgres://unused".to_string(),
                max_connections: 1,
                connection_timeout: 1,
            },
            materializer: Materializer {
                timezone: chrono_tz::UTC,
                run_at: NaiveTime::MIN,
                run_on_startup: false,
                concurrency: 1,
                billing_day_overflow: BillingDayOverflow::Clamp,
            },
            internal: Internal {
                api_token: Some(TOKEN.to_string()),
            },
        })
    }

    fn router(listing_calls: usize) -> Router {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_list_active_uncancelled_subscriptions()
            .times(listing_calls)
            .returning(|| Box::pin(async { Ok(Vec::new()) }));

        let usecase = Arc::new(MaterializeRecurringExpensesUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(MockExpenseRepository::new()),
            MaterializerSettings::default(),
        ));

        routes(
            config(),
            usecase,
            DailySchedule::new(chrono_tz::UTC, NaiveTime::MIN),
        )
    }

    fn request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(AUTHORIZATION, format!("Bearer {TOKEN}"))
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn runs_requested_date() {
        let response = router(1)
            .oneshot(request(r#"{"run_date":"2024-03-15"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let report: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(report["run_date"], "2024-03-15");
    }

    #[tokio::test]
    async fn empty_body_runs_today() {
        let response = router(1).oneshot(request("")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_run_date_is_rejected_without_running() {
        for body in [
            r#"{"run_date":"2024-13-01"}"#,
            r#"{"run_date":"06/05/2024"}"#,
            r#"{"rundate":"2024-06-05"}"#,
            "not json",
        ] {
            let response = router(0).oneshot(request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let response = router(0)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

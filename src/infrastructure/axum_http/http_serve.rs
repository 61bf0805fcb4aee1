use crate::{
    application::usecases::{
        materialize_recurring_expenses::MaterializeRecurringExpensesUseCase,
        subscription_lifecycle::SubscriptionLifecycleUseCase,
        subscription_pause_observer::SubscriptionPauseObserverUseCase,
    },
    config::config_model::DotEnvyConfig,
    infrastructure::axum_http::{default_routers, routers},
    services::daily_scheduler::DailySchedule,
};
use anyhow::Result;
use axum::{Router, routing::get};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

pub struct HttpUseCases {
    pub materialize: Arc<MaterializeRecurringExpensesUseCase>,
    pub pause_observer: Arc<SubscriptionPauseObserverUseCase>,
    pub lifecycle: Arc<SubscriptionLifecycleUseCase>,
}

pub async fn start(
    config: Arc<DotEnvyConfig>,
    usecases: HttpUseCases,
    schedule: DailySchedule,
) -> Result<()> {
    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/internal/v1/materializations",
            routers::materializations::routes(
                Arc::clone(&config),
                usecases.materialize,
                schedule,
            ),
        )
        .nest(
            "/internal/v1/subscriptions",
            routers::subscriptions::routes(
                Arc::clone(&config),
                usecases.pause_observer,
                usecases.lifecycle,
                schedule,
            ),
        )
        .route("/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = ?err, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}

use anyhow::Result;
use recurring_expenses::{
    application::usecases::{
        materialize_recurring_expenses::{MaterializeRecurringExpensesUseCase, MaterializerSettings},
        subscription_lifecycle::SubscriptionLifecycleUseCase,
        subscription_pause_observer::SubscriptionPauseObserverUseCase,
    },
    config::config_loader,
    domain::repositories::{expenses::ExpenseRepository, subscriptions::SubscriptionRepository},
    infrastructure::{
        axum_http::http_serve::{self, HttpUseCases},
        postgres::{
            postgres_connection,
            repositories::{expenses::ExpensePostgres, subscriptions::SubscriptionPostgres},
        },
    },
    observability,
    services::daily_scheduler::{self, DailySchedule},
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Service exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("recurring-expenses")?;

    let dotenvy_env = Arc::new(config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let subscription_repository: Arc<dyn SubscriptionRepository + Send + Sync> =
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool_arc)));
    let expense_repository: Arc<dyn ExpenseRepository + Send + Sync> =
        Arc::new(ExpensePostgres::new(Arc::clone(&db_pool_arc)));

    let materializer_config = &dotenvy_env.materializer;
    let schedule = DailySchedule::new(materializer_config.timezone, materializer_config.run_at);

    let materialize_usecase = Arc::new(MaterializeRecurringExpensesUseCase::new(
        Arc::clone(&subscription_repository),
        Arc::clone(&expense_repository),
        MaterializerSettings {
            billing_day_overflow: materializer_config.billing_day_overflow,
            concurrency: materializer_config.concurrency,
        },
    ));
    let pause_observer_usecase = Arc::new(SubscriptionPauseObserverUseCase::new(
        materializer_config.billing_day_overflow,
    ));
    let lifecycle_usecase = Arc::new(SubscriptionLifecycleUseCase::new(Arc::clone(
        &subscription_repository,
    )));

    info!(
        timezone = %materializer_config.timezone,
        run_at = %materializer_config.run_at,
        billing_day_overflow = %materializer_config.billing_day_overflow,
        concurrency = materializer_config.concurrency,
        "Materializer configured"
    );

    let scheduler_loop = tokio::spawn(daily_scheduler::run_daily_materialization_loop(
        Arc::clone(&materialize_usecase),
        schedule,
        materializer_config.run_on_startup,
    ));

    let server_config = Arc::clone(&dotenvy_env);
    let http_server = tokio::spawn(async move {
        http_serve::start(
            server_config,
            HttpUseCases {
                materialize: materialize_usecase,
                pause_observer: pause_observer_usecase,
                lifecycle: lifecycle_usecase,
            },
            schedule,
        )
        .await
    });

    // The server stops on a shutdown signal; the scheduler only on error.
    tokio::select! {
        result = scheduler_loop => result??,
        result = http_server => result??,
    };

    Ok(())
}

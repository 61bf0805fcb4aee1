use anyhow::Result;
use chrono::NaiveDate;
use futures_util::{StreamExt, stream};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::{
    entities::{expenses::InsertSubscriptionExpenseEntity, subscriptions::SubscriptionEntity},
    repositories::{expenses::ExpenseRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        billing_period::BillingPeriod,
        enums::{billing_day_overflow::BillingDayOverflow, subscription_states::SubscriptionState},
        materialization::{
            MaterializationOutcome, MaterializationReport, SubscriptionMaterialization,
        },
        recurring_charges::RecurringCharge,
    },
};

#[derive(Debug, Clone, Copy)]
pub struct MaterializerSettings {
    pub billing_day_overflow: BillingDayOverflow,
    pub concurrency: usize,
}

impl Default for MaterializerSettings {
    fn default() -> Self {
        Self {
            billing_day_overflow: BillingDayOverflow::Clamp,
            concurrency: 4,
        }
    }
}

/// Turns eligible subscriptions into one expense per billing period.
///
/// Safe to run any number of times a day: a subscription that already has an
/// expense for the current billing period is left alone.
pub struct MaterializeRecurringExpensesUseCase {
    subscription_repository: Arc<dyn SubscriptionRepository + Send + Sync>,
    expense_repository: Arc<dyn ExpenseRepository + Send + Sync>,
    settings: MaterializerSettings,
}

impl MaterializeRecurringExpensesUseCase {
    pub fn new(
        subscription_repository: Arc<dyn SubscriptionRepository + Send + Sync>,
        expense_repository: Arc<dyn ExpenseRepository + Send + Sync>,
        settings: MaterializerSettings,
    ) -> Self {
        Self {
            subscription_repository,
            expense_repository,
            settings,
        }
    }

    /// Only the subscription listing can fail the whole run; everything after
    /// that is recorded per subscription in the report.
    pub async fn run(&self, today: NaiveDate) -> Result<MaterializationReport> {
        let billing_period = BillingPeriod::containing(today);

        let subscriptions = self
            .subscription_repository
            .list_active_uncancelled_subscriptions()
            .await?;

        info!(
            run_date = %today,
            billing_period = %billing_period,
            active_subscriptions = subscriptions.len(),
            "materializer: started"
        );

        let overflow = self.settings.billing_day_overflow;
        let items = stream::iter(subscriptions)
            .map(|subscription| {
                let expense_repository = Arc::clone(&self.expense_repository);
                async move {
                    let subscription_id = subscription.id;
                    let outcome = materialize(
                        expense_repository,
                        subscription,
                        billing_period,
                        overflow,
                    )
                    .await;
                    SubscriptionMaterialization {
                        subscription_id,
                        outcome,
                    }
                }
            })
            .buffer_unordered(self.settings.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut report = MaterializationReport::new(today, billing_period);
        for item in items {
            report.record(item);
        }

        info!(
            run_date = %report.run_date,
            billing_period = %report.billing_period,
            scanned = report.scanned,
            created = report.created,
            already_existing = report.already_existing,
            skipped_paused = report.skipped_paused,
            skipped_malformed = report.skipped_malformed,
            failed = report.failed,
            "materializer: completed"
        );

        Ok(report)
    }
}

async fn materialize(
    expense_repository: Arc<dyn ExpenseRepository + Send + Sync>,
    subscription: SubscriptionEntity,
    billing_period: BillingPeriod,
    overflow: BillingDayOverflow,
) -> MaterializationOutcome {
    let subscription_id = subscription.id;

    match subscription.state() {
        Ok(SubscriptionState::Paused) => {
            info!(
                %subscription_id,
                name = %subscription.name,
                "materializer: subscription is paused; skipping"
            );
            return MaterializationOutcome::SkippedPaused;
        }
        Ok(state) if !state.is_materializable() => {
            // The listing filters these out; a racing cancel can still slip through.
            info!(%subscription_id, %state, "materializer: subscription not billable; skipping");
            return MaterializationOutcome::SkippedMalformed {
                reason: format!("subscription is {state}"),
            };
        }
        Ok(_) => {}
        Err(err) => {
            warn!(%subscription_id, error = %err, "materializer: inconsistent lifecycle flags; skipping");
            return MaterializationOutcome::SkippedMalformed {
                reason: err.to_string(),
            };
        }
    }

    let charge = match RecurringCharge::try_from(&subscription) {
        Ok(charge) => charge,
        Err(err) => {
            warn!(%subscription_id, error = %err, "materializer: malformed subscription; skipping");
            return MaterializationOutcome::SkippedMalformed {
                reason: err.to_string(),
            };
        }
    };

    match expense_repository
        .find_subscription_expense_for_period(subscription_id, billing_period)
        .await
    {
        Ok(Some(existing)) => {
            info!(
                %subscription_id,
                expense_id = %existing.id,
                %billing_period,
                "materializer: expense for this period already exists"
            );
            return MaterializationOutcome::AlreadyExists;
        }
        Ok(None) => {}
        Err(err) => {
            error!(%subscription_id, error = ?err, "materializer: failed to look up existing expense");
            return MaterializationOutcome::Failed {
                error: format!("{err:#}"),
            };
        }
    }

    let billing_date = billing_period.billing_date(charge.billing_day, overflow);

    let insert_expense_entity = InsertSubscriptionExpenseEntity {
        user_id: subscription.user_id,
        subscription_id,
        amount: charge.amount,
        currency: subscription.currency,
        description: expense_description(&subscription.name),
        category: subscription.category,
        date: billing_date,
        billing_period: billing_period.first_day(),
    };

    match expense_repository
        .insert_subscription_expense(insert_expense_entity)
        .await
    {
        Ok(Some(expense_id)) => {
            info!(
                %subscription_id,
                %expense_id,
                %billing_date,
                "materializer: expense created"
            );
            MaterializationOutcome::Created {
                expense_id,
                billing_date,
            }
        }
        Ok(None) => {
            warn!(
                %subscription_id,
                %billing_period,
                "materializer: expense was inserted concurrently; keeping the existing one"
            );
            MaterializationOutcome::AlreadyExists
        }
        Err(err) => {
            error!(%subscription_id, error = ?err, "materializer: failed to insert expense");
            MaterializationOutcome::Failed {
                error: format!("{err:#}"),
            }
        }
    }
}

pub fn expense_description(subscription_name: &str) -> String {
    format!("{} subscription fee", subscription_name)
}

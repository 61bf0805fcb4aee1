use chrono::{NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::value_objects::{
    billing_period::{BillingDay, BillingPeriod},
    enums::{billing_day_overflow::BillingDayOverflow, pause_timings::PauseTiming},
    pause_classifications::PauseClassification,
    subscription_snapshots::SubscriptionSnapshot,
};

/// Audits the moment a subscription gets paused relative to its billing day.
///
/// Writes nothing: a paused subscription is already excluded by the
/// materializer, and an expense created earlier in the period stays as is.
pub struct SubscriptionPauseObserverUseCase {
    billing_day_overflow: BillingDayOverflow,
}

impl SubscriptionPauseObserverUseCase {
    pub fn new(billing_day_overflow: BillingDayOverflow) -> Self {
        Self {
            billing_day_overflow,
        }
    }

    /// `now` is local wall-clock time in the billing timezone.
    pub fn on_subscription_updated(
        &self,
        subscription_id: Uuid,
        before: &SubscriptionSnapshot,
        after: &SubscriptionSnapshot,
        now: NaiveDateTime,
    ) -> Option<PauseClassification> {
        if before.is_paused() || !after.is_paused() {
            debug!(%subscription_id, "pause_observer: not a pause transition; ignoring");
            return None;
        }

        info!(%subscription_id, "pause_observer: subscription paused");

        let billing_day = match BillingDay::from_optional(after.billing_day) {
            Ok(billing_day) => billing_day,
            Err(err) => {
                warn!(
                    %subscription_id,
                    error = %err,
                    "pause_observer: cannot classify pause without a valid billing day"
                );
                return None;
            }
        };

        let billing_date = BillingPeriod::containing(now.date())
            .billing_date(billing_day, self.billing_day_overflow);

        let timing = if now < billing_date.and_time(NaiveTime::MIN) {
            PauseTiming::PausedBeforeBilling
        } else {
            PauseTiming::PausedAfterBilling
        };

        match timing {
            PauseTiming::PausedBeforeBilling => info!(
                %subscription_id,
                %billing_date,
                observed_at = %now,
                %timing,
                "pause_observer: paused before billing date; no expense expected this period"
            ),
            PauseTiming::PausedAfterBilling => info!(
                %subscription_id,
                %billing_date,
                observed_at = %now,
                %timing,
                "pause_observer: paused on or after billing date; this period's expense is kept"
            ),
        }

        Some(PauseClassification {
            subscription_id,
            timing,
            billing_date,
            observed_at: now,
        })
    }
}

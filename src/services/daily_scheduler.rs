use anyhow::Result;
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{error, info};

use crate::application::usecases::materialize_recurring_expenses::MaterializeRecurringExpensesUseCase;

/// Fires once a day at `run_at` wall-clock time in `timezone`.
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    pub timezone: Tz,
    pub run_at: NaiveTime,
}

impl DailySchedule {
    pub fn new(timezone: Tz, run_at: NaiveTime) -> Self {
        Self { timezone, run_at }
    }

    pub fn local_now(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.timezone).naive_local()
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local_now(instant).date()
    }

    /// First firing instant strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = self.local_date(now);

        let mut date = today;
        loop {
            let candidate = self.resolve_local(date.and_time(self.run_at));
            if candidate > now {
                return candidate;
            }
            date = match date.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => return now + Duration::days(1),
            };
        }
    }

    /// Maps a local wall-clock time to an instant. Ambiguous times take the
    /// earlier instant; times inside a DST gap move forward until they exist.
    fn resolve_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let mut candidate = local;
        for _ in 0..8 {
            if let Some(instant) = self.timezone.from_local_datetime(&candidate).earliest() {
                return instant.with_timezone(&Utc);
            }
            candidate += Duration::minutes(30);
        }
        Utc.from_utc_datetime(&local)
    }
}

pub async fn run_daily_materialization_loop(
    usecase: Arc<MaterializeRecurringExpensesUseCase>,
    schedule: DailySchedule,
    run_on_startup: bool,
) -> Result<()> {
    if run_on_startup {
        info!("scheduler: running materialization on startup");
        run_materialization(&usecase, &schedule).await;
    }

    loop {
        let now = Utc::now();
        let next_run = schedule.next_run_after(now);
        let wait = (next_run - now).to_std().unwrap_or_default();

        info!(
            next_run = %next_run.with_timezone(&schedule.timezone),
            wait_secs = wait.as_secs(),
            "scheduler: waiting for next materialization"
        );

        tokio::time::sleep(wait).await;
        run_materialization(&usecase, &schedule).await;
    }
}

async fn run_materialization(
    usecase: &MaterializeRecurringExpensesUseCase,
    schedule: &DailySchedule,
) {
    let today = schedule.local_date(Utc::now());

    match usecase.run(today).await {
        Ok(report) if report.failed > 0 => error!(
            run_date = %today,
            failed = report.failed,
            created = report.created,
            "scheduler: materialization finished with failures"
        ),
        Ok(_) => {}
        Err(err) => error!(run_date = %today, error = ?err, "scheduler: materialization run failed"),
    }
}

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::billing_period::BillingPeriod;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MaterializationOutcome {
    Created {
        expense_id: Uuid,
        billing_date: NaiveDate,
    },
    AlreadyExists,
    SkippedPaused,
    SkippedMalformed {
        reason: String,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubscriptionMaterialization {
    pub subscription_id: Uuid,
    #[serde(flatten)]
    pub outcome: MaterializationOutcome,
}

/// Summary of one materializer run.
#[derive(Debug, Clone, Serialize)]
pub struct MaterializationReport {
    pub run_date: NaiveDate,
    pub billing_period: BillingPeriod,
    pub scanned: usize,
    pub created: usize,
    pub already_existing: usize,
    pub skipped_paused: usize,
    pub skipped_malformed: usize,
    pub failed: usize,
    pub items: Vec<SubscriptionMaterialization>,
}

impl MaterializationReport {
    pub fn new(run_date: NaiveDate, billing_period: BillingPeriod) -> Self {
        Self {
            run_date,
            billing_period,
            scanned: 0,
            created: 0,
            already_existing: 0,
            skipped_paused: 0,
            skipped_malformed: 0,
            failed: 0,
            items: Vec::new(),
        }
    }

    pub fn record(&mut self, item: SubscriptionMaterialization) {
        self.scanned += 1;
        match item.outcome {
            MaterializationOutcome::Created { .. } => self.created += 1,
            MaterializationOutcome::AlreadyExists => self.already_existing += 1,
            MaterializationOutcome::SkippedPaused => self.skipped_paused += 1,
            MaterializationOutcome::SkippedMalformed { .. } => self.skipped_malformed += 1,
            MaterializationOutcome::Failed { .. } => self.failed += 1,
        }
        self.items.push(item);
    }

    pub fn outcome_for(&self, subscription_id: Uuid) -> Option<&MaterializationOutcome> {
        self.items
            .iter()
            .find(|item| item.subscription_id == subscription_id)
            .map(|item| &item.outcome)
    }
}

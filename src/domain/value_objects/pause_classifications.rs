use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::enums::pause_timings::PauseTiming;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PauseClassification {
    pub subscription_id: Uuid,
    pub timing: PauseTiming,
    pub billing_date: NaiveDate,
    pub observed_at: NaiveDateTime,
}

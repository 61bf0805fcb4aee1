use std::fmt::Display;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::domain::value_objects::enums::billing_day_overflow::BillingDayOverflow;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillingDayError {
    #[error("billing day is missing")]
    Missing,
    #[error("billing day {0} is outside 1..=31")]
    OutOfRange(i32),
}

/// Day of month on which a subscription bills, always within `1..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BillingDay(u32);

impl BillingDay {
    pub fn new(day: i32) -> Result<Self, BillingDayError> {
        if (1..=31).contains(&day) {
            Ok(Self(day as u32))
        } else {
            Err(BillingDayError::OutOfRange(day))
        }
    }

    pub fn from_optional(day: Option<i32>) -> Result<Self, BillingDayError> {
        day.ok_or(BillingDayError::Missing).and_then(Self::new)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i32> for BillingDay {
    type Error = BillingDayError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BillingDay> for i32 {
    fn from(value: BillingDay) -> Self {
        value.0 as i32
    }
}

/// One calendar month; the dedup granularity for materialized expenses.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillingPeriod {
    first_day: NaiveDate,
}

impl BillingPeriod {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day + Months::new(1) - Days::new(1)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.first_day..=self.last_day()).contains(&date)
    }

    /// Applies `billing_day` to this month. Days past the end of the month are
    /// resolved according to `overflow`.
    pub fn billing_date(&self, billing_day: BillingDay, overflow: BillingDayOverflow) -> NaiveDate {
        let day = billing_day.get();
        if day <= self.days_in_month() {
            return self.first_day + Days::new(u64::from(day - 1));
        }

        match overflow {
            BillingDayOverflow::Clamp => self.last_day(),
            BillingDayOverflow::Rollover => self.first_day + Days::new(u64::from(day - 1)),
        }
    }
}

impl Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

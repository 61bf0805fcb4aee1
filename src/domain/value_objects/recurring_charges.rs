use thiserror::Error;

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    value_objects::billing_period::{BillingDay, BillingDayError},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedSubscriptionError {
    #[error("amount is missing")]
    MissingAmount,
    #[error("amount {0} is not positive")]
    NonPositiveAmount(i64),
    #[error(transparent)]
    BillingDay(#[from] BillingDayError),
}

/// The validated part of a subscription needed to bill it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringCharge {
    pub amount: i64,
    pub billing_day: BillingDay,
}

impl TryFrom<&SubscriptionEntity> for RecurringCharge {
    type Error = MalformedSubscriptionError;

    fn try_from(subscription: &SubscriptionEntity) -> Result<Self, Self::Error> {
        let amount = subscription
            .amount
            .ok_or(MalformedSubscriptionError::MissingAmount)?;
        if amount <= 0 {
            return Err(MalformedSubscriptionError::NonPositiveAmount(amount));
        }

        let billing_day = BillingDay::from_optional(subscription.billing_day)?;

        Ok(Self {
            amount,
            billing_day,
        })
    }
}

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of a subscription as far as expense generation is concerned.
///
/// The store keeps the state as three loose fields (`is_active`, `is_paused`,
/// `cancelled_at`); [`SubscriptionState::from_flags`] is the only way to read
/// them back and rejects combinations no write path should produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    Active,
    Paused,
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("subscription is marked active but has a cancellation timestamp")]
    ActiveWithCancellation,
    #[error("subscription is inactive but has no cancellation timestamp")]
    InactiveWithoutCancellation,
    #[error("cannot move subscription from {from} to {to}")]
    InvalidTransition {
        from: SubscriptionState,
        to: SubscriptionState,
    },
}

impl Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self {
            SubscriptionState::Active => "active",
            SubscriptionState::Paused => "paused",
            SubscriptionState::Cancelled => "cancelled",
        };
        write!(f, "{}", state)
    }
}

impl SubscriptionState {
    pub fn from_flags(
        is_active: bool,
        is_paused: bool,
        cancelled_at: Option<DateTime<Utc>>,
    ) -> Result<Self, LifecycleError> {
        match (is_active, cancelled_at) {
            (true, Some(_)) => Err(LifecycleError::ActiveWithCancellation),
            (false, None) => Err(LifecycleError::InactiveWithoutCancellation),
            (false, Some(_)) => Ok(SubscriptionState::Cancelled),
            (true, None) if is_paused => Ok(SubscriptionState::Paused),
            (true, None) => Ok(SubscriptionState::Active),
        }
    }

    /// Only active subscriptions produce expenses.
    pub fn is_materializable(&self) -> bool {
        matches!(self, SubscriptionState::Active)
    }

    pub fn pause(self) -> Result<Self, LifecycleError> {
        match self {
            SubscriptionState::Active => Ok(SubscriptionState::Paused),
            from => Err(LifecycleError::InvalidTransition {
                from,
                to: SubscriptionState::Paused,
            }),
        }
    }

    pub fn resume(self) -> Result<Self, LifecycleError> {
        match self {
            SubscriptionState::Paused => Ok(SubscriptionState::Active),
            from => Err(LifecycleError::InvalidTransition {
                from,
                to: SubscriptionState::Active,
            }),
        }
    }

    pub fn cancel(self) -> Result<Self, LifecycleError> {
        match self {
            SubscriptionState::Active | SubscriptionState::Paused => {
                Ok(SubscriptionState::Cancelled)
            }
            SubscriptionState::Cancelled => Err(LifecycleError::InvalidTransition {
                from: SubscriptionState::Cancelled,
                to: SubscriptionState::Cancelled,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_states_from_stored_flags() {
        let now = Utc::now();

        assert_eq!(
            SubscriptionState::from_flags(true, false, None),
            Ok(SubscriptionState::Active)
        );
        assert_eq!(
            SubscriptionState::from_flags(true, true, None),
            Ok(SubscriptionState::Paused)
        );
        assert_eq!(
            SubscriptionState::from_flags(false, false, Some(now)),
            Ok(SubscriptionState::Cancelled)
        );
        assert_eq!(
            SubscriptionState::from_flags(false, true, Some(now)),
            Ok(SubscriptionState::Cancelled)
        );
    }

    #[test]
    fn rejects_contradictory_flags() {
        assert_eq!(
            SubscriptionState::from_flags(true, false, Some(Utc::now())),
            Err(LifecycleError::ActiveWithCancellation)
        );
        assert_eq!(
            SubscriptionState::from_flags(false, false, None),
            Err(LifecycleError::InactiveWithoutCancellation)
        );
    }

    #[test]
    fn allows_documented_transitions() {
        assert_eq!(
            SubscriptionState::Active.pause(),
            Ok(SubscriptionState::Paused)
        );
        assert_eq!(
            SubscriptionState::Paused.resume(),
            Ok(SubscriptionState::Active)
        );
        assert_eq!(
            SubscriptionState::Active.cancel(),
            Ok(SubscriptionState::Cancelled)
        );
        assert_eq!(
            SubscriptionState::Paused.cancel(),
            Ok(SubscriptionState::Cancelled)
        );
    }

    #[test]
    fn cancelled_is_terminal() {
        for result in [
            SubscriptionState::Cancelled.pause(),
            SubscriptionState::Cancelled.resume(),
            SubscriptionState::Cancelled.cancel(),
        ] {
            assert!(matches!(
                result,
                Err(LifecycleError::InvalidTransition {
                    from: SubscriptionState::Cancelled,
                    ..
                })
            ));
        }
    }

    #[test]
    fn rejects_redundant_pause_and_resume() {
        assert!(SubscriptionState::Paused.pause().is_err());
        assert!(SubscriptionState::Active.resume().is_err());
    }

    #[test]
    fn only_active_is_materializable() {
        assert!(SubscriptionState::Active.is_materializable());
        assert!(!SubscriptionState::Paused.is_materializable());
        assert!(!SubscriptionState::Cancelled.is_materializable());
    }
}

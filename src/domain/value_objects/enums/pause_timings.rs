use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PauseTiming {
    /// No expense is expected for the current period.
    PausedBeforeBilling,
    /// An expense may already exist for the current period and is left untouched.
    PausedAfterBilling,
}

impl Display for PauseTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let timing = match self {
            PauseTiming::PausedBeforeBilling => "paused-before-billing",
            PauseTiming::PausedAfterBilling => "paused-after-billing",
        };
        write!(f, "{}", timing)
    }
}

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// What to do with a billing day that does not exist in the billing month
/// (e.g. the 31st in June).
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillingDayOverflow {
    /// Bill on the last day of the month.
    #[default]
    Clamp,
    /// Carry the surplus days into the next month (31 in June -> July 1).
    Rollover,
}

impl Display for BillingDayOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let overflow = match self {
            BillingDayOverflow::Clamp => "clamp",
            BillingDayOverflow::Rollover => "rollover",
        };
        write!(f, "{}", overflow)
    }
}

impl TryFrom<&str> for BillingDayOverflow {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(BillingDayOverflow::Clamp),
            "rollover" => Ok(BillingDayOverflow::Rollover),
            other => Err(anyhow::anyhow!("unknown billing day overflow: {other}")),
        }
    }
}

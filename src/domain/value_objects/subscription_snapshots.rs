use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A subscription document as delivered by the change feed. Every field is
/// optional because the feed forwards whatever the writer stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SubscriptionSnapshot {
    pub name: Option<String>,
    pub billing_day: Option<i32>,
    pub is_active: Option<bool>,
    pub is_paused: Option<bool>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl SubscriptionSnapshot {
    /// Absent means not paused.
    pub fn is_paused(&self) -> bool {
        self.is_paused.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_document_fields_with_defaults() {
        let snapshot: SubscriptionSnapshot =
            serde_json::from_str(r#"{"billingDay": 15, "isActive": true}"#).unwrap();

        assert_eq!(snapshot.billing_day, Some(15));
        assert!(!snapshot.is_paused());

        let paused: SubscriptionSnapshot =
            serde_json::from_str(r#"{"isPaused": true, "unknownField": 1}"#).unwrap();
        assert!(paused.is_paused());
    }

    #[test]
    fn out_of_range_billing_day_still_decodes() {
        let snapshot: SubscriptionSnapshot =
            serde_json::from_str(r#"{"billingDay": 42, "isPaused": true}"#).unwrap();

        assert_eq!(snapshot.billing_day, Some(42));
        assert!(snapshot.is_paused());
    }
}

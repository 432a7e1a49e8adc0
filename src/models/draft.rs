//! Held order (draft) model.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PaymentStatus;
use super::order::LineItem;

/// A composed-but-unsubmitted order, persisted locally so staff can
/// recover in-progress work after a restart.
///
/// A held order leaves the store exactly when it is reloaded into the
/// composition buffer or explicitly deleted; it never silently expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// Unique local id; never reused.
    pub id: Uuid,
    pub waiter: String,
    #[serde(default)]
    pub customer: Option<String>,
    pub items: Vec<LineItem>,
    #[serde(rename = "paymentStatus")]
    pub payment_status: PaymentStatus,
    /// Wall-clock label shown in the held-orders list.
    pub saved_at: String,
}

impl Draft {
    /// Creates a new draft stamped with the current local time.
    pub fn new(
        waiter: impl Into<String>,
        customer: Option<String>,
        items: Vec<LineItem>,
        payment_status: PaymentStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            waiter: waiter.into(),
            customer,
            items,
            payment_status,
            saved_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drafts_get_distinct_ids() {
        let a = Draft::new("Zaid", None, vec![], PaymentStatus::Unpaid);
        let b = Draft::new("Zaid", None, vec![], PaymentStatus::Unpaid);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn draft_round_trips_through_json() {
        let draft = Draft::new(
            "Hassan",
            Some("Table 4".to_string()),
            vec![LineItem {
                name: "Pita Kebab".to_string(),
                note: Some("no onion".to_string()),
                drink: Some("Cola".to_string()),
            }],
            PaymentStatus::Paid,
        );
        let json = serde_json::to_string(&draft).unwrap();
        let back: Draft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }
}

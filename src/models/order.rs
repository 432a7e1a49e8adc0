//! Order and line item models.

use serde::{Deserialize, Serialize};

use super::PaymentStatus;

/// Item-name keywords identifying entrée items. Only entrées carry a
/// paired drink selection on the kitchen display.
const ENTREE_KEYWORDS: [&str; 2] = ["kebab", "kana"];

/// An order as served by the backlog service.
///
/// Open orders carry no completion fields; completed orders (from the
/// completed-list endpoints) additionally carry `completedAt` and the
/// derived `durationMinutes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Server-assigned identity.
    pub id: u64,
    /// Display-only custom id, when the submitting side assigned one.
    #[serde(default, rename = "customId", skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    pub waiter: String,
    #[serde(default)]
    pub customer: Option<String>,
    pub items: Vec<LineItem>,
    #[serde(default, rename = "paymentStatus")]
    pub payment_status: PaymentStatus,
    /// Wall-clock creation label, as formatted by the backend.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, rename = "completedAt", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, rename = "durationMinutes", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
}

impl Order {
    /// Returns the customer name if present and non-empty.
    pub fn customer_label(&self) -> Option<&str> {
        self.customer.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// A single line of an order. Immutable once submitted; editable only
/// while still part of a held draft on the submitting side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Paired drink selection; only meaningful for entrée items.
    #[serde(default)]
    pub drink: Option<String>,
}

impl LineItem {
    /// Whether this item's name marks it as an entrée.
    pub fn is_entree(&self) -> bool {
        let lower = self.name.to_lowercase();
        ENTREE_KEYWORDS.iter().any(|kw| lower.contains(kw))
    }

    /// Whether the kitchen display should show the paired drink.
    pub fn wants_drink(&self) -> bool {
        self.is_entree() && self.drink.is_some()
    }
}

/// Payload for submitting a new order (producer side).
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub waiter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub items: Vec<LineItem>,
    pub status: &'static str,
    #[serde(rename = "paymentStatus")]
    pub payment_status: PaymentStatus,
}

impl NewOrder {
    /// Builds a submission payload. New orders always enter the
    /// backlog with status `NEW`.
    pub fn new(
        waiter: impl Into<String>,
        customer: Option<String>,
        items: Vec<LineItem>,
        payment_status: PaymentStatus,
    ) -> Self {
        Self {
            waiter: waiter.into(),
            customer,
            items,
            status: "NEW",
            payment_status,
        }
    }
}

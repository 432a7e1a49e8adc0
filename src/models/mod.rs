//! Shared models for the order backlog wire protocol.
//!
//! Field names follow the backend's JSON exactly (`paymentStatus`,
//! `completed_orders_today`, ...); everything else is idiomatic Rust.

pub mod draft;
pub mod order;
pub mod stats;

use serde::{Deserialize, Serialize};

/// Scope selector for completion statistics and completed-order lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsScope {
    Today,
    All,
}

impl StatsScope {
    /// Returns the path segment expected by the backlog service.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsScope::Today => "today",
            StatsScope::All => "total",
        }
    }
}

/// Payment state of an order, set at submission time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

//! Completion statistics wire models.

use serde::Deserialize;

/// A `{count, average duration}` pair for one stats scope.
///
/// The backend names the count field differently per scope
/// (`completed_orders_today` vs `completed_orders_total`); both map to
/// [`count`](Self::count) here.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct CompletedStats {
    #[serde(alias = "completed_orders_today", alias = "completed_orders_total")]
    pub count: u64,
    #[serde(default, alias = "avg_completion_time_minutes")]
    pub avg_minutes: f64,
}

/// Both stats scopes fetched in one poll cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsSnapshot {
    pub today: CompletedStats,
    pub total: CompletedStats,
}

/// Response to a completed-counters reset.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetResponse {
    pub message: String,
}

/// Response to a manual backup trigger.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupReceipt {
    pub status: String,
    #[serde(default)]
    pub link: Option<String>,
}

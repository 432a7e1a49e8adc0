//! Client-side view of completion statistics.
//!
//! Owns the today/all-time counters, the expanded completed-order
//! drill-downs backing them, and the destructive reset. All mutation
//! happens on the display's event loop; the poller and the completion
//! cascade feed it through messages.

use crate::models::StatsScope;
use crate::models::order::Order;
use crate::models::stats::{CompletedStats, StatsSnapshot};

/// Aggregated completion state for the kitchen display.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    today: CompletedStats,
    total: CompletedStats,
    expanded_today: bool,
    expanded_total: bool,
    completed_today: Vec<Order>,
    completed_total: Vec<Order>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both counters with a freshly fetched snapshot.
    pub fn apply_snapshot(&mut self, snapshot: StatsSnapshot) {
        self.today = snapshot.today;
        self.total = snapshot.total;
    }

    /// Stores a fetched drill-down list. Ignored when the view has
    /// been collapsed since the fetch started (lazy refresh only feeds
    /// visible views).
    pub fn apply_completed_list(&mut self, scope: StatsScope, orders: Vec<Order>) {
        if !self.is_expanded(scope) {
            return;
        }
        match scope {
            StatsScope::Today => self.completed_today = orders,
            StatsScope::All => self.completed_total = orders,
        }
    }

    pub fn counts(&self, scope: StatsScope) -> CompletedStats {
        match scope {
            StatsScope::Today => self.today,
            StatsScope::All => self.total,
        }
    }

    pub fn is_expanded(&self, scope: StatsScope) -> bool {
        match scope {
            StatsScope::Today => self.expanded_today,
            StatsScope::All => self.expanded_total,
        }
    }

    /// Every scope whose drill-down is currently expanded, for the
    /// completion cascade's lazy list refresh.
    pub fn expanded_scopes(&self) -> Vec<StatsScope> {
        let mut scopes = Vec::new();
        if self.expanded_today {
            scopes.push(StatsScope::Today);
        }
        if self.expanded_total {
            scopes.push(StatsScope::All);
        }
        scopes
    }

    /// Drill-down list for a scope. Empty until fetched.
    pub fn completed_list(&self, scope: StatsScope) -> &[Order] {
        match scope {
            StatsScope::Today => &self.completed_today,
            StatsScope::All => &self.completed_total,
        }
    }

    /// Toggles a drill-down view. Returns `true` when the view is now
    /// expanded and its list should be (lazily) fetched. Collapsing
    /// drops the backing list so a later expand refetches fresh data.
    pub fn toggle_expanded(&mut self, scope: StatsScope) -> bool {
        let flag = match scope {
            StatsScope::Today => &mut self.expanded_today,
            StatsScope::All => &mut self.expanded_total,
        };
        *flag = !*flag;
        let now_expanded = *flag;
        if !now_expanded {
            match scope {
                StatsScope::Today => self.completed_today.clear(),
                StatsScope::All => self.completed_total.clear(),
            }
        }
        now_expanded
    }

    /// Applies an operator-requested reset.
    ///
    /// Atomic from the display's perspective: acceptance zeroes both
    /// counters, clears both drill-down lists, and collapses both
    /// views in one step. Rejection changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`KebubbiError::Unauthorized`](crate::KebubbiError::Unauthorized)
    /// when the supplied secret does not match the configured one.
    pub fn reset(&mut self, supplied: &str, expected: &str) -> crate::Result<()> {
        if supplied != expected {
            return Err(crate::KebubbiError::Unauthorized(
                "incorrect reset secret".to_string(),
            ));
        }
        self.today = CompletedStats::default();
        self.total = CompletedStats::default();
        self.completed_today.clear();
        self.completed_total.clear();
        self.expanded_today = false;
        self.expanded_total = false;
        Ok(())
    }
}

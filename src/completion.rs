//! Completion coordination with duplicate-action protection.
//!
//! Marking an order done is the only client action that mutates the
//! backlog, and the only one with an explicit concurrency invariant:
//! at most one in-flight completion per order id. A second request
//! while one is pending is a no-op, never a duplicate network call.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::Result;
use crate::client::BacklogApi;
use crate::models::StatsScope;
use crate::models::order::Order;
use crate::tui::Message;

/// Result of a completion request.
#[derive(Debug, Clone)]
pub enum CompletionOutcome {
    /// The backend accepted the transition.
    Completed(Order),
    /// A completion for this id is already in flight; no request was
    /// issued. Not an error to the operator.
    AlreadyPending,
}

/// Serializes completion requests per order id.
pub struct CompletionCoordinator<A> {
    api: Arc<A>,
    in_flight: Mutex<HashSet<u64>>,
}

impl<A: BacklogApi> CompletionCoordinator<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Requests the complete-transition for `id`.
    ///
    /// On failure the order stays in the open backlog un-mutated and
    /// the caller should retry; the id is released for a new attempt.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure for a surfaced retry prompt.
    pub async fn complete(&self, id: u64) -> Result<CompletionOutcome> {
        // Checked-then-inserted atomically; holds across the await
        // only as membership, not as a lock.
        {
            let mut in_flight = self.in_flight.lock().expect("in-flight lock poisoned");
            if !in_flight.insert(id) {
                debug!(order_id = id, "completion already pending, ignoring");
                return Ok(CompletionOutcome::AlreadyPending);
            }
        }

        let result = self.api.complete_order(id).await;

        {
            let mut in_flight = self.in_flight.lock().expect("in-flight lock poisoned");
            in_flight.remove(&id);
        }

        match result {
            Ok(order) => Ok(CompletionOutcome::Completed(order)),
            Err(e) => {
                warn!(order_id = id, error = %e, "completion failed, order stays open");
                Err(e)
            }
        }
    }
}

/// Completes `id` and, on success, fires the cascade refresh: backlog,
/// stats snapshot, and the completed lists for every currently
/// expanded scope (lazy — collapsed views are not fetched).
///
/// The cascade is fire-and-forget from the display's perspective; each
/// leg publishes independently and a failed leg is retried implicitly
/// by the next poll tick.
pub async fn complete_and_cascade<A: BacklogApi>(
    coordinator: Arc<CompletionCoordinator<A>>,
    api: Arc<A>,
    tx: mpsc::UnboundedSender<Message>,
    id: u64,
    expanded: Vec<StatsScope>,
) {
    match coordinator.complete(id).await {
        Ok(CompletionOutcome::AlreadyPending) => {}
        Ok(CompletionOutcome::Completed(_)) => {
            let _ = tx.send(Message::CompletionFinished { id, error: None });
            cascade_refresh(api, tx, expanded).await;
        }
        Err(e) => {
            let _ = tx.send(Message::CompletionFinished {
                id,
                error: Some(e.to_string()),
            });
        }
    }
}

/// Re-fetches the dependent views after a state-changing action.
async fn cascade_refresh<A: BacklogApi>(
    api: Arc<A>,
    tx: mpsc::UnboundedSender<Message>,
    expanded: Vec<StatsScope>,
) {
    let (orders, stats) = tokio::join!(api.open_orders(), api.stats_snapshot());

    match orders {
        Ok(orders) => {
            let _ = tx.send(Message::Backlog(orders));
        }
        Err(e) => warn!(error = %e, "cascade backlog refresh failed"),
    }

    match stats {
        Ok(snapshot) => {
            let _ = tx.send(Message::Stats(snapshot));
        }
        Err(e) => warn!(error = %e, "cascade stats refresh failed"),
    }

    for scope in expanded {
        match api.completed_orders(scope).await {
            Ok(orders) => {
                let _ = tx.send(Message::CompletedList { scope, orders });
            }
            Err(e) => warn!(?scope, error = %e, "cascade completed-list refresh failed"),
        }
    }
}

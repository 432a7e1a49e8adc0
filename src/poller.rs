//! Fixed-cadence backlog polling and new-arrival detection.
//!
//! [`BacklogPoller`] fetches the open backlog and the stats snapshot
//! concurrently every tick and publishes results to the display's
//! message channel. Ticks are fire-and-forget: a slow fetch never
//! delays the next tick, and a stale response simply overwrites with
//! last-applied-wins semantics. Failures inside a tick are logged and
//! retried implicitly by the next tick.

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::alert::AlertDispatcher;
use crate::capability::VisibilitySignal;
use crate::client::BacklogApi;
use crate::tui::Message;

/// Returns the identifiers present in `current` but not in `previous`.
///
/// Arrival detection never fires on the very first successful poll: an
/// empty baseline means "nothing new", not "everything new".
pub fn detect_new_orders(previous: &HashSet<u64>, current: &[u64]) -> BTreeSet<u64> {
    if previous.is_empty() {
        return BTreeSet::new();
    }
    current
        .iter()
        .copied()
        .filter(|id| !previous.contains(id))
        .collect()
}

/// Polls the backlog service and drives arrival alerts.
pub struct BacklogPoller<A> {
    api: Arc<A>,
    dispatcher: Arc<AlertDispatcher>,
    visibility: VisibilitySignal,
    tx: mpsc::UnboundedSender<Message>,
    interval: Duration,
    /// Last-seen open-order ids. Empty until the first successful
    /// poll; only tick tasks mutate it.
    baseline: Arc<Mutex<HashSet<u64>>>,
}

impl<A> Clone for BacklogPoller<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            dispatcher: Arc::clone(&self.dispatcher),
            visibility: self.visibility.clone(),
            tx: self.tx.clone(),
            interval: self.interval,
            baseline: Arc::clone(&self.baseline),
        }
    }
}

impl<A: BacklogApi> BacklogPoller<A> {
    pub fn new(
        api: Arc<A>,
        dispatcher: Arc<AlertDispatcher>,
        visibility: VisibilitySignal,
        tx: mpsc::UnboundedSender<Message>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            dispatcher,
            visibility,
            tx,
            interval,
            baseline: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Runs the poll schedule until the display's message channel
    /// closes (teardown).
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if self.tx.is_closed() {
                info!("backlog poller stopped");
                return;
            }
            // Fire-and-forget: the schedule never waits for a slow fetch.
            let tick = self.clone();
            tokio::spawn(async move { tick.tick().await });
        }
    }

    /// One poll cycle: backlog and stats race independently; failure
    /// of one never blocks or corrupts the other.
    pub async fn tick(&self) {
        let (orders, stats) = tokio::join!(self.api.open_orders(), self.api.stats_snapshot());

        match orders {
            Ok(orders) => self.apply_backlog(orders),
            Err(e) => warn!(error = %e, "open backlog fetch failed"),
        }

        match stats {
            Ok(snapshot) => {
                let _ = self.tx.send(Message::Stats(snapshot));
            }
            Err(e) => warn!(error = %e, "stats fetch failed"),
        }
    }

    /// Applies a fetched backlog: detects arrivals against the
    /// baseline, dispatches alerts, and publishes the authoritative
    /// list (unconditional replace, no client-side merge).
    fn apply_backlog(&self, orders: Vec<crate::models::order::Order>) {
        let current: Vec<u64> = orders.iter().map(|o| o.id).collect();

        let newly_arrived = {
            let mut baseline = self.baseline.lock().expect("baseline lock poisoned");
            let newly_arrived = detect_new_orders(&baseline, &current);
            *baseline = current.into_iter().collect();
            newly_arrived
        };

        if !newly_arrived.is_empty() {
            let visible = self.visibility.is_visible();
            let outcome = self.dispatcher.dispatch(&newly_arrived, visible);
            debug!(orders = ?newly_arrived, ?outcome, visible, "new orders alerted");
            let _ = self.tx.send(Message::NewArrivals {
                ids: newly_arrived,
                outcome,
            });
        }

        let _ = self.tx.send(Message::Backlog(orders));
    }
}

//! Shared test helpers: an in-memory backlog service fake and
//! scripted alert channels.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use kebubbi::Result;
use kebubbi::capability::{AudioAlert, CapabilityStatus, Notifier};
use kebubbi::client::BacklogApi;
use kebubbi::models::order::Order;
use kebubbi::models::stats::StatsSnapshot;
use kebubbi::models::{PaymentStatus, StatsScope};

/// Builds a minimal open order.
pub fn order(id: u64) -> Order {
    Order {
        id,
        custom_id: None,
        waiter: "Roman".to_string(),
        customer: None,
        items: vec![],
        payment_status: PaymentStatus::Unpaid,
        time: Some("2025-08-25 12:00:00".to_string()),
        completed_at: None,
        duration_minutes: None,
    }
}

/// In-memory stand-in for the backlog service.
///
/// Counts every request so tests can assert exactly how many network
/// calls a flow produced. Completions can be held open with `gate` to
/// exercise in-flight duplicate protection deterministically.
#[derive(Default)]
pub struct FakeApi {
    pub orders: Mutex<Vec<Order>>,
    pub stats: Mutex<StatsSnapshot>,
    pub completed: Mutex<Vec<Order>>,
    pub open_fetches: AtomicUsize,
    pub stats_fetches: AtomicUsize,
    pub list_fetches: AtomicUsize,
    pub patches: AtomicUsize,
    pub fail_complete: AtomicBool,
    pub gate: Option<Arc<Notify>>,
}

impl FakeApi {
    pub fn with_orders(ids: &[u64]) -> Self {
        let api = Self::default();
        api.set_orders(ids);
        api
    }

    pub fn set_orders(&self, ids: &[u64]) {
        *self.orders.lock().unwrap() = ids.iter().copied().map(order).collect();
    }
}

impl BacklogApi for FakeApi {
    async fn open_orders(&self) -> Result<Vec<Order>> {
        self.open_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn stats_snapshot(&self) -> Result<StatsSnapshot> {
        self.stats_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(*self.stats.lock().unwrap())
    }

    async fn completed_orders(&self, _scope: StatsScope) -> Result<Vec<Order>> {
        self.list_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.completed.lock().unwrap().clone())
    }

    async fn complete_order(&self, id: u64) -> Result<Order> {
        self.patches.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_complete.load(Ordering::SeqCst) {
            return Err(kebubbi::KebubbiError::Api("backend unavailable".to_string()));
        }
        let mut orders = self.orders.lock().unwrap();
        let index = orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| kebubbi::KebubbiError::Api(format!("order {id} not open")))?;
        let mut completed = orders.remove(index);
        completed.completed_at = Some("2025-08-25 12:09:00".to_string());
        completed.duration_minutes = Some(9.0);
        Ok(completed)
    }
}

/// Audio channel with a scripted probe result.
pub struct ScriptedAudio {
    pub status: CapabilityStatus,
    pub plays: Arc<AtomicUsize>,
}

impl ScriptedAudio {
    pub fn granted() -> (Self, Arc<AtomicUsize>) {
        let plays = Arc::new(AtomicUsize::new(0));
        (
            Self {
                status: CapabilityStatus::Granted,
                plays: Arc::clone(&plays),
            },
            plays,
        )
    }
}

impl AudioAlert for ScriptedAudio {
    fn probe(&self) -> CapabilityStatus {
        self.status
    }

    fn play(&self) -> Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Notifier that records every delivered body.
pub struct RecordingNotifier {
    pub status: CapabilityStatus,
    pub bodies: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn granted() -> (Self, Arc<Mutex<Vec<String>>>) {
        let bodies = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                status: CapabilityStatus::Granted,
                bodies: Arc::clone(&bodies),
            },
            bodies,
        )
    }
}

impl Notifier for RecordingNotifier {
    fn permission(&self) -> CapabilityStatus {
        self.status
    }

    fn request_permission(&self) -> CapabilityStatus {
        self.status
    }

    fn notify(&self, _summary: &str, body: &str) -> Result<()> {
        self.bodies.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

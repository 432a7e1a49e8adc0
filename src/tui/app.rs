//! Application state for the kitchen display.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::capability::VisibilitySignal;
use crate::models::order::Order;
use crate::stats::StatsAggregator;

use super::input::SecretInput;

/// How long a transient toast stays on screen.
const TOAST_TIMEOUT: Duration = Duration::from_secs(6);

/// A transient, self-clearing message for explicit action results.
#[derive(Debug)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing the reset secret into the masked prompt.
    SecretEntry,
}

/// Central display state, mutated only by the event loop.
pub struct App {
    /// Authoritative open backlog, replaced wholesale on every fetch.
    pub orders: Vec<Order>,
    /// Index of the highlighted order.
    pub selected: usize,
    /// Completion counters and drill-downs.
    pub stats: StatsAggregator,
    /// Orders announced through the banner channel, shown until
    /// explicitly dismissed.
    pub banner_ids: BTreeSet<u64>,
    pub toast: Option<Toast>,
    pub mode: Mode,
    pub secret_input: SecretInput,
    /// Focus-derived visibility, shared with the poller.
    pub visibility: VisibilitySignal,
    /// Configured reset secret; `None` rejects every reset.
    pub reset_secret: Option<String>,
    /// Held orders recovered at startup.
    pub held_count: usize,
    /// Next display-facing order number.
    pub next_sequence: u64,
    /// Time of the last applied backlog fetch.
    pub last_backlog_at: Option<Instant>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        visibility: VisibilitySignal,
        reset_secret: Option<String>,
        held_count: usize,
        next_sequence: u64,
    ) -> Self {
        Self {
            orders: Vec::new(),
            selected: 0,
            stats: StatsAggregator::new(),
            banner_ids: BTreeSet::new(),
            toast: None,
            mode: Mode::Normal,
            secret_input: SecretInput::new(),
            visibility,
            reset_secret,
            held_count,
            next_sequence,
            last_backlog_at: None,
            should_quit: false,
        }
    }

    /// Replaces the displayed backlog with the authoritative list.
    pub fn set_backlog(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        if self.selected >= self.orders.len() {
            self.selected = self.orders.len().saturating_sub(1);
        }
        self.last_backlog_at = Some(Instant::now());
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.orders.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.orders.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Adds missed-alert orders to the sticky banner.
    pub fn raise_banner(&mut self, ids: &BTreeSet<u64>) {
        self.banner_ids.extend(ids.iter().copied());
    }

    pub fn dismiss_banner(&mut self) {
        self.banner_ids.clear();
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    /// Clears the toast once its timeout passes; called on UI ticks.
    pub fn clear_stale_toast(&mut self) {
        if let Some(toast) = &self.toast
            && toast.shown_at.elapsed() > TOAST_TIMEOUT
        {
            self.toast = None;
        }
    }
}

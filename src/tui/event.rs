//! Event handling for the kitchen display.
//!
//! Terminal input, poller output, and action results all arrive as
//! [`Message`]s on one channel; [`update`] folds them into [`App`]
//! state and returns the [`Action`]s that need external I/O.

use std::collections::BTreeSet;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::alert::AlertOutcome;
use crate::models::StatsScope;
use crate::models::order::Order;
use crate::models::stats::StatsSnapshot;

use super::app::{App, Mode};

/// Events that can occur in the terminal.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// The terminal gained focus (display visible).
    FocusGained,
    /// The terminal lost focus (display backgrounded).
    FocusLost,
    /// Periodic tick for UI housekeeping.
    Tick,
}

/// Messages that update display state.
#[derive(Debug)]
pub enum Message {
    /// Input event from the terminal.
    Input(Event),

    /// Authoritative open backlog from a poll or cascade fetch.
    Backlog(Vec<Order>),
    /// Stats snapshot from a poll or cascade fetch.
    Stats(StatsSnapshot),
    /// Newly-arrived orders and the alert channel that carried them.
    NewArrivals {
        ids: BTreeSet<u64>,
        outcome: AlertOutcome,
    },
    /// A completed-orders drill-down list for one scope.
    CompletedList {
        scope: StatsScope,
        orders: Vec<Order>,
    },

    /// Result of a completion request.
    CompletionFinished { id: u64, error: Option<String> },
    /// Result of the backend-side counter reset.
    ResetFinished { error: Option<String> },
    /// Result of a manual backup trigger.
    BackupFinished {
        error: Option<String>,
        link: Option<String>,
    },

    /// Request to quit the application.
    Quit,
}

/// Actions that require external I/O, executed by the main loop.
#[derive(Debug, PartialEq)]
pub enum Action {
    /// Mark the order done and run the cascade refresh.
    CompleteOrder(u64),
    /// Lazily fetch a just-expanded completed list.
    FetchCompleted(StatsScope),
    /// Reset the backend counters with the accepted secret.
    ResetCompleted(String),
    /// Trigger a manual backup.
    TriggerBackup,
}

/// Spawns a task that polls for terminal events and sends them to the channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::FocusGained)) => {
                    if tx.send(Message::Input(Event::FocusGained)).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::FocusLost)) => {
                    if tx.send(Message::Input(Event::FocusLost)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates display state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::Backlog(orders) => {
            app.set_backlog(orders);
            None
        }
        Message::Stats(snapshot) => {
            app.stats.apply_snapshot(snapshot);
            None
        }
        Message::NewArrivals { ids, outcome } => {
            // Audible and notified arrivals need nothing further; the
            // banner channel is the display's own responsibility.
            if outcome == AlertOutcome::BannerOnly {
                app.raise_banner(&ids);
            }
            None
        }
        Message::CompletedList { scope, orders } => {
            app.stats.apply_completed_list(scope, orders);
            None
        }
        Message::CompletionFinished { id, error } => {
            if let Some(error) = error {
                app.show_toast(format!("Order #{id} not completed, retry: {error}"));
            }
            None
        }
        Message::ResetFinished { error } => {
            if let Some(error) = error {
                app.show_toast(format!("Backend reset failed: {error}"));
            }
            None
        }
        Message::BackupFinished { error, link } => {
            match error {
                Some(error) => app.show_toast(format!("Backup failed: {error}")),
                None => match link {
                    Some(link) => app.show_toast(format!("Backup complete: {link}")),
                    None => app.show_toast("Backup complete"),
                },
            }
            None
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Handles input events.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::FocusGained => {
            app.visibility.set(true);
            None
        }
        Event::FocusLost => {
            app.visibility.set(false);
            None
        }
        Event::Tick => {
            app.clear_stale_toast();
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::SecretEntry => handle_secret_entry(app, key),
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            None
        }

        // Backlog navigation
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_previous();
            None
        }

        // Mark selected order done
        KeyCode::Char('d') | KeyCode::Enter => {
            app.selected_order().map(|o| Action::CompleteOrder(o.id))
        }

        // Drill-down toggles; fetch lazily on expand only
        KeyCode::Char('t') => toggle_drilldown(app, StatsScope::Today),
        KeyCode::Char('a') => toggle_drilldown(app, StatsScope::All),

        // Reset counters (secret prompt)
        KeyCode::Char('r') => {
            app.mode = Mode::SecretEntry;
            None
        }

        // Manual backup
        KeyCode::Char('b') => Some(Action::TriggerBackup),

        // Dismiss the missed-alert banner
        KeyCode::Char('x') => {
            app.dismiss_banner();
            None
        }

        _ => None,
    }
}

fn toggle_drilldown(app: &mut App, scope: StatsScope) -> Option<Action> {
    if app.stats.toggle_expanded(scope) {
        Some(Action::FetchCompleted(scope))
    } else {
        None
    }
}

/// Handles keys while typing the reset secret.
fn handle_secret_entry(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => {
            app.secret_input.take();
            app.mode = Mode::Normal;
            None
        }
        KeyCode::Backspace => {
            app.secret_input.backspace();
            None
        }
        KeyCode::Enter => {
            let supplied = app.secret_input.take();
            app.mode = Mode::Normal;
            submit_reset(app, supplied)
        }
        KeyCode::Char(c) => {
            app.secret_input.push(c);
            None
        }
        _ => None,
    }
}

/// Applies the local reset gate; only an accepted secret reaches the
/// backend.
fn submit_reset(app: &mut App, supplied: String) -> Option<Action> {
    let Some(expected) = app.reset_secret.clone() else {
        app.show_toast("Reset is not configured on this display");
        return None;
    };
    match app.stats.reset(&supplied, &expected) {
        Ok(()) => {
            app.show_toast("Completed counters reset");
            Some(Action::ResetCompleted(supplied))
        }
        Err(e) => {
            app.show_toast(e.to_string());
            None
        }
    }
}

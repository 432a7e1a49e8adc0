//! Terminal user interface for the kitchen display.
//!
//! A Ratatui-based display of the open backlog with completion
//! statistics, drill-downs, the sticky missed-alert banner, and the
//! gated stats reset. All shared display state lives in [`App`] and is
//! mutated only by the event loop consuming [`Message`]s, so no
//! locking is needed around it.

pub mod app;
pub mod components;
pub mod event;
pub mod input;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message, update};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;

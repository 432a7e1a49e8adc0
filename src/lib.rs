//! Kitchen display and order synchronization client for the Kebubbi
//! restaurant system.
//!
//! Provides typed models and async components for consuming the order
//! backlog service: a fixed-cadence backlog poller with new-arrival
//! detection, a tiered alert dispatcher (audio, system notification,
//! sticky banner), a completion coordinator with duplicate-action
//! protection, a client-side stats aggregator, and a durable draft
//! store for held orders.

pub mod alert;
pub mod capability;
pub mod client;
pub mod completion;
pub mod config;
pub mod drafts;
pub mod error;
pub mod models;
pub mod poller;
pub mod stats;
pub mod tui;

pub use error::{KebubbiError, Result};

//! Crate-level error types.
//!
//! [`KebubbiError`] unifies every error source (configuration, HTTP
//! transport, JSON, persistence) behind a single enum so callers can
//! match on the variant they care about while still using the `?`
//! operator for easy propagation.
//!
//! Two failure categories from the backlog protocol deliberately do
//! *not* appear here because they are not errors to the caller: a
//! duplicate completion request is reported as
//! [`CompletionOutcome::AlreadyPending`](crate::completion::CompletionOutcome)
//! and a denied alert capability is a
//! [`CapabilityStatus`](crate::capability::CapabilityStatus).

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KebubbiError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum KebubbiError {
    /// Configuration was missing, malformed, or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// An HTTP request to the backlog service failed. Within a poll
    /// tick this is transient: it is logged and retried implicitly by
    /// the next tick, never surfaced as fatal.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A filesystem or terminal I/O operation failed.
    #[error("io error: {0}")]
    Io(String),

    /// The backlog service accepted the request but reported an error.
    #[error("backend error: {0}")]
    Api(String),

    /// The operator-supplied reset secret did not match.
    #[error("authorization failed: {0}")]
    Unauthorized(String),
}

//! REST client for the order backlog service.
//!
//! The backlog service is an external collaborator: it owns order
//! storage and the complete-transition. This client only consumes it.
//! The subset of calls driven by the poll loop and the completion
//! cascade is abstracted behind [`BacklogApi`] so those components can
//! be exercised against an in-memory fake in tests.

use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::Result;
use crate::models::StatsScope;
use crate::models::order::{NewOrder, Order};
use crate::models::stats::{BackupReceipt, CompletedStats, ResetResponse, StatsSnapshot};

/// Request timeout for all backend calls. Shorter than the poll
/// cadence is not required: ticks are fire-and-forget and a late
/// response simply applies last-wins.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The backlog operations consumed by the poller and the completion
/// coordinator.
pub trait BacklogApi: Send + Sync + 'static {
    /// Fetches the current open backlog.
    fn open_orders(&self) -> impl Future<Output = Result<Vec<Order>>> + Send;

    /// Fetches both stats scopes.
    fn stats_snapshot(&self) -> impl Future<Output = Result<StatsSnapshot>> + Send;

    /// Fetches the completed-order list for one scope.
    fn completed_orders(
        &self,
        scope: StatsScope,
    ) -> impl Future<Output = Result<Vec<Order>>> + Send;

    /// Requests the complete-transition for one order.
    fn complete_order(&self, id: u64) -> impl Future<Output = Result<Order>> + Send;
}

/// HTTP client bound to one backlog service deployment.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(crate::KebubbiError::Transport)?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Submits a new order to the backlog (producer side).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn create_order(&self, order: &NewOrder) -> Result<()> {
        let response = self
            .http
            .post(self.url("/api/orders"))
            .json(order)
            .send()
            .await?;
        response.error_for_status()?;
        info!(waiter = %order.waiter, items = order.items.len(), "order submitted");
        Ok(())
    }

    /// Resets the completed counters, gated server-side by the shared secret.
    ///
    /// # Errors
    ///
    /// Returns [`KebubbiError::Unauthorized`](crate::KebubbiError::Unauthorized)
    /// if the backend rejects the secret.
    pub async fn reset_completed(&self, secret: &str) -> Result<ResetResponse> {
        let response = self
            .http
            .post(self.url("/api/orders/reset-completed"))
            .json(&serde_json::json!({ "secret": secret }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::FORBIDDEN
            || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            let message = rejection_message(response).await;
            return Err(crate::KebubbiError::Unauthorized(message));
        }

        let response = response.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Triggers a manual backup. Fire-and-forget from the caller's
    /// perspective; not part of the consistency model.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn backup(&self) -> Result<BackupReceipt> {
        let response = self.http.post(self.url("/api/backup")).send().await?;
        let response = response.error_for_status()?;
        Ok(response.json().await?)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let response = self.http.get(self.url(path)).send().await?;
        let response = response.error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Extracts the backend's `message` field from a rejection body, or a
/// generic label when the body is unusable.
async fn rejection_message(response: reqwest::Response) -> String {
    #[derive(Deserialize)]
    struct Rejection {
        message: String,
    }
    match response.json::<Rejection>().await {
        Ok(rejection) => rejection.message,
        Err(_) => "reset rejected".to_string(),
    }
}

impl BacklogApi for ApiClient {
    async fn open_orders(&self) -> Result<Vec<Order>> {
        self.get_json("/api/orders").await
    }

    async fn stats_snapshot(&self) -> Result<StatsSnapshot> {
        let (today, total) = tokio::join!(
            self.get_json::<CompletedStats>("/api/orders/completed/today"),
            self.get_json::<CompletedStats>("/api/orders/completed/total"),
        );
        Ok(StatsSnapshot {
            today: today?,
            total: total?,
        })
    }

    async fn completed_orders(&self, scope: StatsScope) -> Result<Vec<Order>> {
        self.get_json(&format!("/api/orders/completed/{}/list", scope.as_str()))
            .await
    }

    async fn complete_order(&self, id: u64) -> Result<Order> {
        let response = self
            .http
            .patch(self.url(&format!("/api/orders/{id}")))
            .send()
            .await?;
        let response = response.error_for_status()?;
        info!(order_id = id, "order marked complete");
        Ok(response.json().await?)
    }
}

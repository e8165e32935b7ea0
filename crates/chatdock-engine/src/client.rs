//! Outbound request to the assistant endpoint.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};

/// Any failure of the outbound request.
///
/// Every variant ends up as the same user-facing fallback message; the
/// distinction only matters for logs.
#[derive(Debug, thiserror::Error)]
pub enum RequestFailure {
    /// Endpoint URL could not be built.
    #[error("{0}")]
    Endpoint(#[from] ConfigError),

    /// Transport-level error (connection refused, DNS, TLS, ...).
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// Response body could not be read as text.
    #[error("failed to read response: {0}")]
    Body(#[source] reqwest::Error),

    /// No response within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Failure reported by a non-HTTP client.
    #[error("{0}")]
    Other(String),
}

impl RequestFailure {
    /// Build a failure from a plain message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Something that can answer a user input with a raw payload string.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send one request carrying `input` and return the response body.
    async fn ask(&self, input: &str) -> Result<String, RequestFailure>;
}

/// [`AssistantClient`] over HTTP: `GET {base}/assistant?input=...`.
#[derive(Debug, Clone)]
pub struct HttpAssistant {
    client: reqwest::Client,
    config: Config,
}

impl HttpAssistant {
    /// Create a client for the endpoint described by `config`.
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch(&self, input: &str) -> Result<String, RequestFailure> {
        let url = self.config.endpoint_url(input)?;
        debug!(%url, "sending assistant request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(RequestFailure::Transport)?;

        // The body is rendered whatever the status; only the log notices.
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "assistant endpoint returned non-success status");
        }

        response.text().await.map_err(RequestFailure::Body)
    }
}

#[async_trait]
impl AssistantClient for HttpAssistant {
    async fn ask(&self, input: &str) -> Result<String, RequestFailure> {
        let result = match self.config.request_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.fetch(input))
                .await
                .unwrap_or(Err(RequestFailure::Timeout(limit))),
            None => self.fetch(input).await,
        };

        if let Err(e) = &result {
            warn!(error = %e, "assistant request failed");
        }
        result
    }
}

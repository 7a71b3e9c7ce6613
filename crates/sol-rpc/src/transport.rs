//! HTTP transport for JSON-RPC requests.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Per-request timeout used when none is configured.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Moves one JSON-RPC envelope to the endpoint and returns the decoded
/// response envelope. Implementations report network, HTTP status and
/// body decoding failures as [`ClientError::Transport`]; they do not look
/// inside the envelope.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn post(&self, body: &Value) -> ClientResult<Value>;

    /// Endpoint description for logs.
    fn endpoint(&self) -> &str;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let url = url.into();
        url::Url::parse(&url)
            .map_err(|e| ClientError::Transport(format!("invalid RPC URL '{url}': {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post(&self, body: &Value) -> ClientResult<Value> {
        let method = body.get("method").and_then(Value::as_str).unwrap_or("?");
        tracing::debug!(url = %self.url, method, "RPC request");

        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        let value = response.json::<Value>().await?;
        Ok(value)
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

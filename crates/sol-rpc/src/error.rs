use std::time::Duration;

use chain_sol::SolError;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by RPC calls and the components built on them.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or HTTP failure: connect error, timeout, non-2xx status,
    /// or a body that is not the JSON we expected.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a JSON-RPC `error` object (kept verbatim).
    #[error("rpc error: {0}")]
    Rpc(Value),

    /// Rejected before any network call.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The transaction landed but execution failed (status `err` field).
    #[error("transaction error: {0}")]
    Transaction(Value),

    /// Submission or confirmation of a transfer failed.
    #[error("transfer failed: {0}")]
    TransferFailed(#[source] Box<ClientError>),

    #[error("transaction not confirmed within {0:?}")]
    ConfirmationTimeout(Duration),

    #[error(transparent)]
    Sol(#[from] SolError),
}

/// Result type for RPC operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// Wrap a submission failure, leaving the variants the caller must
    /// tell apart (amount validation and timeout) untouched.
    pub(crate) fn into_transfer_failure(self) -> Self {
        match self {
            e @ (ClientError::InvalidAmount(_)
            | ClientError::ConfirmationTimeout(_)
            | ClientError::TransferFailed(_)) => e,
            other => ClientError::TransferFailed(Box::new(other)),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            ClientError::Transport(format!("connection failed: {e}"))
        } else if let Some(status) = e.status() {
            ClientError::Transport(format!("HTTP {status}"))
        } else if e.is_decode() {
            ClientError::Transport(format!("malformed response body: {e}"))
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

//! JSON-RPC 2.0 envelopes and the response shapes of the methods we call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl RpcRequest {
    pub fn new(id: u64, method: &str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.to_string(),
            params,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Most read methods wrap their payload as `{ context: { slot }, value }`.
#[derive(Debug, Clone, Deserialize)]
pub struct WithContext<T> {
    pub context: RpcContext,
    pub value: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcContext {
    pub slot: u64,
}

/// Commitment levels, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// `getAccountInfo` value with `encoding: "base64"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAccount {
    pub lamports: u64,
    pub owner: String,
    /// `[payload, "base64"]`
    pub data: (String, String),
    pub executable: bool,
    pub rent_epoch: u64,
    #[serde(default)]
    pub space: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

/// One entry of `getSignatureStatuses`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    /// `None` once the block is rooted.
    pub confirmations: Option<u64>,
    /// Execution error, if the transaction failed.
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Whether the status has reached at least `commitment`.
    pub fn satisfies(&self, commitment: Commitment) -> bool {
        match self.confirmation_status {
            Some(status) => status >= commitment,
            // Older nodes omit the field; a null confirmation count means rooted.
            None => self.confirmations.is_none() || commitment == Commitment::Processed,
        }
    }
}

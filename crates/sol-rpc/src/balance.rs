//! Balance lookup.
//!
//! Two implementations of one capability: [`DirectRpcBalance`] writes the
//! `getBalance` envelope itself and picks `result.value` out of the raw
//! response, [`ClientBalance`] asks the typed [`RpcClient`]. Both speak the
//! same wire protocol, so for the same ledger state they return the same
//! lamport count.

use std::sync::Arc;

use async_trait::async_trait;
use chain_sol::Address;
use serde_json::{json, Value};

use crate::client::RpcClient;
use crate::error::{ClientError, ClientResult};
use crate::transport::RpcTransport;

#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Balance of `address` in lamports.
    async fn get_balance(&self, address: &Address) -> ClientResult<u64>;

    /// Short label for logs and reports.
    fn name(&self) -> &'static str;
}

/// Hand-built JSON-RPC `getBalance` request.
pub struct DirectRpcBalance {
    transport: Arc<dyn RpcTransport>,
}

impl DirectRpcBalance {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    fn request(address: &Address) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getBalance",
            "params": [address.to_string()]
        })
    }
}

#[async_trait]
impl BalanceSource for DirectRpcBalance {
    async fn get_balance(&self, address: &Address) -> ClientResult<u64> {
        let response = self.transport.post(&Self::request(address)).await?;

        // `"error": null` is not an error.
        if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
            return Err(ClientError::Rpc(error.clone()));
        }

        response
            .pointer("/result/value")
            .and_then(Value::as_u64)
            .ok_or_else(|| ClientError::Transport("response is missing result.value".into()))
    }

    fn name(&self) -> &'static str {
        "json-rpc"
    }
}

/// Balance through the typed client.
pub struct ClientBalance {
    client: Arc<RpcClient>,
}

impl ClientBalance {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BalanceSource for ClientBalance {
    async fn get_balance(&self, address: &Address) -> ClientResult<u64> {
        self.client.get_balance(address).await
    }

    fn name(&self) -> &'static str {
        "rpc-client"
    }
}

/// Query two sources at once. They are read-only, so ordering is irrelevant.
pub async fn query_concurrently(
    first: &dyn BalanceSource,
    second: &dyn BalanceSource,
    address: &Address,
) -> (ClientResult<u64>, ClientResult<u64>) {
    tokio::join!(first.get_balance(address), second.get_balance(address))
}

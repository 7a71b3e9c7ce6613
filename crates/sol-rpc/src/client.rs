//! Typed JSON-RPC client.
//!
//! # Responsibilities
//! - Wrap each call in a JSON-RPC 2.0 envelope and unwrap the response
//! - Query balances, account info and recent blockhashes
//! - Submit signed transactions and wait for confirmation, bounded by a
//!   timeout
//!
//! Each call is a single attempt; failures are returned to the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use chain_sol::{sign_transaction, Address, Keypair, Signature, SolTransaction};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::time::{sleep, timeout};

use crate::account::AccountInfo;
use crate::error::{ClientError, ClientResult};
use crate::transport::RpcTransport;
use crate::wire::{
    Commitment, LatestBlockhash, RpcRequest, RpcResponse, SignatureStatus, UiAccount, WithContext,
};

/// Upper bound on waiting for a submitted transaction to confirm.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between `getSignatureStatuses` polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
    commitment: Commitment,
    confirm_timeout: Duration,
    poll_interval: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            commitment: Commitment::default(),
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_confirm_timeout(mut self, confirm_timeout: Duration) -> Self {
        self.confirm_timeout = confirm_timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Send one request and decode its `result` as `T`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ClientResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        let body = serde_json::to_value(&request)
            .map_err(|e| ClientError::Transport(format!("failed to encode request: {e}")))?;

        let raw = self.transport.post(&body).await?;
        let response: RpcResponse = serde_json::from_value(raw)
            .map_err(|e| ClientError::Transport(format!("malformed JSON-RPC envelope: {e}")))?;

        if let Some(error) = response.error {
            tracing::warn!(method, error = %error, "RPC returned an error");
            return Err(ClientError::Rpc(error));
        }

        let result = response.result.ok_or_else(|| {
            ClientError::Transport(format!("{method}: response has neither result nor error"))
        })?;

        serde_json::from_value(result)
            .map_err(|e| ClientError::Transport(format!("{method}: unexpected result shape: {e}")))
    }

    fn commitment_config(&self) -> Value {
        json!({ "commitment": self.commitment.as_str() })
    }

    /// Balance in lamports.
    pub async fn get_balance(&self, address: &Address) -> ClientResult<u64> {
        let balance: WithContext<u64> = self
            .call(
                "getBalance",
                json!([address.to_string(), self.commitment_config()]),
            )
            .await?;
        Ok(balance.value)
    }

    /// Account metadata, or `None` if the account does not exist.
    pub async fn get_account_info(&self, address: &Address) -> ClientResult<Option<AccountInfo>> {
        let account: WithContext<Option<UiAccount>> = self
            .call(
                "getAccountInfo",
                json!([
                    address.to_string(),
                    { "encoding": "base64", "commitment": self.commitment.as_str() }
                ]),
            )
            .await?;

        account.value.map(AccountInfo::try_from).transpose()
    }

    pub async fn get_latest_blockhash(&self) -> ClientResult<[u8; 32]> {
        let latest: WithContext<LatestBlockhash> = self
            .call("getLatestBlockhash", json!([self.commitment_config()]))
            .await?;

        let bytes = bs58::decode(&latest.value.blockhash)
            .into_vec()
            .map_err(|e| ClientError::Transport(format!("malformed blockhash: {e}")))?;
        bytes.try_into().map_err(|v: Vec<u8>| {
            ClientError::Transport(format!("blockhash must be 32 bytes, got {}", v.len()))
        })
    }

    /// Submit signed wire bytes; returns the signature the node reports.
    pub async fn send_transaction(&self, wire: &[u8]) -> ClientResult<Signature> {
        let encoded = B64.encode(wire);
        let signature: String = self
            .call(
                "sendTransaction",
                json!([
                    encoded,
                    { "encoding": "base64", "preflightCommitment": self.commitment.as_str() }
                ]),
            )
            .await?;

        signature
            .parse()
            .map_err(|e| ClientError::Transport(format!("malformed signature in response: {e}")))
    }

    /// Current status of a signature, `None` if the node has not seen it.
    pub async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> ClientResult<Option<SignatureStatus>> {
        let statuses: WithContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature.to_string()], { "searchTransactionHistory": false }]),
            )
            .await?;

        Ok(statuses.value.into_iter().next().flatten())
    }

    /// Poll until the signature reaches the client's commitment.
    ///
    /// Fails with [`ClientError::Transaction`] if the transaction executed
    /// with an error, and [`ClientError::ConfirmationTimeout`] if the
    /// commitment is not reached within the confirm timeout.
    pub async fn confirm_transaction(&self, signature: &Signature) -> ClientResult<SignatureStatus> {
        let poll = async {
            loop {
                if let Some(status) = self.get_signature_status(signature).await? {
                    if let Some(err) = status.err.clone() {
                        return Err(ClientError::Transaction(err));
                    }
                    if status.satisfies(self.commitment) {
                        return Ok(status);
                    }
                    tracing::debug!(%signature, slot = status.slot, "awaiting commitment");
                }
                sleep(self.poll_interval).await;
            }
        };

        timeout(self.confirm_timeout, poll)
            .await
            .map_err(|_| ClientError::ConfirmationTimeout(self.confirm_timeout))?
    }

    /// Sign `tx` with `signer`, submit it and wait for confirmation.
    pub async fn send_and_confirm_transaction(
        &self,
        tx: &SolTransaction,
        signer: &Keypair,
    ) -> ClientResult<Signature> {
        let signed = sign_transaction(tx, signer)?;

        let reported = self.send_transaction(&signed.wire).await?;
        if reported != signed.signature {
            tracing::warn!(
                expected = %signed.signature,
                reported = %reported,
                "node reported a different signature"
            );
        }

        let status = self.confirm_transaction(&signed.signature).await?;
        tracing::info!(
            signature = %signed.signature,
            slot = status.slot,
            commitment = self.commitment.as_str(),
            "Transaction confirmed"
        );
        Ok(signed.signature)
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.transport.endpoint())
            .field("commitment", &self.commitment)
            .field("confirm_timeout", &self.confirm_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{with_context, MockReply, MockTransport};

    fn client(mock: MockTransport) -> (RpcClient, Arc<MockTransport>) {
        let mock = Arc::new(mock);
        let client = RpcClient::new(mock.clone())
            .with_poll_interval(Duration::from_millis(5))
            .with_confirm_timeout(Duration::from_millis(200));
        (client, mock)
    }

    fn owner() -> Address {
        Keypair::from_seed(&[9u8; 32]).pubkey()
    }

    #[tokio::test]
    async fn balance_reads_value() {
        let (client, mock) = client(MockTransport::new(|_, _| {
            MockReply::Result(with_context(json!(2_500_000_000u64)))
        }));
        assert_eq!(client.get_balance(&owner()).await.unwrap(), 2_500_000_000);

        let params = mock.params_of("getBalance");
        assert_eq!(params[0][0], json!(owner().to_string()));
        assert_eq!(params[0][1]["commitment"], "confirmed");
    }

    #[tokio::test]
    async fn configured_commitment_is_sent() {
        let (client, mock) = client(MockTransport::new(|_, _| {
            MockReply::Result(with_context(json!(1)))
        }));
        let client = client.with_commitment(Commitment::Finalized);
        client.get_balance(&owner()).await.unwrap();

        assert_eq!(mock.params_of("getBalance")[0][1]["commitment"], "finalized");
    }

    #[tokio::test]
    async fn rpc_error_is_returned_verbatim() {
        let payload = json!({"code": -32602, "message": "Invalid param: WrongSize"});
        let expected = payload.clone();
        let (client, _) = client(MockTransport::new(move |_, _| {
            MockReply::Error(payload.clone())
        }));
        match client.get_balance(&owner()).await {
            Err(ClientError::Rpc(v)) => assert_eq!(v, expected),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_account_is_none() {
        let (client, _) = client(MockTransport::new(|_, _| {
            MockReply::Result(with_context(Value::Null))
        }));
        assert_eq!(client.get_account_info(&owner()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn blockhash_is_decoded() {
        let hash = bs58::encode([7u8; 32]).into_string();
        let (client, _) = client(MockTransport::new(move |_, _| {
            MockReply::Result(with_context(
                json!({"blockhash": hash.clone(), "lastValidBlockHeight": 100}),
            ))
        }));
        assert_eq!(client.get_latest_blockhash().await.unwrap(), [7u8; 32]);
    }

    #[tokio::test]
    async fn confirmation_waits_for_commitment() {
        let polls = std::sync::atomic::AtomicUsize::new(0);
        let (client, _) = client(MockTransport::new(move |_, _| {
            let n = polls.fetch_add(1, Ordering::SeqCst);
            let status = match n {
                0 => Value::Null,
                1 => json!({"slot": 5, "confirmations": 0, "err": null, "confirmationStatus": "processed"}),
                _ => json!({"slot": 5, "confirmations": 1, "err": null, "confirmationStatus": "confirmed"}),
            };
            MockReply::Result(with_context(json!([status])))
        }));

        let status = client
            .confirm_transaction(&Signature::new([1u8; 64]))
            .await
            .unwrap();
        assert_eq!(status.confirmation_status, Some(Commitment::Confirmed));
    }

    #[tokio::test]
    async fn confirmation_times_out() {
        let (client, _) = client(MockTransport::new(|_, _| {
            MockReply::Result(with_context(json!([null])))
        }));
        let err = client
            .confirm_transaction(&Signature::new([1u8; 64]))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::ConfirmationTimeout(_)));
    }

    #[tokio::test]
    async fn failed_execution_surfaces_err() {
        let (client, _) = client(MockTransport::new(|_, _| {
            MockReply::Result(with_context(json!([{
                "slot": 5,
                "confirmations": 1,
                "err": {"InstructionError": [0, {"Custom": 1}]},
                "confirmationStatus": "confirmed"
            }])))
        }));
        let err = client
            .confirm_transaction(&Signature::new([1u8; 64]))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transaction(_)));
    }

    #[tokio::test]
    async fn result_with_wrong_shape_is_transport_error() {
        let (client, _) = client(MockTransport::new(|_, _| {
            MockReply::Result(json!("not a context object"))
        }));
        assert!(client.get_balance(&owner()).await.unwrap_err().is_transport());
    }
}

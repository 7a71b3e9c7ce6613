//! Native SOL transfer submission.
//!
//! One attempt per call:
//! 1. convert the SOL amount to lamports (rejected before any I/O if it is
//!    not a positive whole number of lamports)
//! 2. fetch a recent blockhash
//! 3. build and sign a single System `Transfer` instruction transaction
//! 4. submit and wait for confirmation
//!
//! Failures after step 1 come back as [`ClientError::TransferFailed`], except
//! a confirmation timeout which keeps its own variant.

use std::sync::Arc;

use chain_sol::{build_sol_transfer, sol_to_lamports, Address, Keypair, Signature, SolError};
use rust_decimal::Decimal;

use crate::client::RpcClient;
use crate::error::{ClientError, ClientResult};

/// Submits transfers through an [`RpcClient`]. Calls from the same origin
/// should not overlap; the ledger may reject the second one.
#[derive(Debug, Clone)]
pub struct TransferSubmitter {
    client: Arc<RpcClient>,
}

impl TransferSubmitter {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }

    /// Move `amount` SOL from `origin` to `recipient`; returns the
    /// transaction signature once confirmed.
    pub async fn send_transfer(
        &self,
        origin: &Keypair,
        recipient: &Address,
        amount: Decimal,
    ) -> ClientResult<Signature> {
        let lamports = sol_to_lamports(amount).map_err(|e| match e {
            SolError::InvalidAmount(reason) => ClientError::InvalidAmount(reason),
            other => ClientError::InvalidAmount(other.to_string()),
        })?;

        tracing::info!(
            from = %origin.pubkey(),
            to = %recipient,
            lamports,
            "Submitting transfer"
        );

        self.submit(origin, recipient, lamports)
            .await
            .map_err(ClientError::into_transfer_failure)
    }

    async fn submit(
        &self,
        origin: &Keypair,
        recipient: &Address,
        lamports: u64,
    ) -> ClientResult<Signature> {
        let blockhash = self.client.get_latest_blockhash().await?;
        let tx = build_sol_transfer(&origin.pubkey(), recipient, lamports, &blockhash)?;
        self.client.send_and_confirm_transaction(&tx, origin).await
    }
}

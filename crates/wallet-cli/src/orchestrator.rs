//! Runs the walkthrough stages in order.
//!
//! ```text
//! AppConfig (identity, cluster, optional transfer)
//!     -> balances: JSON-RPC and client strategies, concurrently
//!     -> account info
//!     -> transfer (only when configured)
//! ```
//!
//! Every stage returns a `Result`. A failed stage is logged and recorded in
//! the [`RunReport`]; later stages still run.

use std::sync::Arc;

use chain_sol::{lamports_to_sol, Keypair, Signature};
use sol_rpc::{
    query_concurrently, AccountInfo, AccountInspector, BalanceSource, ClientBalance, ClientError,
    ClientResult, Cluster, DirectRpcBalance, HttpTransport, RpcClient, RpcTransport,
    TransferSubmitter,
};

use crate::config::{AppConfig, TransferRequest};

pub struct Orchestrator {
    keypair: Keypair,
    cluster: Cluster,
    transfer: Option<TransferRequest>,
    direct_balance: DirectRpcBalance,
    client_balance: ClientBalance,
    inspector: AccountInspector,
    submitter: TransferSubmitter,
}

/// Outcome of every stage of one run.
#[derive(Debug)]
pub struct RunReport {
    pub cluster: Cluster,
    pub address: chain_sol::Address,
    pub direct_balance: ClientResult<u64>,
    pub client_balance: ClientResult<u64>,
    pub account_info: ClientResult<Option<AccountInfo>>,
    /// `None` when no transfer was configured.
    pub transfer: Option<ClientResult<Signature>>,
}

impl Orchestrator {
    /// Build against the configured cluster over HTTP.
    pub fn from_config(config: AppConfig) -> ClientResult<Self> {
        let transport: Arc<dyn RpcTransport> =
            Arc::new(HttpTransport::new(config.cluster.url(), config.rpc_timeout)?);
        Ok(Self::new(config, transport.clone(), transport))
    }

    /// Build with explicit transports: `direct` serves the raw JSON-RPC
    /// balance query, `client` everything that goes through [`RpcClient`].
    pub fn new(
        config: AppConfig,
        direct: Arc<dyn RpcTransport>,
        client: Arc<dyn RpcTransport>,
    ) -> Self {
        let rpc = Arc::new(RpcClient::new(client).with_confirm_timeout(config.confirm_timeout));

        Self {
            keypair: config.keypair,
            cluster: config.cluster,
            transfer: config.transfer,
            direct_balance: DirectRpcBalance::new(direct),
            client_balance: ClientBalance::new(rpc.clone()),
            inspector: AccountInspector::new(rpc.clone()),
            submitter: TransferSubmitter::new(rpc),
        }
    }

    pub fn address(&self) -> chain_sol::Address {
        self.keypair.pubkey()
    }

    pub async fn run(&self) -> RunReport {
        let address = self.address();
        tracing::info!(%address, cluster = %self.cluster, "Starting run");

        let (direct_balance, client_balance) =
            query_concurrently(&self.direct_balance, &self.client_balance, &address).await;
        log_balance(&self.direct_balance, &direct_balance);
        log_balance(&self.client_balance, &client_balance);

        let account_info = self.inspector.get_account_info(&address).await;
        match &account_info {
            Ok(Some(info)) => tracing::info!(
                owner = %info.owner,
                lamports = info.lamports,
                executable = info.executable,
                "Account info"
            ),
            Ok(None) => tracing::info!(%address, "Account does not exist on-chain"),
            Err(e) => tracing::error!(error = %e, "Error getting account info"),
        }

        let transfer = match &self.transfer {
            Some(request) => Some(self.run_transfer(request).await),
            None => None,
        };

        RunReport {
            cluster: self.cluster.clone(),
            address,
            direct_balance,
            client_balance,
            account_info,
            transfer,
        }
    }

    async fn run_transfer(&self, request: &TransferRequest) -> ClientResult<Signature> {
        let result = match request.plan() {
            Ok(plan) => {
                self.submitter
                    .send_transfer(&self.keypair, &plan.recipient, plan.amount_sol)
                    .await
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(signature) => tracing::info!(
                %signature,
                explorer = %self.cluster.explorer_tx_url(signature),
                "Transfer confirmed"
            ),
            Err(e) => tracing::error!(
                recipient = ?request.recipient,
                amount_sol = ?request.amount_sol,
                error = %e,
                "Transfer failed"
            ),
        }
        result
    }
}

fn log_balance(source: &dyn BalanceSource, result: &ClientResult<u64>) {
    match result {
        Ok(lamports) => tracing::info!(source = source.name(), lamports, "Balance"),
        Err(e) => tracing::error!(source = source.name(), error = %e, "Error getting balance"),
    }
}

impl RunReport {
    /// Human-readable status lines for the console.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let address = &self.address;

        for (label, result) in [
            ("json-rpc", &self.direct_balance),
            ("rpc-client", &self.client_balance),
        ] {
            lines.push(match result {
                Ok(lamports) => format!(
                    "[{label}] The balance for address {address} is {lamports} lamports ({} SOL)",
                    lamports_to_sol(*lamports)
                ),
                Err(e) => format!("[{label}] Error getting balance for address {address}: {e}"),
            });
        }

        lines.push(match &self.account_info {
            Ok(Some(info)) => format!(
                "Account {address}: owner={} lamports={} data_len={} executable={} rent_epoch={}",
                info.owner,
                info.lamports,
                info.data.len(),
                info.executable,
                info.rent_epoch
            ),
            Ok(None) => format!("Account {address} does not exist"),
            Err(e) => format!("Error getting account info for {address}: {e}"),
        });

        match &self.transfer {
            Some(Ok(signature)) => {
                lines.push(format!("Transfer confirmed: {signature}"));
                lines.push(format!(
                    "Explorer: {}",
                    self.cluster.explorer_tx_url(signature)
                ));
            }
            Some(Err(e)) => lines.push(format!("Transfer failed: {e}")),
            None => {}
        }

        lines
    }

    /// Whether every stage that ran succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.direct_balance.is_ok()
            && self.client_balance.is_ok()
            && self.account_info.is_ok()
            && !matches!(self.transfer, Some(Err(_)))
    }

    /// The first error of the run, if any.
    pub fn first_error(&self) -> Option<&ClientError> {
        self.direct_balance
            .as_ref()
            .err()
            .or(self.client_balance.as_ref().err())
            .or(self.account_info.as_ref().err())
            .or(self.transfer.as_ref().and_then(|t| t.as_ref().err()))
    }
}

//! Async JSON-RPC access to a Solana cluster.
//!
//! Every request goes through an [`RpcTransport`], so the HTTP transport can
//! be swapped for an in-memory one in tests. On top of it sit:
//!
//! - [`RpcClient`]: typed accessors (balance, account info, blockhash,
//!   submission and confirmation),
//! - [`BalanceSource`]: one balance capability with two implementations,
//!   a raw JSON-RPC POST ([`DirectRpcBalance`]) and a delegation to the
//!   client ([`ClientBalance`]),
//! - [`AccountInspector`] and [`TransferSubmitter`].

pub mod account;
pub mod balance;
pub mod client;
pub mod cluster;
pub mod error;
pub mod inspector;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod transfer;
pub mod transport;
pub mod wire;

pub use account::AccountInfo;
pub use balance::{query_concurrently, BalanceSource, ClientBalance, DirectRpcBalance};
pub use client::{RpcClient, DEFAULT_CONFIRM_TIMEOUT, DEFAULT_POLL_INTERVAL};
pub use cluster::Cluster;
pub use error::{ClientError, ClientResult};
pub use inspector::AccountInspector;
pub use transfer::TransferSubmitter;
pub use transport::{HttpTransport, RpcTransport, DEFAULT_RPC_TIMEOUT};
pub use wire::{Commitment, SignatureStatus};

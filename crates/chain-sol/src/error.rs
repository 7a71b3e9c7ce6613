use thiserror::Error;

/// Solana primitive errors (keys, addresses, amounts, wire format).
#[derive(Debug, Error)]
pub enum SolError {
    #[error("invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

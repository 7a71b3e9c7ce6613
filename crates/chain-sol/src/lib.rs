//! Solana primitives for the devnet wallet client.
//!
//! This crate owns everything that does not touch the network: addresses,
//! keypairs, lamport amounts, and the transaction wire format for a native
//! SOL transfer. Nothing here pulls in `solana-sdk`; the compact binary
//! layout is written by hand using `ed25519-dalek` for signing and `bs58`
//! for Base58 encoding.

pub mod address;
pub mod amount;
pub mod error;
pub mod keypair;
pub mod signature;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::Address;
pub use amount::{lamports_to_sol, sol_to_lamports, LAMPORTS_PER_SOL};
pub use error::SolError;
pub use keypair::{Keypair, KEYPAIR_LENGTH};
pub use signature::Signature;
pub use transaction::{
    build_sol_transfer, build_system_transfer_instruction, compile_transaction,
    encode_compact_u16, serialize_message, sign_transaction, CompiledInstruction,
    SignedTransaction, SolAccountMeta, SolInstruction, SolTransaction, SYSTEM_PROGRAM_ID,
};

//! Solana transaction wire format and signing for native SOL transfers.
//!
//! The layout is written by hand, no `solana-sdk`:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use crate::address::Address;
use crate::error::SolError;
use crate::keypair::Keypair;
use crate::signature::Signature;

// ---------------------------------------------------------------------------
// Solana System Program
// ---------------------------------------------------------------------------

/// The System Program: 32 zero bytes, `11111111111111111111111111111111`.
pub const SYSTEM_PROGRAM_ID: Address = Address::new([0u8; 32]);

/// System Program `Transfer` instruction index (little-endian u32).
const SYSTEM_TRANSFER_IX_INDEX: u32 = 2;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in an instruction.
#[derive(Debug, Clone)]
pub struct SolAccountMeta {
    pub pubkey: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// An instruction before it is compiled into a transaction.
#[derive(Debug, Clone)]
pub struct SolInstruction {
    pub program_id: Address,
    pub accounts: Vec<SolAccountMeta>,
    pub data: Vec<u8>,
}

/// An unsigned, compiled transaction.
#[derive(Debug, Clone)]
pub struct SolTransaction {
    /// All account keys referenced by this transaction, in canonical order:
    ///   1. writable signers
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Address>,

    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,

    pub recent_blockhash: [u8; 32],

    /// Compiled instructions (account references replaced with indices).
    pub compiled_instructions: Vec<CompiledInstruction>,
}

/// A compiled instruction where account references are replaced by u8 indices
/// into the transaction's `account_keys` array.
#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// A signed transaction ready for `sendTransaction`.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// Fee payer signature; doubles as the transaction id.
    pub signature: Signature,
    /// Full wire bytes: signatures followed by the message.
    pub wire: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Transaction building
// ---------------------------------------------------------------------------

/// Build a native SOL transfer transaction with `from` as fee payer.
///
/// The caller supplies a recent blockhash obtained from the RPC.
pub fn build_sol_transfer(
    from: &Address,
    to: &Address,
    lamports: u64,
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    if lamports == 0 {
        return Err(SolError::TransactionBuildError(
            "lamports must be > 0".into(),
        ));
    }

    let instruction = build_system_transfer_instruction(from, to, lamports);
    compile_transaction(&[instruction], from, recent_blockhash)
}

/// Build a System Program `Transfer` instruction.
pub fn build_system_transfer_instruction(
    from: &Address,
    to: &Address,
    lamports: u64,
) -> SolInstruction {
    // u32 LE instruction index (2 = Transfer) + u64 LE lamports.
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    SolInstruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta {
                pubkey: *from,
                is_signer: true,
                is_writable: true,
            },
            SolAccountMeta {
                pubkey: *to,
                is_signer: false,
                is_writable: true,
            },
        ],
        data,
    }
}

/// Compile instructions into a transaction with a single fee payer.
///
/// The fee payer is always the first signer and sits at index 0.
pub fn compile_transaction(
    instructions: &[SolInstruction],
    fee_payer: &Address,
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    struct AccountEntry {
        pubkey: Address,
        is_signer: bool,
        is_writable: bool,
    }

    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: Address, signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    // Fee payer is always signer + writable.
    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        // Program IDs are non-signer, read-only accounts.
        upsert(ix.program_id, false, false);
    }

    // Stable sort keeps insertion order within a category, so the fee
    // payer stays ahead of any other writable signer.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    if entries.len() > u8::MAX as usize {
        return Err(SolError::TransactionBuildError(format!(
            "too many accounts: {}",
            entries.len()
        )));
    }

    let num_signers = entries.iter().filter(|e| e.is_signer).count() as u8;
    let num_readonly_signed = entries
        .iter()
        .filter(|e| e.is_signer && !e.is_writable)
        .count() as u8;
    let num_readonly_unsigned = entries
        .iter()
        .filter(|e| !e.is_signer && !e.is_writable)
        .count() as u8;

    let account_keys: Vec<Address> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &Address, what: &str| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SolError::TransactionBuildError(format!("{what} not in account keys")))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = index_of(&ix.program_id, "program_id")?;
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey, "account"))
            .collect::<Result<Vec<u8>, SolError>>()?;

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(SolTransaction {
        account_keys,
        num_required_signatures: num_signers,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions: compiled,
    })
}

/// Serialize the transaction message (the bytes that get signed).
pub fn serialize_message(tx: &SolTransaction) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(256);

    buf.push(tx.num_required_signatures);
    buf.push(tx.num_readonly_signed);
    buf.push(tx.num_readonly_unsigned);

    buf.extend_from_slice(&encode_compact_u16(compact_len(tx.account_keys.len())?));
    for key in &tx.account_keys {
        buf.extend_from_slice(key.as_bytes());
    }

    buf.extend_from_slice(&tx.recent_blockhash);

    buf.extend_from_slice(&encode_compact_u16(compact_len(
        tx.compiled_instructions.len(),
    )?));
    for ix in &tx.compiled_instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&encode_compact_u16(compact_len(ix.account_indices.len())?));
        buf.extend_from_slice(&ix.account_indices);

        buf.extend_from_slice(&encode_compact_u16(compact_len(ix.data.len())?));
        buf.extend_from_slice(&ix.data);
    }

    Ok(buf)
}

/// Sign a single-signer transaction and serialize it into wire format.
///
/// The keypair must be the fee payer at `account_keys[0]`.
pub fn sign_transaction(
    tx: &SolTransaction,
    keypair: &Keypair,
) -> Result<SignedTransaction, SolError> {
    if tx.num_required_signatures != 1 {
        return Err(SolError::TransactionBuildError(format!(
            "expected 1 required signature, got {}",
            tx.num_required_signatures
        )));
    }
    if tx.account_keys.first() != Some(&keypair.pubkey()) {
        return Err(SolError::TransactionBuildError(
            "signer is not the fee payer".into(),
        ));
    }

    let message_bytes = serialize_message(tx)?;
    let signature = keypair.sign_message(&message_bytes);

    let mut wire = Vec::with_capacity(1 + 64 + message_bytes.len());
    wire.extend_from_slice(&encode_compact_u16(1));
    wire.extend_from_slice(signature.as_bytes());
    wire.extend_from_slice(&message_bytes);

    Ok(SignedTransaction { signature, wire })
}

fn compact_len(len: usize) -> Result<u16, SolError> {
    u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("length {len} exceeds compact-u16")))
}

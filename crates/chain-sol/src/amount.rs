//! SOL <-> lamport conversion.
//!
//! Amounts entered by a user are whole-currency decimals ("0.1 SOL"); the
//! ledger only understands integer lamports. Conversion is done with exact
//! decimal arithmetic so that `0.1` becomes exactly `100_000_000` and a
//! value that would need fractional lamports is rejected instead of being
//! silently rounded.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::SolError;

/// Number of lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Decimal places between SOL and lamports.
const LAMPORT_SCALE: u32 = 9;

/// Convert a positive SOL amount into lamports.
///
/// Fails with [`SolError::InvalidAmount`] if the amount is zero or negative,
/// has more than nine decimal places (fractional lamports), or does not fit
/// in a `u64`.
pub fn sol_to_lamports(amount: Decimal) -> Result<u64, SolError> {
    if amount <= Decimal::ZERO {
        return Err(SolError::InvalidAmount(format!(
            "amount must be positive, got {amount}"
        )));
    }

    let lamports = amount
        .checked_mul(Decimal::from(LAMPORTS_PER_SOL))
        .ok_or_else(|| SolError::InvalidAmount(format!("{amount} SOL overflows")))?;

    if !lamports.fract().is_zero() {
        return Err(SolError::InvalidAmount(format!(
            "{amount} SOL is not a whole number of lamports"
        )));
    }

    lamports
        .to_u64()
        .ok_or_else(|| SolError::InvalidAmount(format!("{amount} SOL exceeds u64 lamports")))
}

/// Convert lamports into a SOL decimal (exact, nine decimal places).
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from_i128_with_scale(lamports as i128, LAMPORT_SCALE).normalize()
}

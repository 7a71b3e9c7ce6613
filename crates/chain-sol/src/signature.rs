use std::fmt;
use std::str::FromStr;

use crate::error::SolError;

/// A 64-byte Ed25519 signature. The first signature of a transaction is
/// also its identifier on the ledger, shown as Base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 64]);

impl Signature {
    pub const fn new(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl FromStr for Signature {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SolError::InvalidSignature(format!("base58 decode failed: {e}")))?;
        let arr: [u8; 64] = bytes.try_into().map_err(|v: Vec<u8>| {
            SolError::InvalidSignature(format!("expected 64 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base58_roundtrip() {
        let sig = Signature::new([0x5Au8; 64]);
        let parsed: Signature = sig.to_string().parse().unwrap();
        assert_eq!(parsed, sig);
    }

    #[test]
    fn short_input_is_rejected() {
        let err = "11111111111111111111111111111111".parse::<Signature>().unwrap_err();
        assert!(err.to_string().contains("expected 64 bytes"));
    }
}

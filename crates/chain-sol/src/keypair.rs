//! Ed25519 signing identity.
//!
//! Solana tooling stores a keypair as 64 bytes: the 32-byte Ed25519 seed
//! followed by the 32-byte public key. That is the form accepted here.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::address::Address;
use crate::error::SolError;
use crate::signature::Signature;

/// Length of a serialized keypair (seed + public key).
pub const KEYPAIR_LENGTH: usize = 64;

/// A signing identity. The secret half is zeroized on drop and never
/// printed by `Debug`.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Rebuild a keypair from its 64-byte serialized form.
    ///
    /// The trailing 32 bytes must be the public key derived from the leading
    /// seed; a mismatched pair is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SolError> {
        let arr: &[u8; KEYPAIR_LENGTH] = bytes.try_into().map_err(|_| {
            SolError::InvalidKeypair(format!(
                "expected {KEYPAIR_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;

        let signing_key = SigningKey::from_keypair_bytes(arr)
            .map_err(|_| SolError::InvalidKeypair("public key does not match seed".into()))?;

        Ok(Self { signing_key })
    }

    /// Build a keypair from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// The address (public key) of this identity.
    pub fn pubkey(&self) -> Address {
        Address::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Serialize back to the 64-byte seed + public key layout.
    pub fn to_bytes(&self) -> Zeroizing<[u8; KEYPAIR_LENGTH]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// Sign arbitrary bytes.
    pub fn sign_message(&self, message: &[u8]) -> Signature {
        Signature::new(self.signing_key.sign(message).to_bytes())
    }

    /// Check a signature produced by this identity.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
        self.signing_key
            .verifying_key()
            .verify_strict(message, &sig)
            .is_ok()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_64_bytes() {
        let original = Keypair::from_seed(&[0x42u8; 32]);
        let bytes = original.to_bytes();
        let restored = Keypair::from_bytes(bytes.as_slice()).unwrap();
        assert_eq!(restored.pubkey(), original.pubkey());
    }

    #[test]
    fn trailing_bytes_are_the_public_key() {
        let keypair = Keypair::from_seed(&[0x07u8; 32]);
        let bytes = keypair.to_bytes();
        assert_eq!(&bytes[..32], &[0x07u8; 32]);
        assert_eq!(&bytes[32..], keypair.pubkey().as_bytes());
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = Keypair::from_bytes(&[1u8; 32]).unwrap_err();
        assert!(err.to_string().contains("expected 64 bytes, got 32"));
    }

    #[test]
    fn mismatched_public_half_is_rejected() {
        let mut bytes = *Keypair::from_seed(&[0x11u8; 32]).to_bytes();
        bytes[40] ^= 0xff;
        let err = Keypair::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, SolError::InvalidKeypair(_)));
    }

    #[test]
    fn generated_keypairs_differ() {
        assert_ne!(Keypair::generate().pubkey(), Keypair::generate().pubkey());
    }

    #[test]
    fn sign_and_verify() {
        let keypair = Keypair::from_seed(&[0x55u8; 32]);
        let sig = keypair.sign_message(b"hello devnet");
        assert!(keypair.verify(b"hello devnet", &sig));
        assert!(!keypair.verify(b"tampered", &sig));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let keypair = Keypair::from_seed(&[0xAAu8; 32]);
        let debug = format!("{keypair:?}");
        assert!(debug.contains(&keypair.pubkey().to_string()));
        assert!(!debug.contains("170")); // 0xAA as decimal
    }
}

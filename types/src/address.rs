//! 32-byte identity of a mint or token account.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::keys::PublicKey;

/// Address of a mint or token account on the ledger.
///
/// Mints are addressed by the public key of the keypair that created them.
/// Token accounts are addressed by a hash derived from `(owner, mint)`
/// (see `levy_crypto::derive_token_account_address`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a 64-character lowercase or uppercase hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl From<PublicKey> for Address {
    fn from(key: PublicKey) -> Self {
        Self(key.0)
    }
}

impl From<&PublicKey> for Address {
    fn from(key: &PublicKey) -> Self {
        Self(key.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let addr = Address::new([0xAB; 32]);
        let parsed = Address::from_hex(&addr.to_string()).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(Address::from_hex("abcd").is_none());
        assert!(Address::from_hex("").is_none());
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let bad = "zz".repeat(32);
        assert!(Address::from_hex(&bad).is_none());
    }

    #[test]
    fn from_public_key_keeps_bytes() {
        let key = PublicKey([7u8; 32]);
        assert_eq!(Address::from(&key).as_bytes(), &[7u8; 32]);
    }
}

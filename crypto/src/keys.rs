//! Ed25519 identities for owners, mints and fee authorities.
//!
//! A private key is the 32-byte Ed25519 seed, which is also what the keystore
//! seals. Restoring it always yields the same public identity.

use ed25519_dalek::SigningKey;
use levy_types::{KeyPair, PrivateKey, PublicKey};
use rand::rngs::OsRng;

/// A fresh identity from the OS random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

/// Rebuild the identity behind a decrypted keystore secret.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    KeyPair {
        public: public_from_private(&private),
        private,
    }
}

/// Fixed identity for a seed. Tests and benches use it to name keys that no
/// credential store holds.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_from_private(PrivateKey(*seed))
}

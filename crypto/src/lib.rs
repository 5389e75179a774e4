//! Cryptographic primitives for Levy.
//!
//! - **Ed25519** for signing and credential verification
//! - **Blake2b** for hashing (operation digests, batch receipts, account derivation)
//! - Token-account address derivation from `(owner, mint)`
//! - The [`CredentialStore`] seam through which orchestrators obtain signatures

pub mod address;
pub mod credential;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::derive_token_account_address;
pub use credential::{CredentialError, CredentialStore};
pub use hash::{batch_receipt, blake2b_256, tagged_hash};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_credential, sign_message, verify_credential, verify_signature};

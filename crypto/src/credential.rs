//! The credential-store seam.
//!
//! Orchestrators never hold private keys. They hand an operation digest and
//! the identity that must authorise it to a [`CredentialStore`], and pass the
//! resulting [`Credential`] to the ledger client for verification.

use levy_types::{Credential, PublicKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no key held for identity {0}")]
    UnknownIdentity(PublicKey),

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Source of signatures for the identities a caller controls.
pub trait CredentialStore: Send + Sync {
    /// Sign `digest` as `identity`.
    fn sign(&self, identity: &PublicKey, digest: [u8; 32]) -> Result<Credential, CredentialError>;

    /// Whether this store holds the key for `identity`.
    fn contains(&self, identity: &PublicKey) -> bool;
}

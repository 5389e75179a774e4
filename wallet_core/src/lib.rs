//! Credential stores for levy.
//!
//! - [`MemoryCredentialStore`] holds unlocked keys and signs operation digests
//! - [`FileCredentialStore`] persists named key pairs, each encrypted with
//!   Argon2id + AES-256-GCM, and unlocks them into a memory store

pub mod credential_store;
pub mod error;
pub mod keystore;

pub use credential_store::{FileCredentialStore, MemoryCredentialStore};
pub use error::WalletError;
pub use keystore::{
    decrypt_keystore, encrypt_keystore, load_keystore, save_keystore, KdfParams, KeystoreFile,
};

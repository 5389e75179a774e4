//! Fundamental types for the Levy transfer-fee token model.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! identities, hashes, credentials, amounts, and the mint / token-account data model.

pub mod account;
pub mod address;
pub mod amount;
pub mod hash;
pub mod keys;
pub mod mint;

pub use account::{TokenAccount, TransferFeeAmount};
pub use address::Address;
pub use hash::TxHash;
pub use keys::{Credential, KeyPair, PrivateKey, PublicKey, Signature};
pub use mint::{Mint, TransferFeeConfig, MAX_FEE_BASIS_POINTS};

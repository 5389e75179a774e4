//! Ledger client interface.
//!
//! The fee core never talks to storage or the network directly. Everything it
//! needs from the ledger goes through [`LedgerClient`]: point reads, idempotent
//! account creation, a scan by mint, signer verification, and one atomic
//! write primitive that applies a [`MutationBatch`] under optimistic versioning.

pub mod client;
pub mod error;
pub mod mutation;

pub use client::LedgerClient;
pub use error::LedgerError;
pub use mutation::{apply_delta, Mutation, MutationBatch, MutationTarget};

//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern: the ledger is abstracted
//! behind [`levy_ledger::LedgerClient`] and this crate provides an in-memory
//! implementation that:
//! - Is thread-safe, with one lock as the serialization point for all writes
//! - Enforces the same versioned all-or-nothing semantics a real client must
//! - Can be told to fail upcoming writes with `Conflict` to exercise retries
//! - Can be snapshotted to / restored from a JSON file for local simulation
//!
//! Usage: swap the real client for [`NullLedger`] in tests.

pub mod ledger;
pub mod snapshot;

pub use ledger::NullLedger;
pub use snapshot::{LedgerSnapshot, SnapshotError};

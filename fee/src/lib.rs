//! Transfer-fee accounting engine.
//!
//! A mint carries a [`TransferFeeConfig`](levy_types::TransferFeeConfig). Every
//! transfer charges `min(maximum_fee, floor(amount * bps / 10_000))`, carved
//! out of the transferred amount and withheld at the destination account
//! rather than paid anywhere. Withheld fees accumulate per account until the
//! withdraw authority sweeps them to a vault, either directly from accounts
//! or after a permissionless harvest into the mint-level pool.
//!
//! Components, leaf-first:
//! - [`policy`]: the fee function
//! - [`withheld`]: read-only projection of withheld balances per mint
//! - [`transfer`]: checked, fee-aware transfers
//! - [`harvest`]: harvest to mint, withdraw from accounts / mint
//! - [`lifecycle`]: mint creation, minting, fee-config updates
//!
//! All components talk to the ledger through [`levy_ledger::LedgerClient`] and
//! obtain signatures through [`levy_crypto::CredentialStore`]; both are injected.

pub mod authorization;
pub mod engine;
pub mod error;
pub mod harvest;
pub mod lifecycle;
pub mod policy;
pub mod transfer;
pub mod withheld;

#[cfg(test)]
pub(crate) mod testing;

pub use authorization::Operation;
pub use engine::FeeEngine;
pub use error::FeeError;
pub use harvest::{HarvestSummary, HarvestWithdrawOrchestrator, WithdrawBatch, WithdrawEntry, WithheldSource};
pub use lifecycle::{CreateMint, MintLifecycle, MintToResult};
pub use policy::{compute_fee, validate_fee_config, FeePolicy};
pub use transfer::{TransferOrchestrator, TransferRequest, TransferResult};
pub use withheld::{WithheldEntry, WithheldLedger, WithheldTotals};

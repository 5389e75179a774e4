//! Ledger snapshots: capture every mint and account at a point in time.
//!
//! Snapshots let separate CLI invocations share one simulated ledger: the
//! state is written to a JSON file after each run and restored before the
//! next. The snapshot hash is computed deterministically from the entries so
//! a hand-edited or truncated file is rejected on load.

use std::path::Path;

use levy_crypto::blake2b_256;
use levy_types::{Mint, TokenAccount};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("snapshot hash does not match its contents")]
    HashMismatch,
}

/// Full ledger state plus an integrity hash.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the entries and sequence.
    pub hash: [u8; 32],
    /// Number of committed writes at capture time.
    pub sequence: u64,
    pub mints: Vec<Mint>,
    pub accounts: Vec<TokenAccount>,
    /// Snapshot version for compatibility.
    pub version: u32,
}

impl LedgerSnapshot {
    pub fn create(accounts: Vec<TokenAccount>, mints: Vec<Mint>, sequence: u64) -> Self {
        let mut snap = Self {
            hash: [0u8; 32],
            sequence,
            mints,
            accounts,
            version: 1,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        let mut buf = Vec::new();
        for mint in &self.mints {
            buf.extend_from_slice(mint.address.as_bytes());
            buf.extend_from_slice(mint.mint_authority.as_bytes());
            buf.push(mint.decimals);
            buf.extend_from_slice(&mint.supply.to_le_bytes());
            let cfg = &mint.transfer_fee_config;
            buf.extend_from_slice(&cfg.fee_basis_points.to_le_bytes());
            buf.extend_from_slice(&cfg.maximum_fee.to_le_bytes());
            buf.extend_from_slice(cfg.config_authority.as_bytes());
            buf.extend_from_slice(cfg.withdraw_authority.as_bytes());
            buf.extend_from_slice(&mint.withheld_amount.to_le_bytes());
            buf.extend_from_slice(&mint.version.to_le_bytes());
        }
        for account in &self.accounts {
            buf.extend_from_slice(account.address.as_bytes());
            buf.extend_from_slice(account.owner.as_bytes());
            buf.extend_from_slice(account.mint.as_bytes());
            buf.extend_from_slice(&account.amount.to_le_bytes());
            match account.transfer_fee_amount {
                Some(ext) => {
                    buf.push(1);
                    buf.extend_from_slice(&ext.withheld_amount.to_le_bytes());
                }
                None => buf.push(0),
            }
            buf.extend_from_slice(&account.version.to_le_bytes());
        }
        buf.extend_from_slice(&self.sequence.to_le_bytes());
        blake2b_256(&buf)
    }

    /// Verify the snapshot hash matches the entries.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a snapshot file and check its hash.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        let snap: Self = serde_json::from_str(&content)?;
        if !snap.verify() {
            return Err(SnapshotError::HashMismatch);
        }
        Ok(snap)
    }
}

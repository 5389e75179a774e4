//! Nullable ledger: thread-safe in-memory ledger client.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use levy_crypto::{batch_receipt, derive_token_account_address};
use levy_ledger::{apply_delta, LedgerClient, LedgerError, MutationBatch, MutationTarget};
use levy_types::{
    Address, Mint, PublicKey, TokenAccount, TransferFeeAmount, TransferFeeConfig, TxHash,
};

use crate::snapshot::{LedgerSnapshot, SnapshotError};

#[derive(Default)]
pub(crate) struct LedgerState {
    pub(crate) accounts: BTreeMap<Address, TokenAccount>,
    pub(crate) mints: BTreeMap<Address, Mint>,
    pub(crate) sequence: u64,
}

/// An in-memory ledger client.
pub struct NullLedger {
    state: Mutex<LedgerState>,
    injected_conflicts: AtomicUsize,
}

/// A staged write produced while validating a batch.
enum Staged {
    Account(TokenAccount),
    Mint(Mint),
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            injected_conflicts: AtomicUsize::new(0),
        }
    }

    /// Rebuild a ledger from a verified snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, SnapshotError> {
        if !snapshot.verify() {
            return Err(SnapshotError::HashMismatch);
        }
        let state = LedgerState {
            accounts: snapshot
                .accounts
                .into_iter()
                .map(|a| (a.address, a))
                .collect(),
            mints: snapshot.mints.into_iter().map(|m| (m.address, m)).collect(),
            sequence: snapshot.sequence,
        };
        Ok(Self {
            state: Mutex::new(state),
            injected_conflicts: AtomicUsize::new(0),
        })
    }

    /// Capture the full ledger state.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let state = self.state()?;
        Ok(LedgerSnapshot::create(
            state.accounts.values().cloned().collect(),
            state.mints.values().cloned().collect(),
            state.sequence,
        ))
    }

    /// Insert or overwrite an account verbatim (e.g. one without the fee extension).
    pub fn insert_account(&self, account: TokenAccount) -> Result<(), LedgerError> {
        self.state()?.accounts.insert(account.address, account);
        Ok(())
    }

    /// Make the next `count` calls to `apply_atomic` fail with `Conflict`.
    pub fn inject_conflicts(&self, count: usize) {
        self.injected_conflicts.store(count, Ordering::SeqCst);
    }

    /// Number of committed writes so far.
    pub fn sequence(&self) -> Result<u64, LedgerError> {
        Ok(self.state()?.sequence)
    }

    fn state(&self) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        self.state
            .lock()
            .map_err(|_| LedgerError::Backend("ledger state lock poisoned".into()))
    }

    fn take_injected_conflict(&self) -> bool {
        self.injected_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn commit_receipt(state: &mut LedgerState, payload: &[u8]) -> TxHash {
        state.sequence += 1;
        batch_receipt(state.sequence, payload)
    }

    fn stage(state: &LedgerState, batch: &MutationBatch) -> Result<Vec<Staged>, LedgerError> {
        let mut staged = Vec::with_capacity(batch.len());
        for m in batch.mutations() {
            match m.target {
                MutationTarget::Account(address) => {
                    let mut account = state
                        .accounts
                        .get(&address)
                        .cloned()
                        .ok_or(LedgerError::AccountNotFound(address))?;
                    check_version(&m.target, m.expected_version, account.version)?;
                    account.amount = apply_delta(account.amount, m.balance_delta).ok_or_else(
                        || out_of_range(&m.target, "balance", account.amount, m.balance_delta),
                    )?;
                    if m.withheld_delta != 0 {
                        let current = account.withheld_amount();
                        let withheld = apply_delta(current, m.withheld_delta).ok_or_else(|| {
                            out_of_range(&m.target, "withheld", current, m.withheld_delta)
                        })?;
                        account.transfer_fee_amount = Some(TransferFeeAmount {
                            withheld_amount: withheld,
                        });
                    }
                    account.version += 1;
                    staged.push(Staged::Account(account));
                }
                MutationTarget::Mint(address) => {
                    let mut mint = state
                        .mints
                        .get(&address)
                        .cloned()
                        .ok_or(LedgerError::MintNotFound(address))?;
                    check_version(&m.target, m.expected_version, mint.version)?;
                    mint.supply = apply_delta(mint.supply, m.balance_delta).ok_or_else(|| {
                        out_of_range(&m.target, "supply", mint.supply, m.balance_delta)
                    })?;
                    mint.withheld_amount = apply_delta(mint.withheld_amount, m.withheld_delta)
                        .ok_or_else(|| {
                            out_of_range(&m.target, "withheld", mint.withheld_amount, m.withheld_delta)
                        })?;
                    mint.version += 1;
                    staged.push(Staged::Mint(mint));
                }
            }
        }
        Ok(staged)
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn check_version(target: &MutationTarget, expected: u64, found: u64) -> Result<(), LedgerError> {
    if expected == found {
        Ok(())
    } else {
        Err(LedgerError::Conflict {
            target: format!("{target:?}"),
            expected,
            found,
        })
    }
}

fn out_of_range(target: &MutationTarget, field: &str, current: u64, delta: i128) -> LedgerError {
    LedgerError::InvalidMutation(format!(
        "{target:?}: {field} {current} {delta:+} leaves u64 range"
    ))
}

impl LedgerClient for NullLedger {
    fn get_account(&self, address: &Address) -> Result<TokenAccount, LedgerError> {
        self.state()?
            .accounts
            .get(address)
            .cloned()
            .ok_or(LedgerError::AccountNotFound(*address))
    }

    fn create_account_if_absent(
        &self,
        owner: &PublicKey,
        mint: &Address,
    ) -> Result<TokenAccount, LedgerError> {
        let mut state = self.state()?;
        if !state.mints.contains_key(mint) {
            return Err(LedgerError::MintNotFound(*mint));
        }
        let address = derive_token_account_address(owner, mint);
        if let Some(existing) = state.accounts.get(&address) {
            return Ok(existing.clone());
        }
        let account = TokenAccount::new(address, *owner, *mint);
        state.accounts.insert(address, account.clone());
        state.sequence += 1;
        tracing::debug!(account = %address, owner = %owner, mint = %mint, "created token account");
        Ok(account)
    }

    fn scan_accounts_by_mint(&self, mint: &Address) -> Result<Vec<TokenAccount>, LedgerError> {
        Ok(self
            .state()?
            .accounts
            .values()
            .filter(|a| a.mint == *mint)
            .cloned()
            .collect())
    }

    fn apply_atomic(&self, batch: &MutationBatch) -> Result<TxHash, LedgerError> {
        if batch.is_empty() {
            return Err(LedgerError::InvalidMutation("empty batch".into()));
        }
        let payload =
            bincode::serialize(batch).map_err(|e| LedgerError::Backend(e.to_string()))?;

        let mut state = self.state()?;
        if self.take_injected_conflict() {
            return Err(LedgerError::Conflict {
                target: "injected".into(),
                expected: 0,
                found: 0,
            });
        }

        // Validate everything before touching state so a failure commits nothing.
        for staged in Self::stage(&state, batch)? {
            match staged {
                Staged::Account(account) => {
                    state.accounts.insert(account.address, account);
                }
                Staged::Mint(mint) => {
                    state.mints.insert(mint.address, mint);
                }
            }
        }
        Ok(Self::commit_receipt(&mut state, &payload))
    }

    fn get_mint(&self, address: &Address) -> Result<Mint, LedgerError> {
        self.state()?
            .mints
            .get(address)
            .cloned()
            .ok_or(LedgerError::MintNotFound(*address))
    }

    fn initialize_mint(&self, mint: Mint) -> Result<TxHash, LedgerError> {
        let mut state = self.state()?;
        if state.mints.contains_key(&mint.address) {
            return Err(LedgerError::AlreadyExists(mint.address));
        }
        let payload =
            bincode::serialize(&mint).map_err(|e| LedgerError::Backend(e.to_string()))?;
        state.mints.insert(mint.address, mint);
        Ok(Self::commit_receipt(&mut state, &payload))
    }

    fn update_transfer_fee_config(
        &self,
        mint: &Address,
        config: TransferFeeConfig,
        expected_version: u64,
    ) -> Result<TxHash, LedgerError> {
        let payload =
            bincode::serialize(&config).map_err(|e| LedgerError::Backend(e.to_string()))?;
        let mut state = self.state()?;
        let entry = state
            .mints
            .get_mut(mint)
            .ok_or(LedgerError::MintNotFound(*mint))?;
        check_version(&MutationTarget::Mint(*mint), expected_version, entry.version)?;
        entry.transfer_fee_config = config;
        entry.version += 1;
        Ok(Self::commit_receipt(&mut state, &payload))
    }
}

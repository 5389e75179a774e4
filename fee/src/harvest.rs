//! Harvest withheld fees into the mint pool and withdraw them to a vault.
//!
//! Every operation re-reads the accounts it touches and commits one batch
//! guarded by the versions it read. A concurrent transfer crediting one of
//! those accounts moves its version on, so the batch conflicts instead of
//! zeroing an amount it never saw.

use std::collections::BTreeSet;
use std::sync::Arc;

use levy_crypto::CredentialStore;
use levy_ledger::{LedgerClient, LedgerError, MutationBatch};
use levy_types::{Address, Mint, PublicKey, TokenAccount, TxHash};
use serde::Serialize;

use crate::authorization::{authorize, Operation};
use crate::error::FeeError;

/// Where a withdrawn or harvested amount came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WithheldSource {
    Account(Address),
    /// The mint-level pool.
    Mint(Address),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WithdrawEntry {
    pub source: WithheldSource,
    pub amount: u64,
}

/// Outcome of a harvest. `tx` is `None` when there was nothing to move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HarvestSummary {
    pub mint: Address,
    pub entries: Vec<WithdrawEntry>,
    pub total: u128,
    pub tx: Option<TxHash>,
}

/// Outcome of a committed withdraw, with the per-source breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WithdrawBatch {
    pub mint: Address,
    pub vault: Address,
    pub entries: Vec<WithdrawEntry>,
    pub total: u128,
    pub tx: TxHash,
}

pub struct HarvestWithdrawOrchestrator<L, C> {
    ledger: Arc<L>,
    credentials: Arc<C>,
}

impl<L: LedgerClient, C: CredentialStore> HarvestWithdrawOrchestrator<L, C> {
    pub fn new(ledger: Arc<L>, credentials: Arc<C>) -> Self {
        Self {
            ledger,
            credentials,
        }
    }

    /// Move the withheld amount of each account into the mint pool.
    ///
    /// Permissionless. Accounts holding nothing are skipped, as are accounts
    /// that no longer exist or belong to another mint.
    pub fn harvest_to_mint(
        &self,
        mint: &Address,
        accounts: &[Address],
    ) -> Result<HarvestSummary, FeeError> {
        let mint = self.ledger.get_mint(mint)?;
        let mut batch = MutationBatch::new();
        let mut entries = Vec::new();
        let mut total: u128 = 0;

        for address in dedup(accounts) {
            let account = match self.ledger.get_account(&address) {
                Ok(account) if account.mint == mint.address => account,
                Ok(account) => {
                    tracing::warn!(account = %address, mint = %mint.address, found = %account.mint, "skipping foreign account");
                    continue;
                }
                Err(LedgerError::AccountNotFound(_)) => {
                    tracing::warn!(account = %address, mint = %mint.address, "skipping missing account");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let withheld = account.withheld_amount();
            if withheld == 0 {
                continue;
            }
            batch.account(&account, 0, -i128::from(withheld));
            entries.push(WithdrawEntry {
                source: WithheldSource::Account(address),
                amount: withheld,
            });
            total += u128::from(withheld);
        }

        if entries.is_empty() {
            tracing::debug!(mint = %mint.address, "harvest found nothing to move");
            return Ok(HarvestSummary {
                mint: mint.address,
                entries,
                total: 0,
                tx: None,
            });
        }

        batch.mint(&mint, 0, signed_total(total)?);
        let tx = self.ledger.apply_atomic(&batch)?;
        tracing::info!(mint = %mint.address, accounts = entries.len(), total = %total, tx = %tx, "harvested withheld fees");

        Ok(HarvestSummary {
            mint: mint.address,
            entries,
            total,
            tx: Some(tx),
        })
    }

    /// Zero the withheld amount of each listed account and credit the sum to `vault`.
    ///
    /// Amounts are read at call time; a listing taken earlier only selects
    /// which accounts are drained.
    pub fn withdraw_from_accounts(
        &self,
        mint: &Address,
        vault: &Address,
        authority: &PublicKey,
        sources: &[Address],
    ) -> Result<WithdrawBatch, FeeError> {
        if sources.is_empty() {
            return Err(FeeError::EmptyBatch);
        }
        let mint = self.ledger.get_mint(mint)?;
        let sources = dedup(sources);

        let operation = Operation::WithdrawFromAccounts {
            mint: mint.address,
            vault: *vault,
            sources: sources.clone(),
        };
        self.authorize_withdraw(&mint, &operation, authority)?;

        let vault = self.vault(&mint, vault)?;
        let mut batch = MutationBatch::new();
        let mut entries = Vec::with_capacity(sources.len());
        let mut total: u128 = 0;

        for address in &sources {
            let account = self.ledger.get_account(address)?;
            ensure_same_mint(&account, &mint)?;
            let withheld = account.withheld_amount();
            batch.account(&account, 0, -i128::from(withheld));
            entries.push(WithdrawEntry {
                source: WithheldSource::Account(*address),
                amount: withheld,
            });
            total += u128::from(withheld);
        }

        if total == 0 {
            tracing::warn!(mint = %mint.address, vault = %vault.address, "nothing to withdraw");
            return Err(FeeError::NothingToWithdraw(mint.address));
        }

        batch.account(&vault, signed_total(total)?, 0);
        let tx = self.ledger.apply_atomic(&batch)?;
        tracing::info!(
            mint = %mint.address,
            vault = %vault.address,
            accounts = entries.len(),
            total = %total,
            tx = %tx,
            "withdrew withheld fees from accounts"
        );

        Ok(WithdrawBatch {
            mint: mint.address,
            vault: vault.address,
            entries,
            total,
            tx,
        })
    }

    /// Drain the mint-level pool into `vault`.
    pub fn withdraw_from_mint(
        &self,
        mint: &Address,
        vault: &Address,
        authority: &PublicKey,
    ) -> Result<WithdrawBatch, FeeError> {
        let mint = self.ledger.get_mint(mint)?;
        let operation = Operation::WithdrawFromMint {
            mint: mint.address,
            vault: *vault,
        };
        self.authorize_withdraw(&mint, &operation, authority)?;

        let vault = self.vault(&mint, vault)?;
        let pool = mint.withheld_amount;
        if pool == 0 {
            tracing::warn!(mint = %mint.address, vault = %vault.address, "mint pool is empty");
            return Err(FeeError::NothingToWithdraw(mint.address));
        }

        let mut batch = MutationBatch::new();
        batch
            .mint(&mint, 0, -i128::from(pool))
            .account(&vault, i128::from(pool), 0);
        let tx = self.ledger.apply_atomic(&batch)?;
        tracing::info!(mint = %mint.address, vault = %vault.address, total = pool, tx = %tx, "withdrew mint pool");

        Ok(WithdrawBatch {
            mint: mint.address,
            vault: vault.address,
            entries: vec![WithdrawEntry {
                source: WithheldSource::Mint(mint.address),
                amount: pool,
            }],
            total: u128::from(pool),
            tx,
        })
    }

    fn authorize_withdraw(
        &self,
        mint: &Mint,
        operation: &Operation,
        authority: &PublicKey,
    ) -> Result<(), FeeError> {
        let required = mint.transfer_fee_config.withdraw_authority;
        if authorize(&*self.ledger, &*self.credentials, operation, authority, &required)? {
            Ok(())
        } else {
            Err(FeeError::UnauthorizedWithdraw {
                signer: *authority,
                required,
            })
        }
    }

    fn vault(&self, mint: &Mint, vault: &Address) -> Result<TokenAccount, FeeError> {
        let vault = self.ledger.get_account(vault)?;
        ensure_same_mint(&vault, mint)?;
        Ok(vault)
    }
}

fn ensure_same_mint(account: &TokenAccount, mint: &Mint) -> Result<(), FeeError> {
    if account.mint == mint.address {
        Ok(())
    } else {
        Err(FeeError::MintMismatch {
            account: account.address,
            expected: mint.address,
            found: account.mint,
        })
    }
}

/// Drop repeated addresses, keeping first-seen order.
fn signed_total(total: u128) -> Result<i128, FeeError> {
    i128::try_from(total)
        .map_err(|_| LedgerError::InvalidMutation(format!("withheld total {total} exceeds a ledger delta")).into())
}

fn dedup(addresses: &[Address]) -> Vec<Address> {
    let mut seen = BTreeSet::new();
    addresses
        .iter()
        .copied()
        .filter(|a| seen.insert(*a))
        .collect()
}

//! Read-only projection of withheld fees per mint.
//!
//! The scan is a snapshot and may be stale by the time it returns. Withdraw
//! re-reads every account it is given, so callers can treat this list as the
//! candidate set rather than as the amounts that will move.

use std::sync::Arc;

use levy_ledger::LedgerClient;
use levy_types::{Address, PublicKey};
use serde::Serialize;

use crate::error::FeeError;

/// An account holding withheld fees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WithheldEntry {
    pub account: Address,
    pub owner: PublicKey,
    pub withheld_amount: u64,
}

/// Withheld fees for a mint, split by where they sit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WithheldTotals {
    /// Sum over token accounts.
    pub accounts: u128,
    /// The mint-level pool (harvested, not yet withdrawn).
    pub mint_pool: u64,
}

impl WithheldTotals {
    pub fn total(&self) -> u128 {
        self.accounts + u128::from(self.mint_pool)
    }
}

pub struct WithheldLedger<L> {
    ledger: Arc<L>,
}

impl<L: LedgerClient> WithheldLedger<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Accounts of `mint` with a nonzero withheld amount, ordered by address.
    ///
    /// Accounts without the transfer-fee extension count as zero and are omitted.
    pub fn list_withheld_accounts(&self, mint: &Address) -> Result<Vec<WithheldEntry>, FeeError> {
        let mut entries: Vec<WithheldEntry> = self
            .ledger
            .scan_accounts_by_mint(mint)?
            .into_iter()
            .filter(|account| account.mint == *mint && account.withheld_amount() > 0)
            .map(|account| WithheldEntry {
                account: account.address,
                owner: account.owner,
                withheld_amount: account.withheld_amount(),
            })
            .collect();
        entries.sort_by_key(|e| e.account);
        tracing::debug!(mint = %mint, accounts = entries.len(), "listed withheld accounts");
        Ok(entries)
    }

    /// Addresses from [`list_withheld_accounts`](Self::list_withheld_accounts), ready for a withdraw batch.
    pub fn withheld_account_addresses(&self, mint: &Address) -> Result<Vec<Address>, FeeError> {
        Ok(self
            .list_withheld_accounts(mint)?
            .into_iter()
            .map(|e| e.account)
            .collect())
    }

    pub fn total_withheld(&self, mint: &Address) -> Result<WithheldTotals, FeeError> {
        let accounts = self
            .list_withheld_accounts(mint)?
            .iter()
            .map(|e| u128::from(e.withheld_amount))
            .sum();
        let mint_pool = self.ledger.get_mint(mint)?.withheld_amount;
        Ok(WithheldTotals {
            accounts,
            mint_pool,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, TOKEN};
    use levy_types::{TokenAccount, TransferFeeAmount};

    #[test]
    fn lists_only_nonzero_accounts_sorted() {
        let fx = Fixture::default_fees();
        let (alice, alice_acct) = fx.funded_owner(1_000 * TOKEN);
        let bob = fx.keys.generate();
        let carol = fx.keys.generate();
        let bob_acct = fx.transfer(&alice, alice_acct, &bob, 100 * TOKEN).unwrap().destination;
        let carol_acct = fx.transfer(&alice, alice_acct, &carol, 200 * TOKEN).unwrap().destination;

        let entries = fx.engine.withheld().list_withheld_accounts(&fx.mint).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.windows(2).all(|w| w[0].account < w[1].account));
        let amount_of = |addr| entries.iter().find(|e| e.account == addr).unwrap().withheld_amount;
        assert_eq!(amount_of(bob_acct), TOKEN);
        assert_eq!(amount_of(carol_acct), 2 * TOKEN);
        // The funded source never received a fee.
        assert!(entries.iter().all(|e| e.account != alice_acct));
    }

    #[test]
    fn accounts_without_extension_are_tolerated() {
        let fx = Fixture::default_fees();
        let mut legacy = TokenAccount::new(Address::new([0x42; 32]), fx.keys.generate(), fx.mint);
        legacy.transfer_fee_amount = None;
        fx.ledger.insert_account(legacy).unwrap();

        let mut extended = TokenAccount::new(Address::new([0x43; 32]), fx.keys.generate(), fx.mint);
        extended.transfer_fee_amount = Some(TransferFeeAmount { withheld_amount: 5 });
        fx.ledger.insert_account(extended.clone()).unwrap();

        let entries = fx.engine.withheld().list_withheld_accounts(&fx.mint).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].account, extended.address);
    }

    #[test]
    fn totals_include_mint_pool() {
        let fx = Fixture::default_fees();
        let (alice, alice_acct) = fx.funded_owner(1_000 * TOKEN);
        let bob = fx.keys.generate();
        let bob_acct = fx.transfer(&alice, alice_acct, &bob, 100 * TOKEN).unwrap().destination;
        let carol = fx.keys.generate();
        fx.transfer(&alice, alice_acct, &carol, 100 * TOKEN).unwrap();

        fx.engine.harvest().harvest_to_mint(&fx.mint, &[bob_acct]).unwrap();

        let totals = fx.engine.withheld().total_withheld(&fx.mint).unwrap();
        assert_eq!(totals.accounts, u128::from(TOKEN));
        assert_eq!(totals.mint_pool, TOKEN);
        assert_eq!(totals.total(), u128::from(2 * TOKEN));
    }

    #[test]
    fn unknown_mint_lists_nothing() {
        let fx = Fixture::default_fees();
        let entries = fx
            .engine
            .withheld()
            .list_withheld_accounts(&Address::new([0xEE; 32]))
            .unwrap();
        assert!(entries.is_empty());
    }
}

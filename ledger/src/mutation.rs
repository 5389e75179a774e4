//! Versioned balance / withheld-fee mutations.

use levy_types::{Address, Mint, TokenAccount};
use serde::{Deserialize, Serialize};

/// The ledger entry a mutation touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MutationTarget {
    /// A token account: `balance_delta` adjusts `amount`, `withheld_delta` the withheld fee.
    Account(Address),
    /// A mint: `balance_delta` adjusts supply, `withheld_delta` the mint-level pool.
    Mint(Address),
}

/// One entry's change within an atomic batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub target: MutationTarget,
    /// Version the caller read; the batch is rejected if the entry moved on.
    pub expected_version: u64,
    pub balance_delta: i128,
    pub withheld_delta: i128,
}

/// An ordered set of mutations with at most one entry per target.
///
/// Adding a second change for a target already in the batch folds the deltas
/// into the existing entry, so self-transfers and vaults that are also
/// withdraw sources stay a single read-modify-write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationBatch {
    mutations: Vec<Mutation>,
}

impl MutationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or fold in) a change for `target`.
    ///
    /// When folding, the first `expected_version` recorded for the target is kept.
    pub fn push(
        &mut self,
        target: MutationTarget,
        expected_version: u64,
        balance_delta: i128,
        withheld_delta: i128,
    ) -> &mut Self {
        if let Some(existing) = self.mutations.iter_mut().find(|m| m.target == target) {
            existing.balance_delta += balance_delta;
            existing.withheld_delta += withheld_delta;
        } else {
            self.mutations.push(Mutation {
                target,
                expected_version,
                balance_delta,
                withheld_delta,
            });
        }
        self
    }

    /// Change an account as of the snapshot `account`.
    pub fn account(
        &mut self,
        account: &TokenAccount,
        balance_delta: i128,
        withheld_delta: i128,
    ) -> &mut Self {
        self.push(
            MutationTarget::Account(account.address),
            account.version,
            balance_delta,
            withheld_delta,
        )
    }

    /// Change a mint's supply / pool as of the snapshot `mint`.
    pub fn mint(&mut self, mint: &Mint, supply_delta: i128, withheld_delta: i128) -> &mut Self {
        self.push(
            MutationTarget::Mint(mint.address),
            mint.version,
            supply_delta,
            withheld_delta,
        )
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Apply a signed delta to an unsigned field; `None` if the result leaves `u64`.
pub fn apply_delta(current: u64, delta: i128) -> Option<u64> {
    i128::from(current)
        .checked_add(delta)
        .and_then(|v| u64::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use levy_types::PublicKey;

    fn account(n: u8, version: u64) -> TokenAccount {
        let mut a = TokenAccount::new(Address::new([n; 32]), PublicKey([n; 32]), Address::ZERO);
        a.version = version;
        a
    }

    #[test]
    fn same_target_folds_into_one_mutation() {
        let a = account(1, 4);
        let mut batch = MutationBatch::new();
        batch.account(&a, -100, 0).account(&a, 95, 5);

        assert_eq!(batch.len(), 1);
        let m = &batch.mutations()[0];
        assert_eq!(m.balance_delta, -5);
        assert_eq!(m.withheld_delta, 5);
        assert_eq!(m.expected_version, 4);
    }

    #[test]
    fn distinct_targets_keep_order() {
        let mut batch = MutationBatch::new();
        batch.account(&account(2, 0), 1, 0).account(&account(1, 0), 2, 0);
        let targets: Vec<_> = batch.mutations().iter().map(|m| m.target).collect();
        assert_eq!(
            targets,
            vec![
                MutationTarget::Account(Address::new([2; 32])),
                MutationTarget::Account(Address::new([1; 32])),
            ]
        );
    }

    #[test]
    fn account_and_mint_with_same_bytes_are_distinct() {
        let a = account(1, 0);
        let mint = levy_types::Mint::new(
            Address::new([1; 32]),
            PublicKey([0; 32]),
            9,
            levy_types::TransferFeeConfig {
                fee_basis_points: 0,
                maximum_fee: 0,
                config_authority: PublicKey([0; 32]),
                withdraw_authority: PublicKey([0; 32]),
            },
        );
        let mut batch = MutationBatch::new();
        batch.account(&a, 0, -1).mint(&mint, 0, 1);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn apply_delta_bounds() {
        assert_eq!(apply_delta(10, -10), Some(0));
        assert_eq!(apply_delta(10, -11), None);
        assert_eq!(apply_delta(u64::MAX, 1), None);
        assert_eq!(apply_delta(0, i128::from(u64::MAX)), Some(u64::MAX));
    }
}

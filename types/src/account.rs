//! Token accounts and their withheld-fee extension.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::keys::PublicKey;

/// Fees withheld at an account, pending harvest or withdrawal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFeeAmount {
    pub withheld_amount: u64,
}

/// A holder's balance of one mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub address: Address,
    pub owner: PublicKey,
    pub mint: Address,
    /// Spendable balance in smallest units.
    pub amount: u64,
    /// Absent on accounts created without the extension; treated as zero withheld.
    #[serde(default)]
    pub transfer_fee_amount: Option<TransferFeeAmount>,
    /// Optimistic-concurrency version; bumped on every committed change.
    pub version: u64,
}

impl TokenAccount {
    /// A fresh, empty account carrying the transfer-fee extension.
    pub fn new(address: Address, owner: PublicKey, mint: Address) -> Self {
        Self {
            address,
            owner,
            mint,
            amount: 0,
            transfer_fee_amount: Some(TransferFeeAmount::default()),
            version: 0,
        }
    }

    /// Withheld fees at this account (zero when the extension is absent).
    pub fn withheld_amount(&self) -> u64 {
        self.transfer_fee_amount
            .map(|ext| ext.withheld_amount)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_extension_reads_as_zero() {
        let mut account = TokenAccount::new(Address::ZERO, PublicKey([1; 32]), Address::ZERO);
        account.transfer_fee_amount = None;
        assert_eq!(account.withheld_amount(), 0);
    }

    #[test]
    fn new_account_is_empty() {
        let account = TokenAccount::new(Address::ZERO, PublicKey([1; 32]), Address::ZERO);
        assert_eq!(account.amount, 0);
        assert_eq!(account.withheld_amount(), 0);
        assert_eq!(account.version, 0);
    }
}

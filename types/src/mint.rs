//! Mint state and its transfer-fee configuration.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::keys::PublicKey;

/// Upper bound on `fee_basis_points`: 10_000 basis points = 100%.
pub const MAX_FEE_BASIS_POINTS: u16 = 10_000;

/// Transfer-fee policy attached to a mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFeeConfig {
    /// Fee rate in hundredths of a percent (100 = 1%). At most [`MAX_FEE_BASIS_POINTS`].
    pub fee_basis_points: u16,
    /// Cap on the fee charged for a single transfer, in smallest units.
    pub maximum_fee: u64,
    /// Identity allowed to change `fee_basis_points` / `maximum_fee`.
    pub config_authority: PublicKey,
    /// Identity allowed to withdraw withheld fees.
    pub withdraw_authority: PublicKey,
}

/// A fungible token mint with the transfer-fee extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    pub address: Address,
    /// Identity allowed to mint new supply.
    pub mint_authority: PublicKey,
    pub decimals: u8,
    /// Total supply in smallest units.
    pub supply: u64,
    pub transfer_fee_config: TransferFeeConfig,
    /// Mint-level pool of harvested fees awaiting withdrawal.
    pub withheld_amount: u64,
    /// Optimistic-concurrency version; bumped on every committed change.
    pub version: u64,
}

impl Mint {
    pub fn new(
        address: Address,
        mint_authority: PublicKey,
        decimals: u8,
        transfer_fee_config: TransferFeeConfig,
    ) -> Self {
        Self {
            address,
            mint_authority,
            decimals,
            supply: 0,
            transfer_fee_config,
            withheld_amount: 0,
            version: 0,
        }
    }
}

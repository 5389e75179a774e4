use std::sync::Arc;

use levy_ledger::LedgerClient;
use levy_nullables::NullLedger;
use levy_types::{Address, PublicKey, TransferFeeConfig};
use levy_wallet_core::MemoryCredentialStore;

use crate::engine::FeeEngine;
use crate::error::FeeError;
use crate::lifecycle::CreateMint;
use crate::transfer::{TransferRequest, TransferResult};

pub const DECIMALS: u8 = 9;
pub const TOKEN: u64 = 1_000_000_000;

/// A mint on a fresh in-memory ledger, with every authority's key in `keys`.
pub struct Fixture {
    pub ledger: Arc<NullLedger>,
    pub keys: Arc<MemoryCredentialStore>,
    pub engine: FeeEngine<NullLedger, MemoryCredentialStore>,
    pub mint: Address,
    pub mint_key: PublicKey,
    pub mint_authority: PublicKey,
    pub config_authority: PublicKey,
    pub withdraw_authority: PublicKey,
}

impl Fixture {
    pub fn new(fee_basis_points: u16, maximum_fee: u64) -> Self {
        let ledger = Arc::new(NullLedger::new());
        let keys = Arc::new(MemoryCredentialStore::new());
        let engine = FeeEngine::new(Arc::clone(&ledger), Arc::clone(&keys));

        let mint_key = keys.generate();
        let mint_authority = keys.generate();
        let config_authority = keys.generate();
        let withdraw_authority = keys.generate();
        let mint = engine
            .mints()
            .create_mint(&CreateMint {
                mint: mint_key,
                mint_authority,
                decimals: DECIMALS,
                transfer_fee_config: TransferFeeConfig {
                    fee_basis_points,
                    maximum_fee,
                    config_authority,
                    withdraw_authority,
                },
            })
            .unwrap()
            .address;

        Self {
            ledger,
            keys,
            engine,
            mint,
            mint_key,
            mint_authority,
            config_authority,
            withdraw_authority,
        }
    }

    /// 1% capped at 9 tokens.
    pub fn default_fees() -> Self {
        Self::new(100, 9 * TOKEN)
    }

    /// A new owner whose account was minted `amount`.
    pub fn funded_owner(&self, amount: u64) -> (PublicKey, Address) {
        let owner = self.keys.generate();
        let account = if amount == 0 {
            self.ledger.create_account_if_absent(&owner, &self.mint).unwrap().address
        } else {
            self.engine
                .mints()
                .mint_to(&self.mint, &self.mint_authority, &owner, amount)
                .unwrap()
                .destination
        };
        (owner, account)
    }

    /// An empty account owned by the withdraw authority.
    pub fn vault(&self) -> Address {
        self.ledger
            .create_account_if_absent(&self.withdraw_authority, &self.mint)
            .unwrap()
            .address
    }

    /// Another mint on the same ledger, sharing this fixture's authorities.
    pub fn second_mint(&self, fee_basis_points: u16, maximum_fee: u64) -> Address {
        self.engine
            .mints()
            .create_mint(&CreateMint {
                mint: self.keys.generate(),
                mint_authority: self.mint_authority,
                decimals: DECIMALS,
                transfer_fee_config: TransferFeeConfig {
                    fee_basis_points,
                    maximum_fee,
                    config_authority: self.config_authority,
                    withdraw_authority: self.withdraw_authority,
                },
            })
            .unwrap()
            .address
    }

    pub fn request(
        &self,
        owner: &PublicKey,
        source: Address,
        destination_owner: &PublicKey,
        amount: u64,
    ) -> TransferRequest {
        TransferRequest {
            mint: self.mint,
            source,
            destination_owner: *destination_owner,
            owner: *owner,
            amount,
            decimals: DECIMALS,
            expected_fee: None,
        }
    }

    pub fn transfer(
        &self,
        owner: &PublicKey,
        source: Address,
        destination_owner: &PublicKey,
        amount: u64,
    ) -> Result<TransferResult, FeeError> {
        self.engine
            .transfers()
            .transfer(&self.request(owner, source, destination_owner, amount))
    }
}

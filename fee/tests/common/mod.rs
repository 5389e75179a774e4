#![allow(dead_code)]

use std::sync::Arc;

use levy_fee::{CreateMint, FeeEngine, FeeError, TransferRequest, TransferResult};
use levy_ledger::LedgerClient;
use levy_nullables::NullLedger;
use levy_types::{Address, PublicKey, TransferFeeConfig};
use levy_wallet_core::MemoryCredentialStore;

pub const DECIMALS: u8 = 9;
pub const TOKEN: u64 = 1_000_000_000;

pub type Engine = FeeEngine<NullLedger, MemoryCredentialStore>;

/// One mint on an in-memory ledger with all authority keys unlocked.
pub struct Harness {
    pub ledger: Arc<NullLedger>,
    pub keys: Arc<MemoryCredentialStore>,
    pub engine: Arc<Engine>,
    pub mint: Address,
    pub mint_authority: PublicKey,
    pub config_authority: PublicKey,
    pub withdraw_authority: PublicKey,
}

impl Harness {
    pub fn new(fee_basis_points: u16, maximum_fee: u64) -> Self {
        let ledger = Arc::new(NullLedger::new());
        let keys = Arc::new(MemoryCredentialStore::new());
        let engine = Arc::new(FeeEngine::new(Arc::clone(&ledger), Arc::clone(&keys)));

        let mint_authority = keys.generate();
        let config_authority = keys.generate();
        let withdraw_authority = keys.generate();
        let mint = engine
            .mints()
            .create_mint(&CreateMint {
                mint: keys.generate(),
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
            mint_authority,
            config_authority,
            withdraw_authority,
        }
    }

    /// 1%, capped at 9 tokens.
    pub fn standard() -> Self {
        Self::new(100, 9 * TOKEN)
    }

    pub fn funded_owner(&self, amount: u64) -> (PublicKey, Address) {
        let owner = self.keys.generate();
        let account = self
            .engine
            .mints()
            .mint_to(&self.mint, &self.mint_authority, &owner, amount)
            .unwrap()
            .destination;
        (owner, account)
    }

    pub fn vault(&self) -> Address {
        self.ledger
            .create_account_if_absent(&self.withdraw_authority, &self.mint)
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

    /// Sum of withheld fees across the mint's accounts.
    pub fn withheld_in_accounts(&self) -> u128 {
        self.engine.withheld().total_withheld(&self.mint).unwrap().accounts
    }
}

/// Run `op` until it returns anything other than a retryable error.
pub fn retrying<T>(mut op: impl FnMut() -> Result<T, FeeError>) -> Result<T, FeeError> {
    loop {
        match op() {
            Err(e) if e.is_retryable() => continue,
            other => return other,
        }
    }
}

//! Mint creation, minting new supply, and fee-config updates.

use std::sync::Arc;

use levy_crypto::CredentialStore;
use levy_ledger::{LedgerClient, LedgerError, MutationBatch};
use levy_types::{Address, Mint, PublicKey, TransferFeeConfig, TxHash};
use serde::Serialize;

use crate::authorization::{authorize, Operation};
use crate::error::FeeError;
use crate::policy::{validate_basis_points, validate_fee_config};

/// Parameters for a new mint. The mint's address is derived from `mint`,
/// whose key must be held by the credential store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateMint {
    pub mint: PublicKey,
    pub mint_authority: PublicKey,
    pub decimals: u8,
    pub transfer_fee_config: TransferFeeConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MintToResult {
    pub destination: Address,
    pub amount: u64,
    pub tx: TxHash,
}

pub struct MintLifecycle<L, C> {
    ledger: Arc<L>,
    credentials: Arc<C>,
}

impl<L: LedgerClient, C: CredentialStore> MintLifecycle<L, C> {
    pub fn new(ledger: Arc<L>, credentials: Arc<C>) -> Self {
        Self {
            ledger,
            credentials,
        }
    }

    /// Initialize a mint with its fee configuration. One-shot per mint identity.
    pub fn create_mint(&self, params: &CreateMint) -> Result<Mint, FeeError> {
        validate_fee_config(&params.transfer_fee_config)?;
        let address = Address::from(params.mint);

        match self.ledger.get_mint(&address) {
            Ok(_) => return Err(FeeError::AlreadyExists(address)),
            Err(LedgerError::MintNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let operation = Operation::CreateMint {
            mint: address,
            decimals: params.decimals,
            fee_basis_points: params.transfer_fee_config.fee_basis_points,
            maximum_fee: params.transfer_fee_config.maximum_fee,
        };
        if !authorize(&*self.ledger, &*self.credentials, &operation, &params.mint, &params.mint)? {
            return Err(FeeError::UnauthorizedSigner {
                signer: params.mint,
                required: params.mint,
            });
        }

        let mint = Mint::new(
            address,
            params.mint_authority,
            params.decimals,
            params.transfer_fee_config.clone(),
        );
        let tx = self.ledger.initialize_mint(mint.clone())?;
        tracing::info!(
            mint = %address,
            decimals = params.decimals,
            fee_basis_points = params.transfer_fee_config.fee_basis_points,
            maximum_fee = params.transfer_fee_config.maximum_fee,
            tx = %tx,
            "mint created"
        );
        Ok(mint)
    }

    /// Mint `amount` new units to `destination_owner`'s account, creating it if needed.
    pub fn mint_to(
        &self,
        mint: &Address,
        authority: &PublicKey,
        destination_owner: &PublicKey,
        amount: u64,
    ) -> Result<MintToResult, FeeError> {
        let mint = self.ledger.get_mint(mint)?;
        let operation = Operation::MintTo {
            mint: mint.address,
            destination_owner: *destination_owner,
            amount,
        };
        if !authorize(&*self.ledger, &*self.credentials, &operation, authority, &mint.mint_authority)? {
            return Err(FeeError::UnauthorizedSigner {
                signer: *authority,
                required: mint.mint_authority,
            });
        }

        let destination = self
            .ledger
            .create_account_if_absent(destination_owner, &mint.address)?;
        let mut batch = MutationBatch::new();
        batch
            .mint(&mint, i128::from(amount), 0)
            .account(&destination, i128::from(amount), 0);
        let tx = self.ledger.apply_atomic(&batch)?;
        tracing::info!(mint = %mint.address, destination = %destination.address, amount, tx = %tx, "minted");

        Ok(MintToResult {
            destination: destination.address,
            amount,
            tx,
        })
    }

    /// Change the fee rate and cap. Authorities are left as they are.
    pub fn set_transfer_fee(
        &self,
        mint: &Address,
        authority: &PublicKey,
        fee_basis_points: u16,
        maximum_fee: u64,
    ) -> Result<Mint, FeeError> {
        validate_basis_points(fee_basis_points)?;
        let current = self.ledger.get_mint(mint)?;
        let required = current.transfer_fee_config.config_authority;

        let operation = Operation::SetTransferFee {
            mint: current.address,
            fee_basis_points,
            maximum_fee,
        };
        if !authorize(&*self.ledger, &*self.credentials, &operation, authority, &required)? {
            return Err(FeeError::UnauthorizedSigner {
                signer: *authority,
                required,
            });
        }

        let config = TransferFeeConfig {
            fee_basis_points,
            maximum_fee,
            ..current.transfer_fee_config.clone()
        };
        let tx = self
            .ledger
            .update_transfer_fee_config(&current.address, config, current.version)?;
        tracing::info!(mint = %current.address, fee_basis_points, maximum_fee, tx = %tx, "transfer fee updated");

        Ok(self.ledger.get_mint(&current.address)?)
    }
}

//! Checked, fee-aware transfers.
//!
//! The destination is credited `amount - fee` and the fee is withheld at the
//! destination. The source is debited exactly `amount`.

use std::sync::Arc;

use levy_crypto::CredentialStore;
use levy_ledger::{LedgerClient, MutationBatch};
use levy_types::{Address, PublicKey, TxHash};
use serde::Serialize;

use crate::authorization::{authorize, Operation};
use crate::error::FeeError;
use crate::policy::FeePolicy;

/// A transfer as requested by the source owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub mint: Address,
    /// Source token account.
    pub source: Address,
    /// Owner of the destination; its account is created if absent.
    pub destination_owner: PublicKey,
    /// Identity signing for the source account.
    pub owner: PublicKey,
    pub amount: u64,
    /// Must equal the mint's decimals.
    pub decimals: u8,
    /// The fee the caller computed; rejected if it differs from the mint's policy.
    pub expected_fee: Option<u64>,
}

/// Outcome of a committed transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferResult {
    pub amount: u64,
    pub fee: u64,
    pub net_amount: u64,
    pub source: Address,
    pub destination: Address,
    pub tx: TxHash,
}

pub struct TransferOrchestrator<L, C> {
    ledger: Arc<L>,
    credentials: Arc<C>,
}

impl<L: LedgerClient, C: CredentialStore> TransferOrchestrator<L, C> {
    pub fn new(ledger: Arc<L>, credentials: Arc<C>) -> Self {
        Self {
            ledger,
            credentials,
        }
    }

    /// Execute a transfer as one atomic ledger batch.
    ///
    /// Every check runs before anything is written. The only write outside
    /// the batch is the idempotent creation of the destination account,
    /// which never changes a balance.
    pub fn transfer(&self, request: &TransferRequest) -> Result<TransferResult, FeeError> {
        let mint = self.ledger.get_mint(&request.mint)?;
        if request.decimals != mint.decimals {
            return Err(FeeError::DecimalMismatch {
                expected: mint.decimals,
                declared: request.decimals,
            });
        }

        let source = self.ledger.get_account(&request.source)?;
        if source.mint != mint.address {
            return Err(FeeError::MintMismatch {
                account: source.address,
                expected: mint.address,
                found: source.mint,
            });
        }

        let operation = Operation::Transfer {
            mint: mint.address,
            source: source.address,
            destination_owner: request.destination_owner,
            amount: request.amount,
            decimals: request.decimals,
        };
        if !authorize(&*self.ledger, &*self.credentials, &operation, &request.owner, &source.owner)? {
            return Err(FeeError::UnauthorizedSigner {
                signer: request.owner,
                required: source.owner,
            });
        }

        let fee = mint.transfer_fee_config.calculate_fee(request.amount)?;
        if let Some(declared) = request.expected_fee {
            if declared != fee {
                return Err(FeeError::FeeMismatch {
                    computed: fee,
                    declared,
                });
            }
        }

        if source.amount < request.amount {
            return Err(FeeError::InsufficientFunds {
                needed: request.amount,
                available: source.amount,
            });
        }

        let destination = self
            .ledger
            .create_account_if_absent(&request.destination_owner, &mint.address)?;
        let net_amount = request.amount - fee;

        let mut batch = MutationBatch::new();
        batch
            .account(&source, -i128::from(request.amount), 0)
            .account(&destination, i128::from(net_amount), i128::from(fee));
        let tx = self.ledger.apply_atomic(&batch)?;

        tracing::info!(
            mint = %mint.address,
            source = %source.address,
            destination = %destination.address,
            amount = request.amount,
            fee,
            net = net_amount,
            tx = %tx,
            "transfer committed"
        );

        Ok(TransferResult {
            amount: request.amount,
            fee,
            net_amount,
            source: source.address,
            destination: destination.address,
            tx,
        })
    }
}

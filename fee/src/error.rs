//! Fee-engine errors.

use levy_crypto::CredentialError;
use levy_ledger::LedgerError;
use levy_types::{Address, PublicKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeeError {
    #[error("invalid fee policy: {0}")]
    InvalidPolicy(String),

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("decimals mismatch: mint uses {expected}, caller declared {declared}")]
    DecimalMismatch { expected: u8, declared: u8 },

    #[error("fee mismatch: computed {computed}, caller declared {declared}")]
    FeeMismatch { computed: u64, declared: u64 },

    #[error("signer {signer} is not the required authority {required}")]
    UnauthorizedSigner { signer: PublicKey, required: PublicKey },

    #[error("signer {signer} is not the withdraw authority {required}")]
    UnauthorizedWithdraw { signer: PublicKey, required: PublicKey },

    #[error("withdraw batch has no source accounts")]
    EmptyBatch,

    #[error("nothing to withdraw for mint {0}")]
    NothingToWithdraw(Address),

    #[error("already exists: {0}")]
    AlreadyExists(Address),

    #[error("conflicting concurrent update, retry the operation: {0}")]
    Conflict(String),

    #[error("account {account} belongs to mint {found}, not {expected}")]
    MintMismatch {
        account: Address,
        expected: Address,
        found: Address,
    },

    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("ledger error: {0}")]
    Ledger(LedgerError),
}

impl FeeError {
    /// Only `Conflict` may succeed when the caller re-reads and retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Outcomes that report "no work" rather than a failure.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::NothingToWithdraw(_))
    }
}

impl From<LedgerError> for FeeError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Conflict { .. } => Self::Conflict(e.to_string()),
            LedgerError::AlreadyExists(address) => Self::AlreadyExists(address),
            other => Self::Ledger(other),
        }
    }
}

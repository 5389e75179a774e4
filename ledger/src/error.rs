use levy_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("account not found: {0}")]
    AccountNotFound(Address),

    #[error("mint not found: {0}")]
    MintNotFound(Address),

    #[error("already exists: {0}")]
    AlreadyExists(Address),

    #[error("concurrent modification of {target}: expected version {expected}, found {found}")]
    Conflict {
        target: String,
        expected: u64,
        found: u64,
    },

    #[error("invalid mutation: {0}")]
    InvalidMutation(String),

    #[error("ledger backend error: {0}")]
    Backend(String),
}

impl LedgerError {
    /// Whether re-reading state and retrying the whole operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

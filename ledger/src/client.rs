//! The ledger client trait.

use levy_types::{Address, Credential, Mint, PublicKey, TokenAccount, TransferFeeConfig, TxHash};

use crate::error::LedgerError;
use crate::mutation::MutationBatch;

/// Narrow capability surface the fee core consumes.
///
/// Implementations own storage, transport and retry policy. They must make
/// [`apply_atomic`](LedgerClient::apply_atomic) all-or-nothing and linearizable
/// per touched entry.
pub trait LedgerClient: Send + Sync {
    /// Read a token account.
    fn get_account(&self, address: &Address) -> Result<TokenAccount, LedgerError>;

    /// Return the canonical account for `(owner, mint)`, creating it empty if absent.
    ///
    /// Calling this for an existing account returns it unchanged.
    fn create_account_if_absent(
        &self,
        owner: &PublicKey,
        mint: &Address,
    ) -> Result<TokenAccount, LedgerError>;

    /// All accounts whose mint reference equals `mint`.
    fn scan_accounts_by_mint(&self, mint: &Address) -> Result<Vec<TokenAccount>, LedgerError>;

    /// Apply every mutation in `batch` or none of them.
    ///
    /// Fails with [`LedgerError::Conflict`] if any target's version differs
    /// from the mutation's `expected_version`, and with
    /// [`LedgerError::InvalidMutation`] if a delta would leave a field outside `u64`.
    fn apply_atomic(&self, batch: &MutationBatch) -> Result<TxHash, LedgerError>;

    /// Whether `credential` proves authorisation by `owner`.
    fn verify_signer(&self, credential: &Credential, owner: &PublicKey) -> bool {
        levy_crypto::verify_credential(credential, owner)
    }

    /// Read a mint.
    fn get_mint(&self, address: &Address) -> Result<Mint, LedgerError>;

    /// Store a new mint. Fails with [`LedgerError::AlreadyExists`] if the address is taken.
    fn initialize_mint(&self, mint: Mint) -> Result<TxHash, LedgerError>;

    /// Replace a mint's transfer-fee configuration, guarded by its version.
    fn update_transfer_fee_config(
        &self,
        mint: &Address,
        config: TransferFeeConfig,
        expected_version: u64,
    ) -> Result<TxHash, LedgerError>;
}

//! Operation digests and the authorise step shared by every orchestrator.

use levy_crypto::{tagged_hash, CredentialStore};
use levy_ledger::LedgerClient;
use levy_types::{Address, PublicKey};
use serde::Serialize;

use crate::error::FeeError;

const OPERATION_DOMAIN: &[u8] = b"levy/operation/v1";

/// A mutating operation, as signed by the identity that authorises it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Operation {
    CreateMint {
        mint: Address,
        decimals: u8,
        fee_basis_points: u16,
        maximum_fee: u64,
    },
    MintTo {
        mint: Address,
        destination_owner: PublicKey,
        amount: u64,
    },
    Transfer {
        mint: Address,
        source: Address,
        destination_owner: PublicKey,
        amount: u64,
        decimals: u8,
    },
    WithdrawFromAccounts {
        mint: Address,
        vault: Address,
        sources: Vec<Address>,
    },
    WithdrawFromMint {
        mint: Address,
        vault: Address,
    },
    SetTransferFee {
        mint: Address,
        fee_basis_points: u16,
        maximum_fee: u64,
    },
}

impl Operation {
    /// Blake2b-256 over a domain tag and the bincode encoding of the operation.
    pub fn digest(&self) -> Result<[u8; 32], FeeError> {
        let encoded = bincode::serialize(self)?;
        Ok(tagged_hash(OPERATION_DOMAIN, &[encoded.as_slice()]))
    }
}

/// Have `signer` sign `operation` and check the credential against `required`.
///
/// Returns `Ok(false)` when the credential does not prove `required`; the
/// caller decides which error that becomes.
pub(crate) fn authorize<L, C>(
    ledger: &L,
    credentials: &C,
    operation: &Operation,
    signer: &PublicKey,
    required: &PublicKey,
) -> Result<bool, FeeError>
where
    L: LedgerClient + ?Sized,
    C: CredentialStore + ?Sized,
{
    if signer != required || !credentials.contains(signer) {
        tracing::warn!(signer = %signer, required = %required, ?operation, "signer cannot prove authority");
        return Ok(false);
    }
    let digest = operation.digest()?;
    let credential = credentials.sign(signer, digest)?;
    let accepted = credential.digest == digest && ledger.verify_signer(&credential, required);
    if !accepted {
        tracing::warn!(signer = %signer, required = %required, ?operation, "credential rejected");
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_depends_on_every_field() {
        let a = Operation::WithdrawFromMint {
            mint: Address::new([1; 32]),
            vault: Address::new([2; 32]),
        };
        let b = Operation::WithdrawFromMint {
            mint: Address::new([1; 32]),
            vault: Address::new([3; 32]),
        };
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
        assert_eq!(a.digest().unwrap(), a.clone().digest().unwrap());
    }

    #[test]
    fn digest_distinguishes_variants() {
        let transfer = Operation::Transfer {
            mint: Address::ZERO,
            source: Address::ZERO,
            destination_owner: PublicKey([0; 32]),
            amount: 5,
            decimals: 9,
        };
        let mint_to = Operation::MintTo {
            mint: Address::ZERO,
            destination_owner: PublicKey([0; 32]),
            amount: 5,
        };
        assert_ne!(transfer.digest().unwrap(), mint_to.digest().unwrap());
    }
}

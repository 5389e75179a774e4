//! The transfer-fee function.
//!
//! `fee = min(maximum_fee, floor(amount * fee_basis_points / 10_000))`
//!
//! The product is taken in `u128`: a `u64` amount times at most 10_000 basis
//! points needs up to 78 bits.

use levy_types::{TransferFeeConfig, MAX_FEE_BASIS_POINTS};

use crate::error::FeeError;

/// Fee charged on a transfer of `amount` smallest units.
///
/// Fails with [`FeeError::InvalidPolicy`] if `fee_basis_points > 10_000`.
pub fn compute_fee(amount: u64, fee_basis_points: u16, maximum_fee: u64) -> Result<u64, FeeError> {
    validate_basis_points(fee_basis_points)?;
    let raw = u128::from(amount) * u128::from(fee_basis_points) / u128::from(MAX_FEE_BASIS_POINTS);
    let capped = raw.min(u128::from(maximum_fee));
    u64::try_from(capped).map_err(|_| FeeError::InvalidPolicy(format!("fee {capped} exceeds u64")))
}

pub fn validate_basis_points(fee_basis_points: u16) -> Result<(), FeeError> {
    if fee_basis_points > MAX_FEE_BASIS_POINTS {
        return Err(FeeError::InvalidPolicy(format!(
            "fee_basis_points {fee_basis_points} exceeds {MAX_FEE_BASIS_POINTS}"
        )));
    }
    Ok(())
}

/// Check the invariants a fee configuration must satisfy at creation or update.
pub fn validate_fee_config(config: &TransferFeeConfig) -> Result<(), FeeError> {
    validate_basis_points(config.fee_basis_points)
}

/// Fee calculation bound to a stored configuration.
pub trait FeePolicy {
    fn calculate_fee(&self, amount: u64) -> Result<u64, FeeError>;

    /// What the destination receives after the fee is withheld.
    fn net_amount(&self, amount: u64) -> Result<u64, FeeError> {
        Ok(amount - self.calculate_fee(amount)?)
    }
}

impl FeePolicy for TransferFeeConfig {
    fn calculate_fee(&self, amount: u64) -> Result<u64, FeeError> {
        compute_fee(amount, self.fee_basis_points, self.maximum_fee)
    }
}

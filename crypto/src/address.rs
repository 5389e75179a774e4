//! Deterministic token-account addresses.
//!
//! Every `(owner, mint)` pair maps to exactly one token account address:
//! `Blake2b-256("levy/token-account" || owner || mint)`. Creating the account
//! twice therefore always lands on the same identity.

use levy_types::{Address, PublicKey};

use crate::hash::tagged_hash;

const TOKEN_ACCOUNT_DOMAIN: &[u8] = b"levy/token-account";

/// Derive the canonical token-account address for `owner` holding `mint`.
pub fn derive_token_account_address(owner: &PublicKey, mint: &Address) -> Address {
    Address::new(tagged_hash(
        TOKEN_ACCOUNT_DOMAIN,
        &[owner.as_bytes(), mint.as_bytes()],
    ))
}

//! Blake2b-256 hashing.
//!
//! Hashes that identify something on the ledger carry a domain tag so an
//! operation digest can never collide with an account address or a batch
//! receipt built from the same bytes.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use levy_types::TxHash;

type Blake2b256 = Blake2b<U32>;

const BATCH_RECEIPT_DOMAIN: &[u8] = b"levy/batch-receipt/v1";

fn finish(hasher: Blake2b256) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Untagged Blake2b-256, used for snapshot integrity.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    finish(hasher)
}

/// `Blake2b-256(tag || parts[0] || parts[1] || ...)`.
pub fn tagged_hash(tag: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(tag);
    for part in parts {
        hasher.update(part);
    }
    finish(hasher)
}

/// Receipt for the `sequence`-th committed batch with the given encoding.
///
/// Two identical batches committed one after the other get distinct receipts.
pub fn batch_receipt(sequence: u64, encoded_batch: &[u8]) -> TxHash {
    TxHash::new(tagged_hash(
        BATCH_RECEIPT_DOMAIN,
        &[&sequence.to_le_bytes(), encoded_batch],
    ))
}

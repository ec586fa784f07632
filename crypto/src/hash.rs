//! Blake2b-256 digests.
//!
//! Everything content-addressed in the node runs through the same 256-bit
//! Blake2b instance: transaction ids, address digests, and the colors minted
//! from output ids.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use weft_types::TransactionId;

type Blake2b256 = Blake2b<U32>;

/// The 256-bit Blake2b digest of `data`.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    Blake2b256::digest(data).into()
}

/// Digest a sequence of slices as if they were concatenated, without
/// building the concatenation.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Derive a transaction's id from its canonical serialization.
pub fn hash_transaction(tx_bytes: &[u8]) -> TransactionId {
    TransactionId::new(blake2b_256(tx_bytes))
}

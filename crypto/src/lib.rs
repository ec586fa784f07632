//! Cryptographic primitives for the weft node.
//!
//! Blake2b-256 content addressing, Ed25519 signing (the default scheme for
//! value transfers) and BLS12-381 signing (used by addresses backed by a
//! distributed key).

pub mod bls;
pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi, hash_transaction};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};

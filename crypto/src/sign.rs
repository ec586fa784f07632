//! Ed25519 signing.
//!
//! Signatures in the ledger always cover the canonical serialization of a
//! transaction essence. Verification is total: malformed keys or signatures
//! fail to verify instead of surfacing an error.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use weft_types::{PrivateKey, PublicKey, Signature};

/// Sign `message` with the private key.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    Signature(SigningKey::from_bytes(&private_key.0).sign(message).to_bytes())
}

/// Check `signature` over `message` under `public_key`.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
    VerifyingKey::from_bytes(&public_key.0)
        .map(|key| key.verify(message, &signature).is_ok())
        .unwrap_or(false)
}

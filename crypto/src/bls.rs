//! BLS12-381 signing and verification (min_pk variant: 48-byte public keys,
//! 96-byte signatures) over the `blst` backend.

use blst::min_pk::{PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use std::fmt;

/// Domain separation tag for the standard hash-to-curve ciphersuite.
const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// A compressed 48-byte BLS public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlsPublicKey(pub [u8; 48]);

impl BlsPublicKey {
    pub fn as_bytes(&self) -> &[u8; 48] {
        &self.0
    }
}

impl fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsPublicKey(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// A compressed 96-byte BLS signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlsSignature(pub [u8; 96]);

impl BlsSignature {
    pub fn as_bytes(&self) -> &[u8; 96] {
        &self.0
    }
}

impl fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsSignature(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// A BLS private key. The wrapped scalar is zeroized on drop by `blst`.
pub struct BlsPrivateKey(SecretKey);

/// A BLS key pair (public + private).
pub struct BlsKeyPair {
    pub public: BlsPublicKey,
    pub private: BlsPrivateKey,
}

/// A signature bundled with the public key that produced it, the form BLS
/// signatures travel in on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureWithPublicKey {
    pub public_key: BlsPublicKey,
    pub signature: BlsSignature,
}

impl SignatureWithPublicKey {
    /// Sign `message` and bundle the signature with the signer's public key.
    pub fn sign(message: &[u8], keypair: &BlsKeyPair) -> Self {
        Self {
            public_key: keypair.public,
            signature: bls_sign(message, &keypair.private),
        }
    }

    /// Whether the contained signature signs `message` under the contained key.
    pub fn is_valid(&self, message: &[u8]) -> bool {
        bls_verify(message, &self.signature, &self.public_key)
    }
}

/// Derive a BLS key pair deterministically from a 32-byte seed.
pub fn bls_keypair_from_seed(seed: &[u8; 32]) -> BlsKeyPair {
    // key_gen only fails when the input key material is shorter than 32 bytes.
    let sk = SecretKey::key_gen(seed, &[]).expect("seed is 32 bytes");
    BlsKeyPair {
        public: BlsPublicKey(sk.sk_to_pk().to_bytes()),
        private: BlsPrivateKey(sk),
    }
}

/// Sign a message with a BLS private key.
pub fn bls_sign(message: &[u8], private: &BlsPrivateKey) -> BlsSignature {
    BlsSignature(private.0.sign(message, BLS_DST, &[]).to_bytes())
}

/// Verify a BLS signature against a message and public key.
///
/// Malformed keys or signatures verify as `false` rather than erroring.
pub fn bls_verify(message: &[u8], signature: &BlsSignature, public: &BlsPublicKey) -> bool {
    let Ok(pk) = PublicKey::from_bytes(&public.0) else {
        return false;
    };
    let Ok(sig) = Signature::from_bytes(&signature.0) else {
        return false;
    };
    sig.verify(true, message, BLS_DST, &[], &pk, true) == BLST_ERROR::BLST_SUCCESS
}

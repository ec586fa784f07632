//! Ledger signatures.
//!
//! A signature proves control of an address. `address_signature_valid` binds
//! the two: the address must be of the matching kind, its digest must equal
//! the hash of the embedded public key, and the signature itself must verify
//! over the signed data.

use crate::address::{Address, AddressKind};
use serde::{Deserialize, Serialize};
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};
use weft_crypto::bls::{BlsSignature as RawBlsSignature, BlsPublicKey, SignatureWithPublicKey};
use weft_crypto::{blake2b_256, sign_message, verify_signature};
use weft_types::{KeyPair, PublicKey};

/// The kind of a signature; doubles as its serialization tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SignatureKind {
    Ed25519 = 0,
    Bls = 1,
}

/// A signature created with the ED25519 scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519Signature {
    pub public_key: PublicKey,
    pub signature: weft_types::Signature,
}

impl Ed25519Signature {
    pub fn new(public_key: PublicKey, signature: weft_types::Signature) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    /// Sign `data` with the key pair and bundle the public key.
    pub fn sign(data: &[u8], keypair: &KeyPair) -> Self {
        Self {
            public_key: keypair.public,
            signature: sign_message(data, &keypair.private),
        }
    }

    pub fn is_valid(&self, data: &[u8]) -> bool {
        verify_signature(data, &self.signature, &self.public_key)
    }

    pub fn address_signature_valid(&self, address: &Address, data: &[u8]) -> bool {
        if address.kind() != AddressKind::Ed25519 {
            return false;
        }
        if &blake2b_256(self.public_key.as_bytes()) != address.digest() {
            return false;
        }
        self.is_valid(data)
    }
}

/// A signature created with the BLS scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlsSignature {
    pub signature: SignatureWithPublicKey,
}

impl BlsSignature {
    pub fn new(signature: SignatureWithPublicKey) -> Self {
        Self { signature }
    }

    pub fn is_valid(&self, data: &[u8]) -> bool {
        self.signature.is_valid(data)
    }

    pub fn address_signature_valid(&self, address: &Address, data: &[u8]) -> bool {
        if address.kind() != AddressKind::Bls {
            return false;
        }
        if &blake2b_256(self.signature.public_key.as_bytes()) != address.digest() {
            return false;
        }
        self.is_valid(data)
    }
}

/// Any of the supported signature kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signature {
    Ed25519(Ed25519Signature),
    Bls(BlsSignature),
}

impl Signature {
    pub fn kind(&self) -> SignatureKind {
        match self {
            Self::Ed25519(_) => SignatureKind::Ed25519,
            Self::Bls(_) => SignatureKind::Bls,
        }
    }

    /// Whether the signature signs the given data.
    pub fn is_valid(&self, data: &[u8]) -> bool {
        match self {
            Self::Ed25519(signature) => signature.is_valid(data),
            Self::Bls(signature) => signature.is_valid(data),
        }
    }

    /// Whether the signature signs the given data *and* belongs to the given
    /// address.
    pub fn address_signature_valid(&self, address: &Address, data: &[u8]) -> bool {
        match self {
            Self::Ed25519(signature) => signature.address_signature_valid(address, data),
            Self::Bls(signature) => signature.address_signature_valid(address, data),
        }
    }
}

impl Encode for Signature {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(self.kind() as u8);
        match self {
            Self::Ed25519(signature) => {
                w.write_bytes(signature.public_key.as_bytes());
                w.write_bytes(signature.signature.as_bytes());
            }
            Self::Bls(signature) => {
                w.write_bytes(signature.signature.public_key.as_bytes());
                w.write_bytes(signature.signature.signature.as_bytes());
            }
        }
    }
}

impl Decode for Signature {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let tag = r.read_u8()?;
        match tag {
            0 => {
                let public_key = PublicKey(r.read_array()?);
                let signature = weft_types::Signature(r.read_array()?);
                Ok(Self::Ed25519(Ed25519Signature::new(public_key, signature)))
            }
            1 => {
                let public_key = BlsPublicKey(r.read_array()?);
                let signature = RawBlsSignature(r.read_array()?);
                Ok(Self::Bls(BlsSignature::new(SignatureWithPublicKey {
                    public_key,
                    signature,
                })))
            }
            tag => Err(CodecError::UnknownTag {
                kind: "signature",
                tag,
            }),
        }
    }
}

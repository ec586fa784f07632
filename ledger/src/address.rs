//! Ledger addresses.
//!
//! Three kinds, all carrying a 32-byte Blake2b digest behind a 1-byte type
//! tag: ED25519 and BLS addresses digest a public key, alias addresses digest
//! the id of the output that minted the alias.

use serde::{Deserialize, Serialize};
use std::fmt;
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};
use weft_crypto::bls::BlsPublicKey;
use weft_crypto::blake2b_256;
use weft_types::PublicKey;

/// The length of a serialized address: 1 tag byte plus the 32-byte digest.
pub const ADDRESS_LENGTH: usize = 33;

/// The kind of an address; doubles as its serialization tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AddressKind {
    Ed25519 = 0,
    Bls = 1,
    Alias = 2,
}

/// An address secured by the ED25519 signature scheme.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519Address {
    digest: [u8; 32],
}

impl Ed25519Address {
    pub fn new(public_key: &PublicKey) -> Self {
        Self {
            digest: blake2b_256(public_key.as_bytes()),
        }
    }

    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self { digest }
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }
}

/// An address secured by the BLS signature scheme.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlsAddress {
    digest: [u8; 32],
}

impl BlsAddress {
    pub fn new(public_key: &BlsPublicKey) -> Self {
        Self {
            digest: blake2b_256(public_key.as_bytes()),
        }
    }

    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self { digest }
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }
}

/// An address not backed by a key directly: it digests the id of the output
/// that minted the alias, and the controlling keys live in the alias output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AliasAddress {
    digest: [u8; 32],
}

impl AliasAddress {
    /// The unassigned alias address; a freshly minted alias carries this
    /// until its output id is known.
    pub const NIL: Self = Self { digest: [0u8; 32] };

    /// Derive the address from seed bytes, normally a minting output id.
    pub fn from_seed(data: &[u8]) -> Self {
        Self {
            digest: blake2b_256(data),
        }
    }

    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self { digest }
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Whether the address is still the unassigned zero value.
    pub fn is_nil(&self) -> bool {
        self.digest == [0u8; 32]
    }
}

fn fmt_digest(f: &mut fmt::Formatter<'_>, name: &str, digest: &[u8; 32]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for b in &digest[..4] {
        write!(f, "{:02x}", b)?;
    }
    write!(f, ")")
}

impl fmt::Debug for Ed25519Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_digest(f, "Ed25519Address", &self.digest)
    }
}

impl fmt::Debug for BlsAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_digest(f, "BlsAddress", &self.digest)
    }
}

impl fmt::Debug for AliasAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_digest(f, "AliasAddress", &self.digest)
    }
}

/// Any of the supported address kinds.
///
/// Equality is tag plus digest, bytewise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Address {
    Ed25519(Ed25519Address),
    Bls(BlsAddress),
    Alias(AliasAddress),
}

impl Address {
    pub fn kind(&self) -> AddressKind {
        match self {
            Self::Ed25519(_) => AddressKind::Ed25519,
            Self::Bls(_) => AddressKind::Bls,
            Self::Alias(_) => AddressKind::Alias,
        }
    }

    pub fn digest(&self) -> &[u8; 32] {
        match self {
            Self::Ed25519(address) => address.digest(),
            Self::Bls(address) => address.digest(),
            Self::Alias(address) => address.digest(),
        }
    }

    /// The serialized form as a fixed 33-byte array (tag ‖ digest).
    pub fn to_array(&self) -> [u8; ADDRESS_LENGTH] {
        let mut array = [0u8; ADDRESS_LENGTH];
        array[0] = self.kind() as u8;
        array[1..].copy_from_slice(self.digest());
        array
    }
}

impl Encode for Address {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(self.kind() as u8);
        w.write_bytes(self.digest());
    }
}

impl Decode for Address {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let tag = r.read_u8()?;
        let digest: [u8; 32] = r.read_array()?;
        match tag {
            0 => Ok(Self::Ed25519(Ed25519Address::from_digest(digest))),
            1 => Ok(Self::Bls(BlsAddress::from_digest(digest))),
            2 => Ok(Self::Alias(AliasAddress::from_digest(digest))),
            tag => Err(CodecError::UnknownTag {
                kind: "address",
                tag,
            }),
        }
    }
}

impl Encode for AliasAddress {
    fn encode(&self, w: &mut Writer) {
        Address::Alias(*self).encode(w);
    }
}

impl Decode for AliasAddress {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        match Address::decode(r)? {
            Address::Alias(address) => Ok(address),
            _ => Err(CodecError::InvalidValue {
                field: "alias address",
                reason: "address tag is not the alias kind",
            }),
        }
    }
}

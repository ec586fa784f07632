//! Unlock blocks.
//!
//! Each input of a transaction is matched by an unlock block at the same
//! index. A signature block carries the actual proof; a reference block
//! points at an earlier signature block (so one signature can unlock many
//! inputs of the same address); an alias block unlocks an input through an
//! alias output spent in the same transaction.

use crate::address::Address;
use crate::signature::Signature;
use std::fmt;
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};

/// The kind of an unlock block; doubles as its serialization tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UnlockBlockKind {
    Signature = 0,
    Reference = 1,
    Alias = 2,
}

/// An unlock block containing a signature for an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureUnlockBlock {
    signature: Signature,
}

impl SignatureUnlockBlock {
    pub fn new(signature: Signature) -> Self {
        Self { signature }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Whether the contained signature signs `signed_data` and belongs to
    /// `address`.
    pub fn address_signature_valid(&self, address: &Address, signed_data: &[u8]) -> bool {
        self.signature.address_signature_valid(address, signed_data)
    }
}

/// An unlock block referencing an earlier signature unlock block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceUnlockBlock {
    referenced_index: u16,
}

impl ReferenceUnlockBlock {
    pub fn new(referenced_index: u16) -> Self {
        Self { referenced_index }
    }

    pub fn referenced_index(&self) -> u16 {
        self.referenced_index
    }
}

/// An unlock block referencing the input index of an alias output whose
/// state transition unlocks the current input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AliasUnlockBlock {
    referenced_index: u16,
}

impl AliasUnlockBlock {
    pub fn new(alias_input_index: u16) -> Self {
        Self {
            referenced_index: alias_input_index,
        }
    }

    /// The index of the input holding the alias output.
    pub fn alias_input_index(&self) -> u16 {
        self.referenced_index
    }
}

/// Any of the supported unlock block kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlockBlock {
    Signature(SignatureUnlockBlock),
    Reference(ReferenceUnlockBlock),
    Alias(AliasUnlockBlock),
}

impl UnlockBlock {
    pub fn kind(&self) -> UnlockBlockKind {
        match self {
            Self::Signature(_) => UnlockBlockKind::Signature,
            Self::Reference(_) => UnlockBlockKind::Reference,
            Self::Alias(_) => UnlockBlockKind::Alias,
        }
    }
}

impl Encode for UnlockBlock {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(self.kind() as u8);
        match self {
            Self::Signature(block) => block.signature.encode(w),
            Self::Reference(block) => w.write_u16(block.referenced_index),
            Self::Alias(block) => w.write_u16(block.referenced_index),
        }
    }
}

impl Decode for UnlockBlock {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let tag = r.read_u8()?;
        match tag {
            0 => Ok(Self::Signature(SignatureUnlockBlock::new(
                Signature::decode(r)?,
            ))),
            1 => Ok(Self::Reference(ReferenceUnlockBlock::new(r.read_u16()?))),
            2 => Ok(Self::Alias(AliasUnlockBlock::new(r.read_u16()?))),
            tag => Err(CodecError::UnknownTag {
                kind: "unlock block",
                tag,
            }),
        }
    }
}

/// The unlock blocks of a transaction, one per input, in input order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UnlockBlocks(Vec<UnlockBlock>);

impl UnlockBlocks {
    pub fn new(blocks: Vec<UnlockBlock>) -> Self {
        Self(blocks)
    }

    pub fn get(&self, index: usize) -> Option<&UnlockBlock> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnlockBlock> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[UnlockBlock] {
        &self.0
    }
}

impl fmt::Debug for UnlockBlocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl Encode for UnlockBlocks {
    fn encode(&self, w: &mut Writer) {
        w.write_u16(self.0.len() as u16);
        for block in &self.0 {
            block.encode(w);
        }
    }
}

impl Decode for UnlockBlocks {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let count = r.read_u16()?;
        let mut blocks = Vec::with_capacity(count as usize);
        for _ in 0..count {
            blocks.push(UnlockBlock::decode(r)?);
        }
        Ok(Self(blocks))
    }
}

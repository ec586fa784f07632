//! Output identifiers.

use crate::error::LedgerError;
use crate::output::MAX_OUTPUT_COUNT;
use std::fmt;
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};
use weft_types::TransactionId;

/// The length of an output id: transaction id plus a 16-bit output index.
pub const OUTPUT_ID_LENGTH: usize = 34;

/// Identifies an output by the transaction that created it and the output's
/// index within that transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId([u8; OUTPUT_ID_LENGTH]);

impl OutputId {
    /// The unset output id. Outputs carry this until their transaction id is
    /// known.
    pub const EMPTY: Self = Self([0u8; OUTPUT_ID_LENGTH]);

    pub fn new(transaction_id: TransactionId, output_index: u16) -> Result<Self, LedgerError> {
        if output_index >= MAX_OUTPUT_COUNT as u16 {
            return Err(LedgerError::OutputIndexOutOfRange(output_index));
        }
        let mut bytes = [0u8; OUTPUT_ID_LENGTH];
        bytes[..32].copy_from_slice(transaction_id.as_bytes());
        bytes[32..].copy_from_slice(&output_index.to_le_bytes());
        Ok(Self(bytes))
    }

    pub fn transaction_id(&self) -> TransactionId {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&self.0[..32]);
        TransactionId::new(bytes)
    }

    pub fn output_index(&self) -> u16 {
        u16::from_le_bytes([self.0[32], self.0[33]])
    }

    pub fn as_bytes(&self) -> &[u8; OUTPUT_ID_LENGTH] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; OUTPUT_ID_LENGTH]
    }
}

impl fmt::Debug for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputId({:?}:{})", self.transaction_id(), self.output_index())
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.transaction_id(), self.output_index())
    }
}

impl Encode for OutputId {
    fn encode(&self, w: &mut Writer) {
        w.write_bytes(&self.0);
    }
}

impl Decode for OutputId {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self(r.read_array()?))
    }
}

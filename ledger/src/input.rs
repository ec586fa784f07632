//! Transaction inputs.

use crate::error::LedgerError;
use crate::output_id::OutputId;
use std::collections::HashSet;
use std::fmt;
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};

/// The minimum amount of inputs in a transaction.
pub const MIN_INPUT_COUNT: usize = 1;

/// The maximum amount of inputs in a transaction.
pub const MAX_INPUT_COUNT: usize = 127;

/// The kind of an input; doubles as its serialization tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InputKind {
    Utxo = 0,
}

/// A reference to an unspent output.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtxoInput {
    referenced_output_id: OutputId,
}

impl UtxoInput {
    pub fn new(referenced_output_id: OutputId) -> Self {
        Self {
            referenced_output_id,
        }
    }

    pub fn referenced_output_id(&self) -> OutputId {
        self.referenced_output_id
    }
}

impl fmt::Debug for UtxoInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UtxoInput({:?})", self.referenced_output_id)
    }
}

/// Any of the supported input kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    Utxo(UtxoInput),
}

impl Input {
    pub fn kind(&self) -> InputKind {
        match self {
            Self::Utxo(_) => InputKind::Utxo,
        }
    }

    /// The output id this input spends.
    pub fn referenced_output_id(&self) -> OutputId {
        match self {
            Self::Utxo(input) => input.referenced_output_id(),
        }
    }
}

impl Encode for Input {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(self.kind() as u8);
        match self {
            Self::Utxo(input) => input.referenced_output_id.encode(w),
        }
    }
}

impl Decode for Input {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let tag = r.read_u8()?;
        match tag {
            0 => Ok(Self::Utxo(UtxoInput::new(OutputId::decode(r)?))),
            tag => Err(CodecError::UnknownTag { kind: "input", tag }),
        }
    }
}

/// A canonical collection of inputs: duplicates removed by serialized form,
/// remaining inputs sorted ascending by those bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inputs(Vec<Input>);

impl Inputs {
    pub fn new(inputs: Vec<Input>) -> Result<Self, LedgerError> {
        let mut seen = HashSet::new();
        let mut keyed: Vec<(Vec<u8>, Input)> = Vec::with_capacity(inputs.len());
        for input in inputs {
            let bytes = input.to_bytes();
            if seen.insert(bytes.clone()) {
                keyed.push((bytes, input));
            }
        }
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

        let count = keyed.len();
        if !(MIN_INPUT_COUNT..=MAX_INPUT_COUNT).contains(&count) {
            return Err(LedgerError::InputCountOutOfRange(count));
        }
        Ok(Self(keyed.into_iter().map(|(_, input)| input).collect()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Input> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Input] {
        &self.0
    }
}

impl Encode for Inputs {
    fn encode(&self, w: &mut Writer) {
        w.write_u16(self.0.len() as u16);
        for input in &self.0 {
            input.encode(w);
        }
    }
}

impl Decode for Inputs {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let count = r.read_u16()? as usize;
        if !(MIN_INPUT_COUNT..=MAX_INPUT_COUNT).contains(&count) {
            return Err(CodecError::InvalidValue {
                field: "inputs",
                reason: "input count out of range",
            });
        }
        let mut inputs = Vec::with_capacity(count);
        for _ in 0..count {
            inputs.push(Input::decode(r)?);
        }
        Ok(Self(inputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_types::TransactionId;

    fn input(tx_byte: u8, index: u16) -> Input {
        let id = OutputId::new(TransactionId::new([tx_byte; 32]), index).unwrap();
        Input::Utxo(UtxoInput::new(id))
    }

    #[test]
    fn duplicates_are_removed() {
        let inputs = Inputs::new(vec![input(1, 0), input(1, 0), input(2, 0)]).unwrap();
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn sorted_by_serialized_bytes() {
        let inputs = Inputs::new(vec![input(9, 0), input(1, 0), input(5, 0)]).unwrap();
        let firsts: Vec<u8> = inputs
            .iter()
            .map(|i| i.referenced_output_id().as_bytes()[0])
            .collect();
        assert_eq!(firsts, vec![1, 5, 9]);
    }

    #[test]
    fn permutations_are_canonicalized() {
        let a = Inputs::new(vec![input(1, 0), input(2, 0), input(3, 0)]).unwrap();
        let b = Inputs::new(vec![input(3, 0), input(1, 0), input(2, 0)]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn empty_collection_is_rejected() {
        assert!(matches!(
            Inputs::new(vec![]),
            Err(LedgerError::InputCountOutOfRange(0))
        ));
    }

    #[test]
    fn roundtrip() {
        let inputs = Inputs::new(vec![input(3, 1), input(2, 0)]).unwrap();
        let decoded = Inputs::from_bytes(&inputs.to_bytes()).unwrap();
        assert_eq!(decoded, inputs);
    }

    #[test]
    fn decode_rejects_zero_count() {
        let bytes = vec![0u8, 0u8];
        assert!(Inputs::from_bytes(&bytes).is_err());
    }
}

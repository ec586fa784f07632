//! Transaction assembly.
//!
//! A transaction is an essence (the transfer itself) plus one unlock block
//! per input. Its identifier is the Blake2b-256 hash of the canonical
//! serialization, computed lazily because outputs are routinely assembled
//! and inspected before the transaction is final.

use crate::error::LedgerError;
use crate::input::Inputs;
use crate::output::{Output, Outputs};
use crate::output_id::OutputId;
use crate::unlock::UnlockBlocks;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};
use weft_crypto::hash_transaction;
use weft_types::{NodeId, Timestamp, TransactionId};

/// The transfer-related information of a transaction, without the unlocking
/// details. Signatures sign exactly these bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionEssence {
    version: u8,
    timestamp: Timestamp,
    /// Node the transaction pledges its access mana to.
    access_pledge_id: NodeId,
    /// Node the transaction pledges its consensus mana to.
    consensus_pledge_id: NodeId,
    inputs: Inputs,
    outputs: Outputs,
    /// Optional opaque data payload.
    payload: Option<Vec<u8>>,
}

impl TransactionEssence {
    pub fn new(
        version: u8,
        timestamp: Timestamp,
        access_pledge_id: NodeId,
        consensus_pledge_id: NodeId,
        inputs: Inputs,
        outputs: Outputs,
    ) -> Self {
        Self {
            version,
            timestamp,
            access_pledge_id,
            consensus_pledge_id,
            inputs,
            outputs,
            payload: None,
        }
    }

    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = Some(payload);
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn access_pledge_id(&self) -> NodeId {
        self.access_pledge_id
    }

    pub fn consensus_pledge_id(&self) -> NodeId {
        self.consensus_pledge_id
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }
}

impl Encode for TransactionEssence {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(self.version);
        w.write_time(self.timestamp);
        w.write_bytes(self.access_pledge_id.as_bytes());
        w.write_bytes(self.consensus_pledge_id.as_bytes());
        self.inputs.encode(w);
        self.outputs.encode(w);
        match &self.payload {
            Some(payload) => {
                w.write_u32(payload.len() as u32);
                w.write_bytes(payload);
            }
            None => w.write_u32(0),
        }
    }
}

impl Decode for TransactionEssence {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let version = r.read_u8()?;
        let timestamp = r.read_time()?;
        let access_pledge_id = NodeId::new(r.read_array()?);
        let consensus_pledge_id = NodeId::new(r.read_array()?);
        let inputs = Inputs::decode(r)?;
        let outputs = Outputs::decode(r)?;
        let payload_len = r.read_u32()? as usize;
        let payload = if payload_len == 0 {
            None
        } else {
            Some(r.read_bytes(payload_len)?)
        };
        Ok(Self {
            version,
            timestamp,
            access_pledge_id,
            consensus_pledge_id,
            inputs,
            outputs,
            payload,
        })
    }
}

/// A value transfer: essence plus unlock blocks, content-addressed by the
/// hash of its canonical serialization.
pub struct Transaction {
    essence: TransactionEssence,
    unlock_blocks: UnlockBlocks,
    // computed on first use, under its own lock
    id: RwLock<Option<TransactionId>>,
}

impl Transaction {
    pub fn new(essence: TransactionEssence, unlock_blocks: UnlockBlocks) -> Self {
        Self {
            essence,
            unlock_blocks,
            id: RwLock::new(None),
        }
    }

    /// The transaction id.
    ///
    /// Hashing the serialization is expensive, so the id is computed lazily
    /// with double-checked locking: readers hit the cached value, the first
    /// writer serializes and publishes, later writers re-check under the
    /// write lock.
    pub fn id(&self) -> TransactionId {
        if let Some(id) = *self.id.read().unwrap_or_else(PoisonError::into_inner) {
            return id;
        }

        let mut slot = self.id.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = *slot {
            return id;
        }
        let id = hash_transaction(&self.to_bytes());
        *slot = Some(id);
        id
    }

    pub fn essence(&self) -> &TransactionEssence {
        &self.essence
    }

    pub fn unlock_blocks(&self) -> &UnlockBlocks {
        &self.unlock_blocks
    }

    /// Assign every output its id and resolve mint placeholders.
    ///
    /// The transaction id feeds back into the outputs: mint colors are
    /// re-keyed to the hash of each output's id, and a freshly minted alias
    /// gets its alias address derived the same way. Returns the outputs as
    /// they will be booked into the ledger state.
    pub fn booked_outputs(&self) -> Result<Vec<Output>, LedgerError> {
        let tx_id = self.id();
        let mut booked = Vec::with_capacity(self.essence.outputs().len());
        for (index, output) in self.essence.outputs().iter().enumerate() {
            output.set_id(OutputId::new(tx_id, index as u16)?);
            booked.push(output.update_minting_color());
        }
        Ok(booked)
    }
}

impl Clone for Transaction {
    fn clone(&self) -> Self {
        Self {
            essence: self.essence.clone(),
            unlock_blocks: self.unlock_blocks.clone(),
            id: RwLock::new(*self.id.read().unwrap_or_else(PoisonError::into_inner)),
        }
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.essence == other.essence && self.unlock_blocks == other.unlock_blocks
    }
}

impl Eq for Transaction {}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("essence", &self.essence)
            .field("unlock_blocks", &self.unlock_blocks)
            .finish()
    }
}

impl Encode for Transaction {
    fn encode(&self, w: &mut Writer) {
        self.essence.encode(w);
        self.unlock_blocks.encode(w);
    }
}

impl Decode for Transaction {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let essence = TransactionEssence::decode(r)?;
        let unlock_blocks = UnlockBlocks::decode(r)?;
        Ok(Self::new(essence, unlock_blocks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{Address, Ed25519Address};
    use crate::input::{Input, UtxoInput};
    use crate::output::SigLockedSingleOutput;
    use crate::signature::{Ed25519Signature, Signature};
    use crate::unlock::{SignatureUnlockBlock, UnlockBlock};
    use weft_crypto::keypair_from_seed;

    fn essence(seed: u8) -> TransactionEssence {
        let kp = keypair_from_seed(&[seed; 32]);
        let address = Address::Ed25519(Ed25519Address::new(&kp.public));
        let input_id = OutputId::new(TransactionId::new([seed; 32]), 0).unwrap();
        TransactionEssence::new(
            0,
            Timestamp::from_unix_secs(1_600_000_000),
            NodeId::new([1; 32]),
            NodeId::new([2; 32]),
            Inputs::new(vec![Input::Utxo(UtxoInput::new(input_id))]).unwrap(),
            Outputs::new(vec![Output::SigLockedSingle(
                SigLockedSingleOutput::new(1000, address).unwrap(),
            )])
            .unwrap(),
        )
    }

    fn transaction(seed: u8) -> Transaction {
        let kp = keypair_from_seed(&[seed; 32]);
        let essence = essence(seed);
        let signature = Signature::Ed25519(Ed25519Signature::sign(&essence.to_bytes(), &kp));
        Transaction::new(
            essence,
            UnlockBlocks::new(vec![UnlockBlock::Signature(SignatureUnlockBlock::new(
                signature,
            ))]),
        )
    }

    #[test]
    fn id_is_stable_and_cached() {
        let tx = transaction(1);
        let first = tx.id();
        let second = tx.id();
        assert_eq!(first, second);
        assert!(!first.is_zero());
    }

    #[test]
    fn id_is_hash_of_canonical_bytes() {
        let tx = transaction(1);
        assert_eq!(tx.id(), hash_transaction(&tx.to_bytes()));
    }

    #[test]
    fn different_transactions_have_different_ids() {
        assert_ne!(transaction(1).id(), transaction(2).id());
    }

    #[test]
    fn essence_wire_layout_starts_with_version_and_timestamp() {
        let essence = essence(1);
        let bytes = essence.to_bytes();
        assert_eq!(bytes[0], 0); // version
        let nanos = i64::from_le_bytes(bytes[1..9].try_into().unwrap());
        assert_eq!(nanos, 1_600_000_000 * 1_000_000_000);
        assert_eq!(&bytes[9..41], &[1u8; 32]); // access pledge
        assert_eq!(&bytes[41..73], &[2u8; 32]); // consensus pledge
    }

    #[test]
    fn absent_payload_encodes_as_zero_length() {
        let essence = essence(1);
        let bytes = essence.to_bytes();
        assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn payload_roundtrip() {
        let mut essence = essence(1);
        essence.set_payload(b"chat message".to_vec());
        let decoded = TransactionEssence::from_bytes(&essence.to_bytes()).unwrap();
        assert_eq!(decoded.payload(), Some(b"chat message".as_ref()));
        assert_eq!(decoded, essence);
    }

    #[test]
    fn roundtrip_preserves_id() {
        let tx = transaction(3);
        let decoded = Transaction::from_bytes(&tx.to_bytes()).unwrap();
        assert_eq!(decoded.id(), tx.id());
        assert_eq!(decoded, tx);
    }

    #[test]
    fn booked_outputs_assign_ids() {
        let tx = transaction(1);
        let booked = tx.booked_outputs().unwrap();
        assert_eq!(booked.len(), 1);
        assert_eq!(booked[0].id(), OutputId::new(tx.id(), 0).unwrap());
    }
}

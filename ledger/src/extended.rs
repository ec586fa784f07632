//! Extended locked outputs.
//!
//! A colored-balance output with optional extras: a timelock before which it
//! cannot be spent at all, a fallback address that takes over once a deadline
//! passes, and an arbitrary data payload. With no extras enabled it behaves
//! like a sig-locked colored output.

use crate::address::Address;
use crate::color::ColoredBalances;
use crate::error::LedgerError;
use crate::output::{
    alias_reference_unlock_valid, read_id, replace_minting_color, store_id, Output,
    MAX_OUTPUT_PAYLOAD_SIZE,
};
use crate::output_id::OutputId;
use crate::transaction::Transaction;
use crate::unlock::UnlockBlock;
use std::fmt;
use std::sync::RwLock;
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};
use weft_types::Timestamp;

// Flag bits of the serialized form, least significant first.
const FLAG_FALLBACK_PRESENT: u8 = 1 << 0;
const FLAG_TIMELOCK_PRESENT: u8 = 1 << 1;
const FLAG_PAYLOAD_PRESENT: u8 = 1 << 2;

/// A colored-balance output with optional timelock, fallback and payload.
pub struct ExtendedLockedOutput {
    id: RwLock<OutputId>,
    balances: ColoredBalances,
    address: Address,
    /// Where the funds go once the fallback deadline has passed unspent.
    fallback_address: Option<Address>,
    fallback_deadline: Timestamp,
    /// No unlocking at all before this deadline. Zero when unset.
    timelock: Timestamp,
    payload: Vec<u8>,
}

impl ExtendedLockedOutput {
    pub fn new(balances: ColoredBalances, address: Address) -> Result<Self, LedgerError> {
        balances.check_bounds()?;
        Ok(Self {
            id: RwLock::new(OutputId::EMPTY),
            balances,
            address,
            fallback_address: None,
            fallback_deadline: Timestamp::ZERO,
            timelock: Timestamp::ZERO,
            payload: Vec::new(),
        })
    }

    /// Add a fallback address and deadline.
    pub fn with_fallback(mut self, address: Address, deadline: Timestamp) -> Self {
        self.fallback_address = Some(address);
        self.fallback_deadline = deadline;
        self
    }

    /// Add a timelock.
    pub fn with_timelock(mut self, timelock: Timestamp) -> Self {
        self.timelock = timelock;
        self
    }

    pub fn set_payload(&mut self, payload: Vec<u8>) -> Result<(), LedgerError> {
        if payload.len() > MAX_OUTPUT_PAYLOAD_SIZE {
            return Err(LedgerError::PayloadTooLarge(payload.len()));
        }
        self.payload = payload;
        Ok(())
    }

    pub fn id(&self) -> OutputId {
        read_id(&self.id)
    }

    pub fn set_id(&self, id: OutputId) {
        store_id(&self.id, id);
    }

    pub fn balances(&self) -> &ColoredBalances {
        &self.balances
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn fallback(&self) -> Option<(&Address, Timestamp)> {
        self.fallback_address
            .as_ref()
            .map(|address| (address, self.fallback_deadline))
    }

    pub fn timelock(&self) -> Timestamp {
        self.timelock
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Whether the timelock still blocks unlocking at the given time.
    pub fn time_locked_at(&self, now: Timestamp) -> bool {
        self.timelock.is_after(now)
    }

    /// The address allowed to unlock the output at the given time: the
    /// primary address, or the fallback once the deadline has passed.
    pub fn unlock_address_at(&self, now: Timestamp) -> &Address {
        match &self.fallback_address {
            Some(fallback) if now.is_after(self.fallback_deadline) => fallback,
            _ => &self.address,
        }
    }

    /// Whether the transaction and the given unlock block are allowed to
    /// spend this output.
    pub fn unlock_valid(
        &self,
        tx: &Transaction,
        unlock_block: &UnlockBlock,
        inputs: &[Output],
    ) -> Result<bool, LedgerError> {
        let tx_timestamp = tx.essence().timestamp();
        if self.time_locked_at(tx_timestamp) {
            return Ok(false);
        }
        let address = self.unlock_address_at(tx_timestamp);

        match unlock_block {
            UnlockBlock::Signature(block) => {
                Ok(block.address_signature_valid(address, &tx.essence().to_bytes()))
            }
            UnlockBlock::Alias(block) => alias_reference_unlock_valid(address, block, tx, inputs),
            UnlockBlock::Reference(_) => {
                Err(LedgerError::InvalidUnlock("unsupported unlock block type"))
            }
        }
    }

    /// A copy with any mint placeholder re-keyed to the color derived from
    /// this output's id.
    pub fn update_minting_color(&self) -> ExtendedLockedOutput {
        let mut updated = self.clone();
        updated.balances = replace_minting_color(&self.balances, self.id());
        updated
    }

    fn flags(&self) -> u8 {
        let mut flags = 0u8;
        if self.fallback_address.is_some() {
            flags |= FLAG_FALLBACK_PRESENT;
        }
        if !self.timelock.is_zero() {
            flags |= FLAG_TIMELOCK_PRESENT;
        }
        if !self.payload.is_empty() {
            flags |= FLAG_PAYLOAD_PRESENT;
        }
        flags
    }

    pub(crate) fn encode_body(&self, w: &mut Writer) {
        let flags = self.flags();
        self.balances.encode(w);
        self.address.encode(w);
        w.write_u8(flags);
        if let Some(fallback) = &self.fallback_address {
            fallback.encode(w);
            w.write_time(self.fallback_deadline);
        }
        if flags & FLAG_TIMELOCK_PRESENT != 0 {
            w.write_time(self.timelock);
        }
        if flags & FLAG_PAYLOAD_PRESENT != 0 {
            w.write_u16(self.payload.len() as u16);
            w.write_bytes(&self.payload);
        }
    }

    pub(crate) fn decode_body(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let balances = ColoredBalances::decode(r)?;
        let address = Address::decode(r)?;
        let flags = r.read_u8()?;
        let (fallback_address, fallback_deadline) = if flags & FLAG_FALLBACK_PRESENT != 0 {
            (Some(Address::decode(r)?), r.read_time()?)
        } else {
            (None, Timestamp::ZERO)
        };
        let timelock = if flags & FLAG_TIMELOCK_PRESENT != 0 {
            r.read_time()?
        } else {
            Timestamp::ZERO
        };
        let mut payload = Vec::new();
        if flags & FLAG_PAYLOAD_PRESENT != 0 {
            let len = r.read_u16()? as usize;
            if len > MAX_OUTPUT_PAYLOAD_SIZE {
                return Err(CodecError::InvalidValue {
                    field: "extended locked output",
                    reason: "payload exceeds the size limit",
                });
            }
            payload = r.read_bytes(len)?;
        }
        balances.check_bounds().map_err(|_| CodecError::InvalidValue {
            field: "extended locked output",
            reason: "balance out of range",
        })?;
        Ok(Self {
            id: RwLock::new(OutputId::EMPTY),
            balances,
            address,
            fallback_address,
            fallback_deadline,
            timelock,
            payload,
        })
    }
}

impl Clone for ExtendedLockedOutput {
    fn clone(&self) -> Self {
        Self {
            id: RwLock::new(self.id()),
            balances: self.balances.clone(),
            address: self.address,
            fallback_address: self.fallback_address,
            fallback_deadline: self.fallback_deadline,
            timelock: self.timelock,
            payload: self.payload.clone(),
        }
    }
}

impl PartialEq for ExtendedLockedOutput {
    fn eq(&self, other: &Self) -> bool {
        self.balances == other.balances
            && self.address == other.address
            && self.fallback_address == other.fallback_address
            && self.fallback_deadline == other.fallback_deadline
            && self.timelock == other.timelock
            && self.payload == other.payload
    }
}

impl Eq for ExtendedLockedOutput {}

impl fmt::Debug for ExtendedLockedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedLockedOutput")
            .field("id", &self.id())
            .field("balances", &self.balances)
            .field("address", &self.address)
            .field("fallback_address", &self.fallback_address)
            .field("timelock", &self.timelock)
            .finish()
    }
}

//! Alias outputs.
//!
//! An alias is an output chain with a persistent identity, the alias address.
//! Each transaction spending an alias output must either continue the chain
//! with exactly one successor output carrying the same alias address, or
//! destroy the alias. Two separate keys control the chain: the state address
//! advances state (data, index, tokens), the governing address changes the
//! controlling keys themselves.

use crate::address::{Address, AliasAddress};
use crate::color::ColoredBalances;
use crate::error::LedgerError;
use crate::output::{
    is_above_dust_threshold, is_exact_dust_minimum, read_id, replace_minting_color, store_id,
    Output, MAX_OUTPUT_PAYLOAD_SIZE,
};
use crate::output_id::OutputId;
use crate::transaction::Transaction;
use crate::unlock::UnlockBlock;
use std::fmt;
use std::sync::RwLock;
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};
use weft_types::Timestamp;

// Flag bits of the serialized form, least significant first.
const FLAG_GOVERNANCE_UPDATE: u8 = 1 << 0;
const FLAG_GOVERNANCE_SET: u8 = 1 << 1;
const FLAG_STATE_DATA_PRESENT: u8 = 1 << 2;
const FLAG_GOVERNANCE_METADATA_PRESENT: u8 = 1 << 3;
const FLAG_IMMUTABLE_DATA_PRESENT: u8 = 1 << 4;
const FLAG_IS_ORIGIN: u8 = 1 << 5;
const FLAG_DELEGATION_CONSTRAINT: u8 = 1 << 6;
const FLAG_DELEGATION_TIMELOCK_PRESENT: u8 = 1 << 7;

/// An output that forms a chain under a persistent alias address.
pub struct AliasOutput {
    id: RwLock<OutputId>,
    balances: ColoredBalances,
    /// Immutable for the lifetime of the alias. Nil on a freshly minted
    /// origin until the minting output id is known.
    alias_address: AliasAddress,
    /// Controls state transitions. Can itself be an alias address.
    state_address: Address,
    /// Strictly incrementing counter of state transitions; starts at 0 when
    /// the chain is minted and does not change on governance transitions.
    state_index: u32,
    state_data: Vec<u8>,
    /// Metadata only a governance transition may change.
    governance_metadata: Vec<u8>,
    /// Set when the alias is minted, immutable afterwards.
    immutable_data: Vec<u8>,
    /// Whether this chained output performs a governance update; decides
    /// which key must have unlocked the consumed alias input.
    is_governance_update: bool,
    /// Governing address, or `None` when the alias governs itself.
    governing_address: Option<Address>,
    is_origin: bool,
    /// Delegation constraint: token balances are frozen across state
    /// transitions.
    is_delegated: bool,
    /// While active, only state transitions are permitted; once expired, only
    /// governance transitions. Zero when unset.
    delegation_timelock: Timestamp,
}

impl AliasOutput {
    /// Create the origin output of a new alias chain. The alias address
    /// stays nil until the minting transaction id is known.
    pub fn new_mint(
        balances: ColoredBalances,
        state_address: Address,
    ) -> Result<Self, LedgerError> {
        let output = Self {
            id: RwLock::new(OutputId::EMPTY),
            balances,
            alias_address: AliasAddress::NIL,
            state_address,
            state_index: 0,
            state_data: Vec::new(),
            governance_metadata: Vec::new(),
            immutable_data: Vec::new(),
            is_governance_update: false,
            governing_address: None,
            is_origin: true,
            is_delegated: false,
            delegation_timelock: Timestamp::ZERO,
        };
        output.check_validity()?;
        Ok(output)
    }

    /// The chained successor for a state transition: same alias, state index
    /// incremented.
    pub fn next_state(&self) -> Self {
        let mut next = self.clone();
        next.alias_address = self.alias_address();
        next.is_origin = false;
        next.is_governance_update = false;
        next.state_index = self.state_index + 1;
        next
    }

    /// The chained successor for a governance transition: same alias, state
    /// untouched.
    pub fn next_governance(&self) -> Self {
        let mut next = self.clone();
        next.alias_address = self.alias_address();
        next.is_origin = false;
        next.is_governance_update = true;
        next
    }

    /// Mark the output delegated.
    pub fn with_delegation(mut self) -> Self {
        self.is_delegated = true;
        self
    }

    /// Mark the output delegated with a timelock.
    pub fn with_delegation_timelock(mut self, lock_until: Timestamp) -> Self {
        self.is_delegated = true;
        self.delegation_timelock = lock_until;
        self
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

    pub fn set_balances(&mut self, balances: ColoredBalances) -> Result<(), LedgerError> {
        if !is_above_dust_threshold(&balances) {
            return Err(LedgerError::DustBelowThreshold);
        }
        balances.check_bounds()?;
        self.balances = balances;
        Ok(())
    }

    /// The alias address. Derived from the output id for a freshly minted
    /// origin whose stored address is still nil.
    pub fn alias_address(&self) -> AliasAddress {
        if self.alias_address.is_nil() {
            return AliasAddress::from_seed(self.id().as_bytes());
        }
        self.alias_address
    }

    pub fn set_alias_address(&mut self, address: AliasAddress) {
        self.alias_address = address;
    }

    pub fn is_origin(&self) -> bool {
        self.is_origin
    }

    pub fn is_delegated(&self) -> bool {
        self.is_delegated
    }

    pub fn is_governance_update(&self) -> bool {
        self.is_governance_update
    }

    pub fn set_governance_update(&mut self, is_governance_update: bool) {
        self.is_governance_update = is_governance_update;
    }

    /// Whether no separate governing address is set, i.e. the state address
    /// governs the alias.
    pub fn is_self_governed(&self) -> bool {
        self.governing_address.is_none()
    }

    pub fn state_address(&self) -> &Address {
        &self.state_address
    }

    pub fn set_state_address(&mut self, address: Address) {
        self.state_address = address;
    }

    /// The effective governing address: the explicit one, or the state
    /// address when self-governed.
    pub fn governing_address(&self) -> &Address {
        self.governing_address.as_ref().unwrap_or(&self.state_address)
    }

    /// Set or clear the governing address. Setting it to the state address
    /// collapses to self-governed.
    pub fn set_governing_address(&mut self, address: Option<Address>) {
        self.governing_address = address.filter(|a| *a != self.state_address);
    }

    pub fn state_index(&self) -> u32 {
        self.state_index
    }

    pub fn set_state_index(&mut self, index: u32) {
        self.state_index = index;
    }

    pub fn state_data(&self) -> &[u8] {
        &self.state_data
    }

    pub fn set_state_data(&mut self, data: Vec<u8>) -> Result<(), LedgerError> {
        if data.len() > MAX_OUTPUT_PAYLOAD_SIZE {
            return Err(LedgerError::PayloadTooLarge(data.len()));
        }
        self.state_data = data;
        Ok(())
    }

    pub fn governance_metadata(&self) -> &[u8] {
        &self.governance_metadata
    }

    pub fn set_governance_metadata(&mut self, data: Vec<u8>) -> Result<(), LedgerError> {
        if data.len() > MAX_OUTPUT_PAYLOAD_SIZE {
            return Err(LedgerError::PayloadTooLarge(data.len()));
        }
        self.governance_metadata = data;
        Ok(())
    }

    pub fn immutable_data(&self) -> &[u8] {
        &self.immutable_data
    }

    pub fn set_immutable_data(&mut self, data: Vec<u8>) -> Result<(), LedgerError> {
        if data.len() > MAX_OUTPUT_PAYLOAD_SIZE {
            return Err(LedgerError::PayloadTooLarge(data.len()));
        }
        self.immutable_data = data;
        Ok(())
    }

    /// The delegation timelock; zero when the output is not delegated or no
    /// timelock is set.
    pub fn delegation_timelock(&self) -> Timestamp {
        if !self.is_delegated {
            return Timestamp::ZERO;
        }
        self.delegation_timelock
    }

    pub fn set_delegation_timelock(&mut self, timelock: Timestamp) -> Result<(), LedgerError> {
        if !self.is_delegated {
            return Err(LedgerError::TransitionInvalid(
                "delegation timelock can only be set on a delegated output",
            ));
        }
        self.delegation_timelock = timelock;
        Ok(())
    }

    /// Whether the delegation timelock is active at the given time.
    pub fn delegation_time_locked_at(&self, now: Timestamp) -> bool {
        if !self.is_delegated || self.delegation_timelock.is_zero() {
            return false;
        }
        self.delegation_timelock.is_after(now)
    }

    /// Locate this alias' chained successor among the transaction's outputs.
    ///
    /// Returns `None` when the alias is being destroyed and an error when two
    /// outputs continue the same alias.
    pub fn find_chained_output<'a>(
        &self,
        tx: &'a Transaction,
    ) -> Result<Option<&'a AliasOutput>, LedgerError> {
        let alias_address = self.alias_address();
        let mut found = None;
        for output in tx.essence().outputs().iter() {
            let Output::Alias(candidate) = output else {
                continue;
            };
            if candidate.alias_address() != alias_address {
                continue;
            }
            if found.is_some() {
                return Err(LedgerError::DuplicateAliasForked);
            }
            found = Some(candidate);
        }
        Ok(found)
    }

    /// Whether spending this alias in `tx` requires the governance key: the
    /// chained successor is a governance update, or there is no successor
    /// (destruction).
    pub(crate) fn needs_governance_unlock(&self, tx: &Transaction) -> bool {
        match self.find_chained_output(tx) {
            Err(_) => false,
            Ok(None) => true,
            Ok(Some(chained)) => chained.is_governance_update,
        }
    }

    /// Enforce the transition constraints between this (consumed) output and
    /// its chained successor.
    pub fn validate_transition(
        &self,
        chained: &AliasOutput,
        tx_timestamp: Timestamp,
    ) -> Result<(), LedgerError> {
        if self.alias_address() != chained.alias_address() {
            return Err(LedgerError::TransitionInvalid("alias address cannot be modified"));
        }
        if self.immutable_data != chained.immutable_data {
            return Err(LedgerError::TransitionInvalid("immutable data cannot be modified"));
        }
        if chained.is_governance_update {
            // governance transition: state and tokens are frozen
            if self.state_data != chained.state_data {
                return Err(LedgerError::TransitionInvalid(
                    "state data is not unlocked for modification",
                ));
            }
            if self.state_index != chained.state_index {
                return Err(LedgerError::TransitionInvalid(
                    "state index is not unlocked for modification",
                ));
            }
            if self.balances != chained.balances {
                return Err(LedgerError::TransitionInvalid(
                    "tokens are not unlocked for modification",
                ));
            }
            // the delegating party cannot take funds back before the deadline
            if self.is_delegated && self.delegation_time_locked_at(tx_timestamp) {
                return Err(LedgerError::TransitionInvalid(
                    "governance transition not allowed while the delegation timelock is active",
                ));
            }
        } else {
            // state transition: control addresses and governance data frozen
            if self.state_index.checked_add(1) != Some(chained.state_index) {
                return Err(LedgerError::TransitionInvalid(
                    "state index must increment by exactly one",
                ));
            }
            if self.state_address != chained.state_address {
                return Err(LedgerError::TransitionInvalid(
                    "state address is not unlocked for modification",
                ));
            }
            if self.governing_address != chained.governing_address {
                return Err(LedgerError::TransitionInvalid(
                    "governing address is not unlocked for modification",
                ));
            }
            if self.governance_metadata != chained.governance_metadata {
                return Err(LedgerError::TransitionInvalid(
                    "governance metadata is not unlocked for modification",
                ));
            }
            if self.is_delegated && self.balances != chained.balances {
                return Err(LedgerError::TransitionInvalid(
                    "delegated output funds cannot be changed",
                ));
            }
            if self.is_delegated != chained.is_delegated {
                return Err(LedgerError::TransitionInvalid(
                    "delegation status cannot be changed",
                ));
            }
            if self.delegation_timelock() != chained.delegation_timelock() {
                return Err(LedgerError::TransitionInvalid(
                    "delegation timelock cannot be changed",
                ));
            }
            if self.is_delegated
                && !self.delegation_timelock.is_zero()
                && !self.delegation_time_locked_at(tx_timestamp)
            {
                return Err(LedgerError::TransitionInvalid(
                    "state transition of a delegated output not allowed after the timelock expired",
                ));
            }
        }
        Ok(())
    }

    /// Enforce the destruction constraints when no chained successor exists.
    pub fn validate_destroy(&self, now: Timestamp) -> Result<(), LedgerError> {
        if !self.is_delegated && !is_exact_dust_minimum(&self.balances) {
            return Err(LedgerError::TransitionInvalid(
                "non-delegated alias can only be destroyed holding exactly the dust minimum",
            ));
        }
        if self.is_delegated && self.delegation_time_locked_at(now) {
            return Err(LedgerError::TransitionInvalid(
                "delegated alias cannot be destroyed while the delegation timelock is active",
            ));
        }
        Ok(())
    }

    /// One dereference step of an alias unlock for a governance transition:
    /// the referenced input must be the governing alias, itself
    /// state-transitioning in this transaction.
    fn governance_unlocked_by_alias(
        &self,
        tx: &Transaction,
        ref_index: u16,
        inputs: &[Output],
    ) -> Result<bool, LedgerError> {
        self.unlocked_by_alias(self.governing_address(), tx, ref_index, inputs)
    }

    /// One dereference step of an alias unlock for a state transition.
    fn state_unlocked_by_alias(
        &self,
        tx: &Transaction,
        ref_index: u16,
        inputs: &[Output],
    ) -> Result<bool, LedgerError> {
        self.unlocked_by_alias(&self.state_address, tx, ref_index, inputs)
    }

    fn unlocked_by_alias(
        &self,
        controlling: &Address,
        tx: &Transaction,
        ref_index: u16,
        inputs: &[Output],
    ) -> Result<bool, LedgerError> {
        let Address::Alias(controlling_alias) = controlling else {
            return Err(LedgerError::InvalidUnlock(
                "controlling address is not of the alias kind",
            ));
        };
        let referenced = inputs
            .get(ref_index as usize)
            .ok_or(LedgerError::InvalidUnlock("alias reference index out of bounds"))?;
        let Output::Alias(referenced_alias) = referenced else {
            return Err(LedgerError::InvalidUnlock(
                "referenced input is not an alias output",
            ));
        };
        if referenced_alias.alias_address() != *controlling_alias {
            return Err(LedgerError::InvalidUnlock("wrong alias referenced"));
        }
        // the referenced alias must itself be state-transitioning
        Ok(!referenced_alias.needs_governance_unlock(tx))
    }

    /// Whether the transaction and the given unlock block are allowed to
    /// spend this alias output.
    ///
    /// Circular alias-unlock chains are rejected by the transaction-level
    /// validator before this is called; a single dereference step suffices
    /// here.
    pub fn unlock_valid(
        &self,
        tx: &Transaction,
        unlock_block: &UnlockBlock,
        inputs: &[Output],
    ) -> Result<bool, LedgerError> {
        let chained = self.find_chained_output(tx)?;
        let tx_timestamp = tx.essence().timestamp();
        match unlock_block {
            UnlockBlock::Signature(block) => {
                let essence_bytes = tx.essence().to_bytes();
                match chained {
                    Some(chained) => {
                        if chained.is_governance_update {
                            if !block.address_signature_valid(self.governing_address(), &essence_bytes)
                            {
                                return Err(LedgerError::InvalidUnlock(
                                    "signature is invalid for governance unlock",
                                ));
                            }
                        } else if !block.address_signature_valid(&self.state_address, &essence_bytes)
                        {
                            return Err(LedgerError::InvalidUnlock(
                                "signature is invalid for state unlock",
                            ));
                        }
                        self.validate_transition(chained, tx_timestamp)?;
                    }
                    None => {
                        // no successor: the alias is being destroyed
                        if !block.address_signature_valid(self.governing_address(), &essence_bytes) {
                            return Err(LedgerError::InvalidUnlock(
                                "signature is invalid for alias destruction",
                            ));
                        }
                        self.validate_destroy(tx_timestamp)?;
                    }
                }
                Ok(true)
            }
            UnlockBlock::Alias(block) => {
                match chained {
                    Some(chained) => {
                        if chained.is_governance_update {
                            if !self.governance_unlocked_by_alias(
                                tx,
                                block.alias_input_index(),
                                inputs,
                            )? {
                                return Err(LedgerError::InvalidUnlock(
                                    "referenced alias does not unlock the governance transition",
                                ));
                            }
                        } else if !self.state_unlocked_by_alias(
                            tx,
                            block.alias_input_index(),
                            inputs,
                        )? {
                            return Err(LedgerError::InvalidUnlock(
                                "referenced alias does not unlock the state transition",
                            ));
                        }
                        self.validate_transition(chained, tx_timestamp)?;
                    }
                    None => {
                        if !self.governance_unlocked_by_alias(
                            tx,
                            block.alias_input_index(),
                            inputs,
                        )? {
                            return Err(LedgerError::InvalidUnlock(
                                "referenced alias does not unlock the destruction",
                            ));
                        }
                        self.validate_destroy(tx_timestamp)?;
                    }
                }
                Ok(true)
            }
            UnlockBlock::Reference(_) => {
                Err(LedgerError::InvalidUnlock("unsupported unlock block type"))
            }
        }
    }

    /// A copy with the mint placeholder resolved; a freshly minted origin
    /// additionally gets its alias address derived from the output id.
    pub fn update_minting_color(&self) -> AliasOutput {
        let mut updated = self.clone();
        updated.balances = replace_minting_color(&self.balances, self.id());
        if self.is_origin {
            updated.alias_address = AliasAddress::from_seed(self.id().as_bytes());
        }
        updated
    }

    pub(crate) fn check_validity(&self) -> Result<(), LedgerError> {
        if !is_above_dust_threshold(&self.balances) {
            return Err(LedgerError::DustBelowThreshold);
        }
        self.balances.check_bounds()?;
        if self.is_origin && self.state_index != 0 {
            return Err(LedgerError::TransitionInvalid(
                "origin alias must start at state index 0",
            ));
        }
        if self.state_address == Address::Alias(self.alias_address) {
            return Err(LedgerError::TransitionInvalid(
                "state address cannot be the output's own alias address",
            ));
        }
        if *self.governing_address() == Address::Alias(self.alias_address) {
            return Err(LedgerError::TransitionInvalid(
                "governing address cannot be the output's own alias address",
            ));
        }
        if self.state_data.len() > MAX_OUTPUT_PAYLOAD_SIZE {
            return Err(LedgerError::PayloadTooLarge(self.state_data.len()));
        }
        if self.governance_metadata.len() > MAX_OUTPUT_PAYLOAD_SIZE {
            return Err(LedgerError::PayloadTooLarge(self.governance_metadata.len()));
        }
        if self.immutable_data.len() > MAX_OUTPUT_PAYLOAD_SIZE {
            return Err(LedgerError::PayloadTooLarge(self.immutable_data.len()));
        }
        if !self.is_delegated && !self.delegation_timelock.is_zero() {
            return Err(LedgerError::TransitionInvalid(
                "delegation timelock requires a delegated output",
            ));
        }
        Ok(())
    }

    fn flags(&self) -> u8 {
        let mut flags = 0u8;
        if self.is_governance_update {
            flags |= FLAG_GOVERNANCE_UPDATE;
        }
        if self.governing_address.is_some() {
            flags |= FLAG_GOVERNANCE_SET;
        }
        if !self.state_data.is_empty() {
            flags |= FLAG_STATE_DATA_PRESENT;
        }
        if !self.governance_metadata.is_empty() {
            flags |= FLAG_GOVERNANCE_METADATA_PRESENT;
        }
        if !self.immutable_data.is_empty() {
            flags |= FLAG_IMMUTABLE_DATA_PRESENT;
        }
        if self.is_origin {
            flags |= FLAG_IS_ORIGIN;
        }
        if self.is_delegated {
            flags |= FLAG_DELEGATION_CONSTRAINT;
        }
        if !self.delegation_timelock.is_zero() {
            flags |= FLAG_DELEGATION_TIMELOCK_PRESENT;
        }
        flags
    }

    pub(crate) fn encode_body(&self, w: &mut Writer) {
        let flags = self.flags();
        w.write_u8(flags);
        self.alias_address.encode(w);
        self.balances.encode(w);
        self.state_address.encode(w);
        w.write_u32(self.state_index);
        if flags & FLAG_STATE_DATA_PRESENT != 0 {
            w.write_u16(self.state_data.len() as u16);
            w.write_bytes(&self.state_data);
        }
        if flags & FLAG_GOVERNANCE_METADATA_PRESENT != 0 {
            w.write_u16(self.governance_metadata.len() as u16);
            w.write_bytes(&self.governance_metadata);
        }
        if flags & FLAG_IMMUTABLE_DATA_PRESENT != 0 {
            w.write_u16(self.immutable_data.len() as u16);
            w.write_bytes(&self.immutable_data);
        }
        if let Some(governing) = &self.governing_address {
            governing.encode(w);
        }
        if flags & FLAG_DELEGATION_TIMELOCK_PRESENT != 0 {
            w.write_time(self.delegation_timelock);
        }
    }

    pub(crate) fn decode_body(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let flags = r.read_u8()?;
        let alias_address = AliasAddress::decode(r)?;
        let balances = ColoredBalances::decode(r)?;
        let state_address = Address::decode(r)?;
        let state_index = r.read_u32()?;
        let mut state_data = Vec::new();
        if flags & FLAG_STATE_DATA_PRESENT != 0 {
            let len = r.read_u16()? as usize;
            state_data = r.read_bytes(len)?;
        }
        let mut governance_metadata = Vec::new();
        if flags & FLAG_GOVERNANCE_METADATA_PRESENT != 0 {
            let len = r.read_u16()? as usize;
            governance_metadata = r.read_bytes(len)?;
        }
        let mut immutable_data = Vec::new();
        if flags & FLAG_IMMUTABLE_DATA_PRESENT != 0 {
            let len = r.read_u16()? as usize;
            immutable_data = r.read_bytes(len)?;
        }
        let governing_address = if flags & FLAG_GOVERNANCE_SET != 0 {
            Some(Address::decode(r)?)
        } else {
            None
        };
        let delegation_timelock = if flags & FLAG_DELEGATION_TIMELOCK_PRESENT != 0 {
            r.read_time()?
        } else {
            Timestamp::ZERO
        };

        let output = Self {
            id: RwLock::new(OutputId::EMPTY),
            balances,
            alias_address,
            state_address,
            state_index,
            state_data,
            governance_metadata,
            immutable_data,
            is_governance_update: flags & FLAG_GOVERNANCE_UPDATE != 0,
            governing_address,
            is_origin: flags & FLAG_IS_ORIGIN != 0,
            is_delegated: flags & FLAG_DELEGATION_CONSTRAINT != 0,
            delegation_timelock,
        };
        output.check_validity().map_err(|_| CodecError::InvalidValue {
            field: "alias output",
            reason: "failed basic validity checks",
        })?;
        Ok(output)
    }
}

impl Clone for AliasOutput {
    fn clone(&self) -> Self {
        Self {
            id: RwLock::new(self.id()),
            balances: self.balances.clone(),
            alias_address: self.alias_address,
            state_address: self.state_address,
            state_index: self.state_index,
            state_data: self.state_data.clone(),
            governance_metadata: self.governance_metadata.clone(),
            immutable_data: self.immutable_data.clone(),
            is_governance_update: self.is_governance_update,
            governing_address: self.governing_address,
            is_origin: self.is_origin,
            is_delegated: self.is_delegated,
            delegation_timelock: self.delegation_timelock,
        }
    }
}

impl PartialEq for AliasOutput {
    fn eq(&self, other: &Self) -> bool {
        self.balances == other.balances
            && self.alias_address == other.alias_address
            && self.state_address == other.state_address
            && self.state_index == other.state_index
            && self.state_data == other.state_data
            && self.governance_metadata == other.governance_metadata
            && self.immutable_data == other.immutable_data
            && self.is_governance_update == other.is_governance_update
            && self.governing_address == other.governing_address
            && self.is_origin == other.is_origin
            && self.is_delegated == other.is_delegated
            && self.delegation_timelock == other.delegation_timelock
    }
}

impl Eq for AliasOutput {}

impl fmt::Debug for AliasOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasOutput")
            .field("id", &self.id())
            .field("alias_address", &self.alias_address)
            .field("state_index", &self.state_index)
            .field("is_governance_update", &self.is_governance_update)
            .field("is_origin", &self.is_origin)
            .field("is_delegated", &self.is_delegated)
            .finish()
    }
}

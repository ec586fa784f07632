//! Transaction outputs.
//!
//! The four output kinds share an id slot that is only assigned once the
//! surrounding transaction's id is known, so the id sits behind a per-output
//! read/write lock and is excluded from the serialized form.

use crate::address::{Address, AddressKind};
use crate::alias::AliasOutput;
use crate::color::{Color, ColoredBalances};
use crate::error::LedgerError;
use crate::extended::ExtendedLockedOutput;
use crate::input::{Input, Inputs, UtxoInput};
use crate::output_id::OutputId;
use crate::transaction::Transaction;
use crate::unlock::{AliasUnlockBlock, UnlockBlock};
use std::collections::HashSet;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};
use weft_crypto::blake2b_256;

/// The minimum amount of outputs in a transaction.
pub const MIN_OUTPUT_COUNT: usize = 1;

/// The maximum amount of outputs in a transaction.
pub const MAX_OUTPUT_COUNT: usize = 127;

/// The minimum balance per output (and per color entry).
pub const MIN_OUTPUT_BALANCE: u64 = 1;

/// The maximum balance on an output: the total token supply.
pub const MAX_OUTPUT_BALANCE: u64 = 2_779_530_283_277_761;

/// Minimum number of IOTA tokens an alias output must hold.
pub const DUST_THRESHOLD_ALIAS_IOTA: u64 = 100;

/// Size limit on the data payload fields of alias and extended outputs.
pub const MAX_OUTPUT_PAYLOAD_SIZE: usize = 4 * 1024;

/// The kind of an output; doubles as its serialization tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OutputKind {
    SigLockedSingle = 0,
    SigLockedColored = 1,
    Alias = 2,
    ExtendedLocked = 3,
}

/// Whether the balances carry at least the alias dust minimum in IOTA.
pub fn is_above_dust_threshold(balances: &ColoredBalances) -> bool {
    balances
        .get(&Color::IOTA)
        .is_some_and(|iotas| iotas >= DUST_THRESHOLD_ALIAS_IOTA)
}

/// Whether the balances are exactly the alias dust minimum and nothing else.
pub fn is_exact_dust_minimum(balances: &ColoredBalances) -> bool {
    balances.len() == 1 && balances.get(&Color::IOTA) == Some(DUST_THRESHOLD_ALIAS_IOTA)
}

pub(crate) fn read_id(lock: &RwLock<OutputId>) -> OutputId {
    *lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn store_id(lock: &RwLock<OutputId>, id: OutputId) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = id;
}

/// Rewrites the mint placeholder color to the color derived from the minting
/// output's id.
pub(crate) fn replace_minting_color(balances: &ColoredBalances, id: OutputId) -> ColoredBalances {
    let mut map = balances.to_map();
    if let Some(minted) = map.remove(&Color::MINT) {
        map.insert(Color::new(blake2b_256(id.as_bytes())), minted);
    }
    ColoredBalances::new(map)
}

/// Shared branch for unlocking a sig-locked or extended output through an
/// alias reference: the referenced input must be an alias output carrying the
/// locking alias address, and that alias must not be governance-unlocked in
/// this transaction.
pub(crate) fn alias_reference_unlock_valid(
    address: &Address,
    block: &AliasUnlockBlock,
    tx: &Transaction,
    inputs: &[Output],
) -> Result<bool, LedgerError> {
    if address.kind() != AddressKind::Alias {
        return Err(LedgerError::InvalidUnlock(
            "only alias addresses can be unlocked by alias reference",
        ));
    }
    let referenced = inputs
        .get(block.alias_input_index() as usize)
        .ok_or(LedgerError::InvalidUnlock("alias reference index out of bounds"))?;
    let Output::Alias(referenced_alias) = referenced else {
        return Err(LedgerError::InvalidUnlock("referenced input is not an alias output"));
    };
    if Address::Alias(referenced_alias.alias_address()) != *address {
        return Err(LedgerError::InvalidUnlock("wrong alias referenced"));
    }
    Ok(!referenced_alias.needs_governance_unlock(tx))
}

/// An output holding exactly one uncolored balance, unlocked by a signature
/// for its address.
pub struct SigLockedSingleOutput {
    id: RwLock<OutputId>,
    balance: u64,
    address: Address,
}

impl SigLockedSingleOutput {
    pub fn new(balance: u64, address: Address) -> Result<Self, LedgerError> {
        if !(MIN_OUTPUT_BALANCE..=MAX_OUTPUT_BALANCE).contains(&balance) {
            return Err(LedgerError::BalanceOutOfRange(balance));
        }
        Ok(Self {
            id: RwLock::new(OutputId::EMPTY),
            balance,
            address,
        })
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn id(&self) -> OutputId {
        read_id(&self.id)
    }

    pub fn set_id(&self, id: OutputId) {
        store_id(&self.id, id);
    }

    fn encode_body(&self, w: &mut Writer) {
        w.write_u64(self.balance);
        self.address.encode(w);
    }

    fn decode_body(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let balance = r.read_u64()?;
        let address = Address::decode(r)?;
        Self::new(balance, address).map_err(|_| CodecError::InvalidValue {
            field: "sig locked single output",
            reason: "balance out of range",
        })
    }
}

impl Clone for SigLockedSingleOutput {
    fn clone(&self) -> Self {
        Self {
            id: RwLock::new(self.id()),
            balance: self.balance,
            address: self.address,
        }
    }
}

impl PartialEq for SigLockedSingleOutput {
    fn eq(&self, other: &Self) -> bool {
        self.balance == other.balance && self.address == other.address
    }
}

impl Eq for SigLockedSingleOutput {}

impl fmt::Debug for SigLockedSingleOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigLockedSingleOutput")
            .field("id", &self.id())
            .field("balance", &self.balance)
            .field("address", &self.address)
            .finish()
    }
}

/// An output holding colored balances, unlocked by a signature for its
/// address.
pub struct SigLockedColoredOutput {
    id: RwLock<OutputId>,
    balances: ColoredBalances,
    address: Address,
}

impl SigLockedColoredOutput {
    pub fn new(balances: ColoredBalances, address: Address) -> Result<Self, LedgerError> {
        balances.check_bounds()?;
        Ok(Self {
            id: RwLock::new(OutputId::EMPTY),
            balances,
            address,
        })
    }

    pub fn balances(&self) -> &ColoredBalances {
        &self.balances
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn id(&self) -> OutputId {
        read_id(&self.id)
    }

    pub fn set_id(&self, id: OutputId) {
        store_id(&self.id, id);
    }

    /// A copy with any mint placeholder re-keyed to the color derived from
    /// this output's id.
    pub fn update_minting_color(&self) -> Self {
        Self {
            id: RwLock::new(self.id()),
            balances: replace_minting_color(&self.balances, self.id()),
            address: self.address,
        }
    }

    fn encode_body(&self, w: &mut Writer) {
        self.balances.encode(w);
        self.address.encode(w);
    }

    fn decode_body(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let balances = ColoredBalances::decode(r)?;
        let address = Address::decode(r)?;
        Self::new(balances, address).map_err(|_| CodecError::InvalidValue {
            field: "sig locked colored output",
            reason: "balance out of range",
        })
    }
}

impl Clone for SigLockedColoredOutput {
    fn clone(&self) -> Self {
        Self {
            id: RwLock::new(self.id()),
            balances: self.balances.clone(),
            address: self.address,
        }
    }
}

impl PartialEq for SigLockedColoredOutput {
    fn eq(&self, other: &Self) -> bool {
        self.balances == other.balances && self.address == other.address
    }
}

impl Eq for SigLockedColoredOutput {}

impl fmt::Debug for SigLockedColoredOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigLockedColoredOutput")
            .field("id", &self.id())
            .field("balances", &self.balances)
            .field("address", &self.address)
            .finish()
    }
}

/// Any of the supported output kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    SigLockedSingle(SigLockedSingleOutput),
    SigLockedColored(SigLockedColoredOutput),
    Alias(AliasOutput),
    ExtendedLocked(ExtendedLockedOutput),
}

impl Output {
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::SigLockedSingle(_) => OutputKind::SigLockedSingle,
            Self::SigLockedColored(_) => OutputKind::SigLockedColored,
            Self::Alias(_) => OutputKind::Alias,
            Self::ExtendedLocked(_) => OutputKind::ExtendedLocked,
        }
    }

    pub fn id(&self) -> OutputId {
        match self {
            Self::SigLockedSingle(output) => output.id(),
            Self::SigLockedColored(output) => output.id(),
            Self::Alias(output) => output.id(),
            Self::ExtendedLocked(output) => output.id(),
        }
    }

    /// Assign the output's id once the enclosing transaction id is known.
    pub fn set_id(&self, id: OutputId) {
        match self {
            Self::SigLockedSingle(output) => output.set_id(id),
            Self::SigLockedColored(output) => output.set_id(id),
            Self::Alias(output) => output.set_id(id),
            Self::ExtendedLocked(output) => output.set_id(id),
        }
    }

    /// The funds on the output. Single outputs materialize their balance as
    /// an uncolored entry.
    pub fn balances(&self) -> ColoredBalances {
        match self {
            Self::SigLockedSingle(output) => {
                ColoredBalances::new([(Color::IOTA, output.balance())])
            }
            Self::SigLockedColored(output) => output.balances().clone(),
            Self::Alias(output) => output.balances().clone(),
            Self::ExtendedLocked(output) => output.balances().clone(),
        }
    }

    /// The address the output is locked to. For alias outputs this is the
    /// alias address itself.
    pub fn address(&self) -> Address {
        match self {
            Self::SigLockedSingle(output) => *output.address(),
            Self::SigLockedColored(output) => *output.address(),
            Self::Alias(output) => Address::Alias(output.alias_address()),
            Self::ExtendedLocked(output) => *output.address(),
        }
    }

    /// An input spending this output. Requires the id to have been assigned.
    pub fn input(&self) -> Result<Input, LedgerError> {
        let id = self.id();
        if id.is_empty() {
            return Err(LedgerError::OutputIdUnset);
        }
        Ok(Input::Utxo(UtxoInput::new(id)))
    }

    /// Whether the transaction and the given unlock block are allowed to
    /// spend this output. `inputs` are the outputs consumed by `tx`, in input
    /// order.
    pub fn unlock_valid(
        &self,
        tx: &Transaction,
        unlock_block: &UnlockBlock,
        inputs: &[Output],
    ) -> Result<bool, LedgerError> {
        match self {
            Self::SigLockedSingle(output) => {
                sig_locked_unlock_valid(output.address(), tx, unlock_block, inputs)
            }
            Self::SigLockedColored(output) => {
                sig_locked_unlock_valid(output.address(), tx, unlock_block, inputs)
            }
            Self::Alias(output) => output.unlock_valid(tx, unlock_block, inputs),
            Self::ExtendedLocked(output) => output.unlock_valid(tx, unlock_block, inputs),
        }
    }

    /// A copy with the mint placeholder color resolved against this output's
    /// id; origin aliases also get their alias address assigned.
    pub fn update_minting_color(&self) -> Output {
        match self {
            Self::SigLockedSingle(output) => Self::SigLockedSingle(output.clone()),
            Self::SigLockedColored(output) => Self::SigLockedColored(output.update_minting_color()),
            Self::Alias(output) => Self::Alias(output.update_minting_color()),
            Self::ExtendedLocked(output) => Self::ExtendedLocked(output.update_minting_color()),
        }
    }
}

fn sig_locked_unlock_valid(
    address: &Address,
    tx: &Transaction,
    unlock_block: &UnlockBlock,
    inputs: &[Output],
) -> Result<bool, LedgerError> {
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

impl Encode for Output {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(self.kind() as u8);
        match self {
            Self::SigLockedSingle(output) => output.encode_body(w),
            Self::SigLockedColored(output) => output.encode_body(w),
            Self::Alias(output) => output.encode_body(w),
            Self::ExtendedLocked(output) => output.encode_body(w),
        }
    }
}

impl Decode for Output {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let tag = r.read_u8()?;
        match tag {
            0 => Ok(Self::SigLockedSingle(SigLockedSingleOutput::decode_body(r)?)),
            1 => Ok(Self::SigLockedColored(SigLockedColoredOutput::decode_body(r)?)),
            2 => Ok(Self::Alias(AliasOutput::decode_body(r)?)),
            3 => Ok(Self::ExtendedLocked(ExtendedLockedOutput::decode_body(r)?)),
            tag => Err(CodecError::UnknownTag {
                kind: "output",
                tag,
            }),
        }
    }
}

/// A canonical collection of outputs: duplicates removed by serialized form,
/// remaining outputs sorted ascending by those bytes, 1 to 127 entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outputs(Vec<Output>);

impl Outputs {
    pub fn new(outputs: Vec<Output>) -> Result<Self, LedgerError> {
        let mut seen = HashSet::new();
        let mut keyed: Vec<(Vec<u8>, Output)> = Vec::with_capacity(outputs.len());
        for output in outputs {
            let bytes = output.to_bytes();
            if seen.insert(bytes.clone()) {
                keyed.push((bytes, output));
            }
        }
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

        let count = keyed.len();
        if !(MIN_OUTPUT_COUNT..=MAX_OUTPUT_COUNT).contains(&count) {
            return Err(LedgerError::OutputCountOutOfRange(count));
        }
        Ok(Self(keyed.into_iter().map(|(_, output)| output).collect()))
    }

    /// Inputs referencing every output. Requires assigned output ids.
    pub fn inputs(&self) -> Result<Inputs, LedgerError> {
        let inputs = self
            .0
            .iter()
            .map(Output::input)
            .collect::<Result<Vec<_>, _>>()?;
        Inputs::new(inputs)
    }

    pub fn get(&self, index: usize) -> Option<&Output> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Output> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Output] {
        &self.0
    }
}

impl Encode for Outputs {
    fn encode(&self, w: &mut Writer) {
        w.write_u16(self.0.len() as u16);
        for output in &self.0 {
            output.encode(w);
        }
    }
}

impl Decode for Outputs {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let count = r.read_u16()? as usize;
        if !(MIN_OUTPUT_COUNT..=MAX_OUTPUT_COUNT).contains(&count) {
            return Err(CodecError::InvalidValue {
                field: "outputs",
                reason: "output count out of range",
            });
        }
        let mut outputs = Vec::with_capacity(count);
        for _ in 0..count {
            outputs.push(Output::decode(r)?);
        }
        Ok(Self(outputs))
    }
}

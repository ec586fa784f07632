//! UTXO transaction core for the weft ledger.
//!
//! A transaction consumes previously created outputs and creates new ones.
//! Outputs come in four kinds with different unlock rules:
//!
//! - [`SigLockedSingleOutput`] — one uncolored balance behind a signature.
//! - [`SigLockedColoredOutput`] — colored balances behind a signature.
//! - [`AliasOutput`] — a chained output whose identity (the alias address)
//!   persists across transactions, with separate state and governance
//!   control.
//! - [`ExtendedLockedOutput`] — colored balances with optional timelock,
//!   fallback address and data payload.
//!
//! ## Module overview
//!
//! - [`color`] — token colors and deterministically ordered colored balances.
//! - [`address`] — ED25519, BLS and alias addresses.
//! - [`signature`] — ED25519 and BLS signatures with address binding.
//! - [`output_id`] — transaction id ‖ output index identifiers.
//! - [`input`] — inputs referencing unspent outputs.
//! - [`output`] — the output kinds and canonical output collections.
//! - [`alias`] — the alias output and its transition rules.
//! - [`extended`] — the extended locked output.
//! - [`unlock`] — unlock blocks authorizing input spends.
//! - [`transaction`] — essence, unlock blocks and the lazy transaction id.
//! - [`validation`] — transaction-level balance and unlock checks.
//! - [`error`] — ledger error types.

pub mod address;
pub mod alias;
pub mod color;
pub mod error;
pub mod extended;
pub mod input;
pub mod output;
pub mod output_id;
pub mod signature;
pub mod transaction;
pub mod unlock;
pub mod validation;

pub use address::{Address, AddressKind, AliasAddress, BlsAddress, Ed25519Address};
pub use alias::AliasOutput;
pub use color::{Color, ColoredBalances};
pub use error::LedgerError;
pub use extended::ExtendedLockedOutput;
pub use input::{Input, InputKind, Inputs, UtxoInput, MAX_INPUT_COUNT, MIN_INPUT_COUNT};
pub use output::{
    Output, OutputKind, Outputs, SigLockedColoredOutput, SigLockedSingleOutput,
    DUST_THRESHOLD_ALIAS_IOTA, MAX_OUTPUT_BALANCE, MAX_OUTPUT_COUNT, MAX_OUTPUT_PAYLOAD_SIZE,
    MIN_OUTPUT_BALANCE, MIN_OUTPUT_COUNT,
};
pub use output_id::OutputId;
pub use signature::{BlsSignature, Ed25519Signature, Signature, SignatureKind};
pub use transaction::{Transaction, TransactionEssence};
pub use unlock::{
    AliasUnlockBlock, ReferenceUnlockBlock, SignatureUnlockBlock, UnlockBlock, UnlockBlockKind,
    UnlockBlocks,
};
pub use validation::{balances_valid, unlock_blocks_valid};

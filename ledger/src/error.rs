//! Ledger error types.

use crate::input::{MAX_INPUT_COUNT, MIN_INPUT_COUNT};
use crate::output::{
    DUST_THRESHOLD_ALIAS_IOTA, MAX_OUTPUT_BALANCE, MAX_OUTPUT_COUNT, MAX_OUTPUT_PAYLOAD_SIZE,
    MIN_OUTPUT_BALANCE, MIN_OUTPUT_COUNT,
};
use thiserror::Error;
use weft_codec::CodecError;

/// Errors returned by the UTXO core. Always surfaced to the caller; nothing
/// is recovered silently.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("malformed binary: {0}")]
    Codec(#[from] CodecError),

    #[error("invalid unlock: {0}")]
    InvalidUnlock(&'static str),

    #[error("invalid alias transition: {0}")]
    TransitionInvalid(&'static str),

    #[error("two outputs continue the same alias")]
    DuplicateAliasForked,

    #[error("alias balance below the {} IOTA dust threshold", DUST_THRESHOLD_ALIAS_IOTA)]
    DustBelowThreshold,

    #[error("output balance {0} outside [{min}, {max}]", min = MIN_OUTPUT_BALANCE, max = MAX_OUTPUT_BALANCE)]
    BalanceOutOfRange(u64),

    #[error("output count {0} outside [{min}, {max}]", min = MIN_OUTPUT_COUNT, max = MAX_OUTPUT_COUNT)]
    OutputCountOutOfRange(usize),

    #[error("input count {0} outside [{min}, {max}]", min = MIN_INPUT_COUNT, max = MAX_INPUT_COUNT)]
    InputCountOutOfRange(usize),

    #[error("output index {0} exceeds the maximum of {max}", max = MAX_OUTPUT_COUNT - 1)]
    OutputIndexOutOfRange(u16),

    #[error("payload of {0} bytes exceeds the {max} byte limit", max = MAX_OUTPUT_PAYLOAD_SIZE)]
    PayloadTooLarge(usize),

    #[error("output has no id assigned yet")]
    OutputIdUnset,
}

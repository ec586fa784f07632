//! Transaction-level validation.
//!
//! The per-output unlock checks assume structural sanity that only the whole
//! transaction can provide: every input has an unlock block, reference
//! blocks resolve to real signatures, and alias unlock blocks do not form
//! reference cycles (a cycle would let every member unlock without anyone
//! providing a signature).

use crate::color::Color;
use crate::error::LedgerError;
use crate::output::Output;
use crate::transaction::Transaction;
use crate::unlock::UnlockBlock;
use std::collections::{BTreeMap, HashSet};
use tracing::trace;

/// Whether the created outputs preserve the consumed balances.
///
/// The aggregate totals must match, and no color other than the base token
/// and the mint placeholder may appear out of nowhere. IOTA may be recolored
/// (via the mint placeholder) and colored tokens may be melted back to IOTA.
pub fn balances_valid(consumed: &[Output], created: &[Output]) -> bool {
    let mut consumed_coins: BTreeMap<Color, u128> = BTreeMap::new();
    for output in consumed {
        for (color, balance) in output.balances().iter() {
            *consumed_coins.entry(*color).or_insert(0) += u128::from(balance);
        }
    }

    let mut created_coins: BTreeMap<Color, u128> = BTreeMap::new();
    for output in created {
        for (color, balance) in output.balances().iter() {
            *created_coins.entry(*color).or_insert(0) += u128::from(balance);
        }
    }

    let consumed_total: u128 = consumed_coins.values().sum();
    let created_total: u128 = created_coins.values().sum();
    if consumed_total != created_total {
        return false;
    }

    for (color, created_amount) in &created_coins {
        if *color == Color::IOTA || *color == Color::MINT {
            continue;
        }
        if consumed_coins.get(color).copied().unwrap_or(0) < *created_amount {
            return false;
        }
    }
    true
}

/// Whether the transaction's unlock blocks authorize spending `inputs` (the
/// consumed outputs, in input order).
///
/// Structural checks run first: block count parity, reference blocks
/// pointing back at earlier signature blocks, and acyclic alias-unlock
/// chains. Only then is each input's own unlock rule evaluated, with
/// reference blocks resolved to their targets.
pub fn unlock_blocks_valid(tx: &Transaction, inputs: &[Output]) -> Result<bool, LedgerError> {
    let blocks = tx.unlock_blocks();
    if blocks.len() != inputs.len() {
        return Err(LedgerError::InvalidUnlock(
            "unlock block count must match input count",
        ));
    }

    for (index, block) in blocks.iter().enumerate() {
        match block {
            UnlockBlock::Reference(reference) => {
                let referenced = reference.referenced_index() as usize;
                if referenced >= index {
                    return Err(LedgerError::InvalidUnlock(
                        "reference unlock block must point at an earlier block",
                    ));
                }
                if !matches!(blocks.as_slice()[referenced], UnlockBlock::Signature(_)) {
                    return Err(LedgerError::InvalidUnlock(
                        "reference unlock block must reference a signature block",
                    ));
                }
            }
            UnlockBlock::Alias(_) => {
                check_alias_chain_acyclic(blocks.as_slice(), index)?;
            }
            UnlockBlock::Signature(_) => {}
        }
    }

    for (index, consumed) in inputs.iter().enumerate() {
        let block = match &blocks.as_slice()[index] {
            UnlockBlock::Reference(reference) => {
                &blocks.as_slice()[reference.referenced_index() as usize]
            }
            block => block,
        };
        trace!(input = index, kind = ?consumed.kind(), "checking unlock");
        if !consumed.unlock_valid(tx, block, inputs)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Follow the alias-unlock references starting at `start` and fail on a
/// cycle or an out-of-range reference.
fn check_alias_chain_acyclic(blocks: &[UnlockBlock], start: usize) -> Result<(), LedgerError> {
    let mut visited = HashSet::new();
    let mut current = start;
    while let UnlockBlock::Alias(alias_block) = &blocks[current] {
        if !visited.insert(current) {
            return Err(LedgerError::InvalidUnlock("circular alias unlock chain"));
        }
        let next = alias_block.alias_input_index() as usize;
        if next >= blocks.len() {
            return Err(LedgerError::InvalidUnlock(
                "alias reference index out of bounds",
            ));
        }
        current = next;
    }
    Ok(())
}

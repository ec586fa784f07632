//! End-to-end unlock validation across whole transactions.

use weft_codec::{Decode, Encode};
use weft_crypto::keypair_from_seed;
use weft_ledger::{
    balances_valid, unlock_blocks_valid, Address, AliasOutput, AliasUnlockBlock, Color,
    ColoredBalances, Ed25519Address, Ed25519Signature, ExtendedLockedOutput, Inputs, LedgerError,
    Output, OutputId, Outputs, ReferenceUnlockBlock, SigLockedSingleOutput, Signature,
    SignatureUnlockBlock, Transaction, TransactionEssence, UnlockBlock, UnlockBlocks,
    DUST_THRESHOLD_ALIAS_IOTA,
};
use weft_types::{KeyPair, NodeId, Timestamp, TransactionId};

fn keypair(seed: u8) -> KeyPair {
    keypair_from_seed(&[seed; 32])
}

fn ed25519_address(kp: &KeyPair) -> Address {
    Address::Ed25519(Ed25519Address::new(&kp.public))
}

fn output_id(tx_byte: u8, index: u16) -> OutputId {
    OutputId::new(TransactionId::new([tx_byte; 32]), index).unwrap()
}

fn dust_balances() -> ColoredBalances {
    ColoredBalances::new([(Color::IOTA, DUST_THRESHOLD_ALIAS_IOTA)])
}

fn essence_spending(consumed: &[Output], created: Vec<Output>, timestamp: Timestamp) -> TransactionEssence {
    let inputs = consumed
        .iter()
        .map(|output| output.input().unwrap())
        .collect();
    TransactionEssence::new(
        0,
        timestamp,
        NodeId::new([7; 32]),
        NodeId::new([8; 32]),
        Inputs::new(inputs).unwrap(),
        Outputs::new(created).unwrap(),
    )
}

fn sign_essence(essence: &TransactionEssence, kp: &KeyPair) -> UnlockBlock {
    UnlockBlock::Signature(SignatureUnlockBlock::new(Signature::Ed25519(
        Ed25519Signature::sign(&essence.to_bytes(), kp),
    )))
}

fn ts(secs: i64) -> Timestamp {
    Timestamp::from_unix_secs(secs)
}

#[test]
fn signature_unlock_spends_single_output() {
    let owner = keypair(1);
    let receiver = keypair(2);

    let consumed = Output::SigLockedSingle(
        SigLockedSingleOutput::new(1000, ed25519_address(&owner)).unwrap(),
    );
    consumed.set_id(output_id(1, 0));

    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::SigLockedSingle(
            SigLockedSingleOutput::new(1000, ed25519_address(&receiver)).unwrap(),
        )],
        ts(1_600_000_000),
    );
    let unlock = sign_essence(&essence, &owner);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));

    let inputs = vec![consumed];
    assert!(inputs[0]
        .unlock_valid(&tx, tx.unlock_blocks().get(0).unwrap(), &inputs)
        .unwrap());
    assert!(unlock_blocks_valid(&tx, &inputs).unwrap());
}

#[test]
fn flipped_signature_bit_invalidates_unlock() {
    let owner = keypair(1);

    let consumed = Output::SigLockedSingle(
        SigLockedSingleOutput::new(1000, ed25519_address(&owner)).unwrap(),
    );
    consumed.set_id(output_id(1, 0));

    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::SigLockedSingle(
            SigLockedSingleOutput::new(1000, ed25519_address(&owner)).unwrap(),
        )],
        ts(1_600_000_000),
    );

    let mut signature = Ed25519Signature::sign(&essence.to_bytes(), &owner);
    signature.signature.0[17] ^= 0x01;
    let unlock = UnlockBlock::Signature(SignatureUnlockBlock::new(Signature::Ed25519(signature)));
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));

    let inputs = vec![consumed];
    assert!(!inputs[0]
        .unlock_valid(&tx, tx.unlock_blocks().get(0).unwrap(), &inputs)
        .unwrap());
    assert!(!unlock_blocks_valid(&tx, &inputs).unwrap());
}

#[test]
fn wrong_key_invalidates_unlock() {
    let owner = keypair(1);
    let thief = keypair(2);

    let consumed = Output::SigLockedSingle(
        SigLockedSingleOutput::new(1000, ed25519_address(&owner)).unwrap(),
    );
    consumed.set_id(output_id(1, 0));

    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::SigLockedSingle(
            SigLockedSingleOutput::new(1000, ed25519_address(&thief)).unwrap(),
        )],
        ts(1_600_000_000),
    );
    let unlock = sign_essence(&essence, &thief);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));

    let inputs = vec![consumed];
    assert!(!unlock_blocks_valid(&tx, &inputs).unwrap());
}

/// Spending alias state: the chained successor increments the state index by
/// exactly one and the state key signs.
#[test]
fn alias_state_transition_unlock() {
    let state_kp = keypair(10);

    let mut alias = AliasOutput::new_mint(dust_balances(), ed25519_address(&state_kp)).unwrap();
    alias.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-1"));
    let consumed = Output::Alias(alias.clone());
    consumed.set_id(output_id(1, 0));

    let successor = alias.next_state();
    assert_eq!(successor.state_index(), 1);

    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::Alias(successor)],
        ts(1_600_000_000),
    );
    let unlock = sign_essence(&essence, &state_kp);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));

    let inputs = vec![consumed];
    assert!(unlock_blocks_valid(&tx, &inputs).unwrap());
}

#[test]
fn alias_state_index_skip_is_rejected() {
    let state_kp = keypair(10);

    let mut alias = AliasOutput::new_mint(dust_balances(), ed25519_address(&state_kp)).unwrap();
    alias.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-1"));
    let consumed = Output::Alias(alias.clone());
    consumed.set_id(output_id(1, 0));

    let mut successor = alias.next_state();
    successor.set_state_index(2);

    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::Alias(successor)],
        ts(1_600_000_000),
    );
    let unlock = sign_essence(&essence, &state_kp);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));

    let inputs = vec![consumed];
    assert!(matches!(
        unlock_blocks_valid(&tx, &inputs),
        Err(LedgerError::TransitionInvalid(_))
    ));
}

#[test]
fn alias_governance_update_requires_governing_key() {
    let state_kp = keypair(10);
    let governor_kp = keypair(11);

    let mut alias = AliasOutput::new_mint(dust_balances(), ed25519_address(&state_kp)).unwrap();
    alias.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-1"));
    alias.set_governing_address(Some(ed25519_address(&governor_kp)));
    let consumed = Output::Alias(alias.clone());
    consumed.set_id(output_id(1, 0));

    let mut successor = alias.next_governance();
    successor.set_governance_metadata(b"new rules".to_vec()).unwrap();

    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::Alias(successor)],
        ts(1_600_000_000),
    );

    // state key cannot authorize a governance update
    let state_signed = sign_essence(&essence, &state_kp);
    let tx = Transaction::new(essence.clone(), UnlockBlocks::new(vec![state_signed]));
    let inputs = vec![consumed.clone()];
    assert!(matches!(
        unlock_blocks_valid(&tx, &inputs),
        Err(LedgerError::InvalidUnlock(_))
    ));

    // the governing key can
    let governor_signed = sign_essence(&essence, &governor_kp);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![governor_signed]));
    assert!(unlock_blocks_valid(&tx, &inputs).unwrap());
}

#[test]
fn alias_destruction_requires_dust_minimum() {
    let state_kp = keypair(10);

    let mut alias = AliasOutput::new_mint(dust_balances(), ed25519_address(&state_kp)).unwrap();
    alias.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-1"));
    let consumed = Output::Alias(alias.clone());
    consumed.set_id(output_id(1, 0));

    // no chained successor: the alias is destroyed, dust moves on
    let receiver = keypair(12);
    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::SigLockedSingle(
            SigLockedSingleOutput::new(DUST_THRESHOLD_ALIAS_IOTA, ed25519_address(&receiver))
                .unwrap(),
        )],
        ts(1_600_000_000),
    );
    let unlock = sign_essence(&essence, &state_kp); // self-governed: state key governs
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));
    let inputs = vec![consumed];
    assert!(unlock_blocks_valid(&tx, &inputs).unwrap());

    // holding more than the dust minimum blocks destruction
    let mut rich = AliasOutput::new_mint(
        ColoredBalances::new([(Color::IOTA, 5000)]),
        ed25519_address(&state_kp),
    )
    .unwrap();
    rich.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-2"));
    let consumed = Output::Alias(rich);
    consumed.set_id(output_id(2, 0));

    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::SigLockedSingle(
            SigLockedSingleOutput::new(5000, ed25519_address(&receiver)).unwrap(),
        )],
        ts(1_600_000_000),
    );
    let unlock = sign_essence(&essence, &state_kp);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));
    let inputs = vec![consumed];
    assert!(matches!(
        unlock_blocks_valid(&tx, &inputs),
        Err(LedgerError::TransitionInvalid(_))
    ));
}

#[test]
fn forked_alias_chain_is_rejected() {
    let state_kp = keypair(10);

    let mut alias = AliasOutput::new_mint(dust_balances(), ed25519_address(&state_kp)).unwrap();
    alias.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-1"));
    let consumed = Output::Alias(alias.clone());
    consumed.set_id(output_id(1, 0));

    // two successors carry the same alias address
    let one = alias.next_state();
    let mut two = alias.next_state();
    two.set_state_data(b"diverged".to_vec()).unwrap();

    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::Alias(one), Output::Alias(two)],
        ts(1_600_000_000),
    );
    let unlock = sign_essence(&essence, &state_kp);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));

    let inputs = vec![consumed];
    assert!(matches!(
        unlock_blocks_valid(&tx, &inputs),
        Err(LedgerError::DuplicateAliasForked)
    ));
}

/// An output locked to an alias address opens when the alias
/// state-transitions in the same transaction.
#[test]
fn alias_reference_unlocks_sig_locked_output() {
    let state_kp = keypair(10);
    let receiver = keypair(12);

    let mut alias = AliasOutput::new_mint(dust_balances(), ed25519_address(&state_kp)).unwrap();
    alias.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-1"));
    let alias_input = Output::Alias(alias.clone());
    alias_input.set_id(output_id(1, 0));

    let locked_to_alias = Output::SigLockedSingle(
        SigLockedSingleOutput::new(1000, Address::Alias(alias.alias_address())).unwrap(),
    );
    locked_to_alias.set_id(output_id(2, 0));

    let consumed = vec![alias_input, locked_to_alias];
    let essence = essence_spending(
        &consumed,
        vec![
            Output::Alias(alias.next_state()),
            Output::SigLockedSingle(
                SigLockedSingleOutput::new(1000, ed25519_address(&receiver)).unwrap(),
            ),
        ],
        ts(1_600_000_000),
    );
    let unlock_blocks = UnlockBlocks::new(vec![
        sign_essence(&essence, &state_kp),
        UnlockBlock::Alias(AliasUnlockBlock::new(0)),
    ]);
    let tx = Transaction::new(essence, unlock_blocks);

    assert!(unlock_blocks_valid(&tx, &consumed).unwrap());
}

#[test]
fn governance_updated_alias_does_not_unlock_references() {
    let state_kp = keypair(10);

    let mut alias = AliasOutput::new_mint(dust_balances(), ed25519_address(&state_kp)).unwrap();
    alias.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-1"));
    let alias_input = Output::Alias(alias.clone());
    alias_input.set_id(output_id(1, 0));

    let locked_to_alias = Output::SigLockedSingle(
        SigLockedSingleOutput::new(1000, Address::Alias(alias.alias_address())).unwrap(),
    );
    locked_to_alias.set_id(output_id(2, 0));

    let consumed = vec![alias_input, locked_to_alias];
    // the alias is governance-updated, which must not open referenced funds
    let essence = essence_spending(
        &consumed,
        vec![
            Output::Alias(alias.next_governance()),
            Output::SigLockedSingle(
                SigLockedSingleOutput::new(1000, ed25519_address(&state_kp)).unwrap(),
            ),
        ],
        ts(1_600_000_000),
    );
    let unlock_blocks = UnlockBlocks::new(vec![
        sign_essence(&essence, &state_kp),
        UnlockBlock::Alias(AliasUnlockBlock::new(0)),
    ]);
    let tx = Transaction::new(essence, unlock_blocks);

    assert!(!unlock_blocks_valid(&tx, &consumed).unwrap());
}

#[test]
fn circular_alias_unlock_chain_is_rejected() {
    let state_kp = keypair(10);

    let mut alias_a = AliasOutput::new_mint(dust_balances(), ed25519_address(&state_kp)).unwrap();
    alias_a.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-a"));
    let input_a = Output::Alias(alias_a.clone());
    input_a.set_id(output_id(1, 0));

    let mut alias_b = AliasOutput::new_mint(dust_balances(), ed25519_address(&state_kp)).unwrap();
    alias_b.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-b"));
    let input_b = Output::Alias(alias_b.clone());
    input_b.set_id(output_id(2, 0));

    let consumed = vec![input_a, input_b];
    let essence = essence_spending(
        &consumed,
        vec![
            Output::Alias(alias_a.next_state()),
            Output::Alias(alias_b.next_state()),
        ],
        ts(1_600_000_000),
    );
    // each alias claims the other unlocks it; nobody signs
    let unlock_blocks = UnlockBlocks::new(vec![
        UnlockBlock::Alias(AliasUnlockBlock::new(1)),
        UnlockBlock::Alias(AliasUnlockBlock::new(0)),
    ]);
    let tx = Transaction::new(essence, unlock_blocks);

    assert!(matches!(
        unlock_blocks_valid(&tx, &consumed),
        Err(LedgerError::InvalidUnlock("circular alias unlock chain"))
    ));
}

#[test]
fn timelocked_extended_output_cannot_be_spent_early() {
    let owner = keypair(20);

    let extended = ExtendedLockedOutput::new(
        ColoredBalances::new([(Color::IOTA, 500)]),
        ed25519_address(&owner),
    )
    .unwrap()
    .with_timelock(ts(2_000_000_000));
    let consumed = Output::ExtendedLocked(extended);
    consumed.set_id(output_id(1, 0));

    let essence = essence_spending(
        std::slice::from_ref(&consumed),
        vec![Output::SigLockedSingle(
            SigLockedSingleOutput::new(500, ed25519_address(&owner)).unwrap(),
        )],
        ts(1_600_000_000), // before the timelock
    );
    let unlock = sign_essence(&essence, &owner);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));

    let inputs = vec![consumed];
    assert!(!unlock_blocks_valid(&tx, &inputs).unwrap());
}

#[test]
fn fallback_address_takes_over_after_deadline() {
    let primary = keypair(20);
    let fallback = keypair(21);

    let extended = ExtendedLockedOutput::new(
        ColoredBalances::new([(Color::IOTA, 500)]),
        ed25519_address(&primary),
    )
    .unwrap()
    .with_fallback(ed25519_address(&fallback), ts(1_500_000_000));
    let consumed = Output::ExtendedLocked(extended);
    consumed.set_id(output_id(1, 0));

    let created = vec![Output::SigLockedSingle(
        SigLockedSingleOutput::new(500, ed25519_address(&fallback)).unwrap(),
    )];
    // past the deadline: only the fallback key works
    let essence = essence_spending(std::slice::from_ref(&consumed), created, ts(1_600_000_000));

    let primary_signed = sign_essence(&essence, &primary);
    let tx = Transaction::new(essence.clone(), UnlockBlocks::new(vec![primary_signed]));
    let inputs = vec![consumed];
    assert!(!unlock_blocks_valid(&tx, &inputs).unwrap());

    let fallback_signed = sign_essence(&essence, &fallback);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![fallback_signed]));
    assert!(unlock_blocks_valid(&tx, &inputs).unwrap());
}

#[test]
fn reference_unlock_block_reuses_signature() {
    let owner = keypair(1);

    let first = Output::SigLockedSingle(
        SigLockedSingleOutput::new(100, ed25519_address(&owner)).unwrap(),
    );
    first.set_id(output_id(1, 0));
    let second = Output::SigLockedSingle(
        SigLockedSingleOutput::new(200, ed25519_address(&owner)).unwrap(),
    );
    second.set_id(output_id(2, 0));

    let consumed = vec![first, second];
    let essence = essence_spending(
        &consumed,
        vec![Output::SigLockedSingle(
            SigLockedSingleOutput::new(300, ed25519_address(&owner)).unwrap(),
        )],
        ts(1_600_000_000),
    );
    let unlock_blocks = UnlockBlocks::new(vec![
        sign_essence(&essence, &owner),
        UnlockBlock::Reference(ReferenceUnlockBlock::new(0)),
    ]);
    let tx = Transaction::new(essence, unlock_blocks);

    assert!(unlock_blocks_valid(&tx, &consumed).unwrap());
}

#[test]
fn forward_reference_is_structurally_invalid() {
    let owner = keypair(1);

    let first = Output::SigLockedSingle(
        SigLockedSingleOutput::new(100, ed25519_address(&owner)).unwrap(),
    );
    first.set_id(output_id(1, 0));
    let second = Output::SigLockedSingle(
        SigLockedSingleOutput::new(200, ed25519_address(&owner)).unwrap(),
    );
    second.set_id(output_id(2, 0));

    let consumed = vec![first, second];
    let essence = essence_spending(
        &consumed,
        vec![Output::SigLockedSingle(
            SigLockedSingleOutput::new(300, ed25519_address(&owner)).unwrap(),
        )],
        ts(1_600_000_000),
    );
    let unlock_blocks = UnlockBlocks::new(vec![
        UnlockBlock::Reference(ReferenceUnlockBlock::new(1)),
        sign_essence(&essence, &owner),
    ]);
    let tx = Transaction::new(essence, unlock_blocks);

    assert!(matches!(
        unlock_blocks_valid(&tx, &consumed),
        Err(LedgerError::InvalidUnlock(_))
    ));
}

#[test]
fn booked_outputs_resolve_every_mint_placeholder() {
    let owner = keypair(1);

    let minting = Output::SigLockedColored(
        weft_ledger::SigLockedColoredOutput::new(
            ColoredBalances::new([(Color::MINT, 400), (Color::IOTA, 100)]),
            ed25519_address(&owner),
        )
        .unwrap(),
    );
    let mut origin_alias = AliasOutput::new_mint(
        ColoredBalances::new([(Color::IOTA, DUST_THRESHOLD_ALIAS_IOTA)]),
        ed25519_address(&owner),
    )
    .unwrap();
    origin_alias.set_state_data(b"genesis state".to_vec()).unwrap();

    let input = Output::SigLockedSingle(
        SigLockedSingleOutput::new(600, ed25519_address(&owner)).unwrap(),
    );
    input.set_id(output_id(1, 0));

    let essence = essence_spending(
        std::slice::from_ref(&input),
        vec![minting, Output::Alias(origin_alias)],
        ts(1_600_000_000),
    );
    let unlock = sign_essence(&essence, &owner);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));

    let booked = tx.booked_outputs().unwrap();
    for output in &booked {
        assert_eq!(output.balances().get(&Color::MINT), None);
        assert!(!output.id().is_empty());
        assert_eq!(output.id().transaction_id(), tx.id());
    }

    // the freshly minted alias derives its address from its output id
    let alias = booked
        .iter()
        .find_map(|output| match output {
            Output::Alias(alias) => Some(alias),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        alias.alias_address(),
        weft_ledger::AliasAddress::from_seed(alias.id().as_bytes())
    );
}

#[test]
fn transaction_roundtrip_preserves_id_with_rich_outputs() {
    let owner = keypair(1);
    let governor = keypair(2);

    let mut alias = AliasOutput::new_mint(dust_balances(), ed25519_address(&owner)).unwrap();
    alias.set_alias_address(weft_ledger::AliasAddress::from_seed(b"alias-1"));
    alias.set_governing_address(Some(ed25519_address(&governor)));
    alias.set_state_data(b"state".to_vec()).unwrap();

    let mut extended = ExtendedLockedOutput::new(
        ColoredBalances::new([(Color::IOTA, 400), (Color::new([3; 32]), 20)]),
        ed25519_address(&owner),
    )
    .unwrap()
    .with_fallback(ed25519_address(&governor), ts(1_700_000_000))
    .with_timelock(ts(1_650_000_000));
    extended.set_payload(b"metadata".to_vec()).unwrap();

    let input = Output::SigLockedSingle(
        SigLockedSingleOutput::new(520, ed25519_address(&owner)).unwrap(),
    );
    input.set_id(output_id(4, 2));

    let mut essence = essence_spending(
        std::slice::from_ref(&input),
        vec![Output::Alias(alias), Output::ExtendedLocked(extended)],
        ts(1_600_000_000),
    );
    essence.set_payload(b"arbitrary data".to_vec());
    let unlock = sign_essence(&essence, &owner);
    let tx = Transaction::new(essence, UnlockBlocks::new(vec![unlock]));

    let decoded = Transaction::from_bytes(&tx.to_bytes()).unwrap();
    assert_eq!(decoded.id(), tx.id());
    assert_eq!(decoded, tx);
}

#[test]
fn balances_check_whole_transaction() {
    let owner = keypair(1);
    let consumed = vec![Output::SigLockedSingle(
        SigLockedSingleOutput::new(1000, ed25519_address(&owner)).unwrap(),
    )];
    let created_ok = vec![Output::SigLockedSingle(
        SigLockedSingleOutput::new(1000, ed25519_address(&owner)).unwrap(),
    )];
    let created_bad = vec![Output::SigLockedSingle(
        SigLockedSingleOutput::new(999, ed25519_address(&owner)).unwrap(),
    )];
    assert!(balances_valid(&consumed, &created_ok));
    assert!(!balances_valid(&consumed, &created_bad));
}

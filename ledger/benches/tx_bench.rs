use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weft_codec::{Decode, Encode};
use weft_crypto::keypair_from_seed;
use weft_ledger::{
    Address, Ed25519Address, Ed25519Signature, Input, Inputs, Output, OutputId, Outputs,
    SigLockedSingleOutput, Signature, SignatureUnlockBlock, Transaction, TransactionEssence,
    UnlockBlock, UnlockBlocks, UtxoInput,
};
use weft_types::{NodeId, Timestamp, TransactionId};

fn sample_transaction() -> Transaction {
    let kp = keypair_from_seed(&[1u8; 32]);
    let address = Address::Ed25519(Ed25519Address::new(&kp.public));

    let inputs: Vec<Input> = (0..4)
        .map(|i| {
            Input::Utxo(UtxoInput::new(
                OutputId::new(TransactionId::new([i; 32]), 0).unwrap(),
            ))
        })
        .collect();
    let outputs: Vec<Output> = (1u64..5)
        .map(|i| Output::SigLockedSingle(SigLockedSingleOutput::new(i * 250, address).unwrap()))
        .collect();

    let essence = TransactionEssence::new(
        0,
        Timestamp::from_unix_secs(1_600_000_000),
        NodeId::new([7; 32]),
        NodeId::new([8; 32]),
        Inputs::new(inputs).unwrap(),
        Outputs::new(outputs).unwrap(),
    );
    let signature = Signature::Ed25519(Ed25519Signature::sign(&essence.to_bytes(), &kp));
    let blocks = (0..4)
        .map(|_| UnlockBlock::Signature(SignatureUnlockBlock::new(signature)))
        .collect();
    Transaction::new(essence, UnlockBlocks::new(blocks))
}

fn encode_bench(c: &mut Criterion) {
    let tx = sample_transaction();
    c.bench_function("transaction_encode", |b| b.iter(|| black_box(&tx).to_bytes()));
}

fn decode_bench(c: &mut Criterion) {
    let bytes = sample_transaction().to_bytes();
    c.bench_function("transaction_decode", |b| {
        b.iter(|| Transaction::from_bytes(black_box(&bytes)).unwrap())
    });
}

fn id_bench(c: &mut Criterion) {
    c.bench_function("transaction_id", |b| {
        b.iter_batched(
            sample_transaction,
            |tx| tx.id(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, encode_bench, decode_bench, id_bench);
criterion_main!(benches);

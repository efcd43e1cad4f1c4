// Freeze & signing benchmarks for the Helix SDK.
//
// Covers Ed25519 key generation, raw signing and verification, freezing a
// transaction across a growing node list, and signing every per-node body.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use helix_sdk::crypto::{sha384, PrivateKey};
use helix_sdk::ids::{AccountId, Timestamp, TokenId, TransactionId};
use helix_sdk::proto::SignatureMap;
use helix_sdk::transaction::{TokenAssociate, Transaction, Transfer};

const NODE_COUNTS: [u64; 3] = [1, 4, 16];

fn draft(nodes: u64) -> Transaction<TokenAssociate> {
    let payer = AccountId::new(0, 0, 1001);
    Transaction::new(
        TokenAssociate::new()
            .account_id(payer)
            .token_ids((0..8).map(|n| TokenId::new(0, 0, 5000 + n))),
    )
    .transaction_id(TransactionId::with_valid_start(
        payer,
        Timestamp::new(1_700_000_000, 0),
    ))
    .node_account_ids((0..nodes).map(|n| AccountId::new(0, 0, 3 + n)))
    .valid_duration(Duration::from_secs(120))
    .memo("bench")
}

fn bench_key_generation(c: &mut Criterion) {
    c.bench_function("ed25519/key_generate", |b| {
        b.iter(PrivateKey::generate);
    });
}

fn bench_sign_message(c: &mut Criterion) {
    let key = PrivateKey::generate();
    let message = b"associate 0.0.5005 with 0.0.1001; node=0.0.3";

    c.bench_function("ed25519/sign_message", |b| {
        b.iter(|| key.sign(message));
    });
}

fn bench_verify_signature(c: &mut Criterion) {
    let key = PrivateKey::generate();
    let message = b"associate 0.0.5005 with 0.0.1001; node=0.0.3";
    let signature = key.sign(message);
    let public_key = key.public_key();

    c.bench_function("ed25519/verify_signature", |b| {
        b.iter(|| public_key.verify(message, &signature));
    });
}

fn bench_transaction_hash(c: &mut Criterion) {
    let frozen = draft(1).freeze().expect("freeze");
    frozen.sign(&PrivateKey::generate()).expect("sign");
    let bytes = frozen.to_bytes().expect("encode");

    c.bench_function("sha384/transaction_hash", |b| {
        b.iter(|| sha384(&bytes));
    });
}

fn bench_freeze(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction/freeze");

    for nodes in NODE_COUNTS {
        group.throughput(Throughput::Elements(nodes));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &nodes, |b, &nodes| {
            b.iter_batched(
                || draft(nodes),
                |tx| tx.freeze().expect("freeze"),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_sign_all_nodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction/sign_all_nodes");
    let key = PrivateKey::generate();

    for nodes in NODE_COUNTS {
        group.throughput(Throughput::Elements(nodes));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &nodes, |b, &nodes| {
            b.iter_batched(
                || draft(nodes).freeze().expect("freeze"),
                |frozen| {
                    frozen.sign(&key).expect("sign");
                    frozen
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_signature_map_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("signature_map/insert");
    let message = b"body";

    for signers in [1usize, 8, 32] {
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = (0..signers)
            .map(|_| {
                let key = PrivateKey::generate();
                (
                    key.public_key().as_bytes().to_vec(),
                    key.sign(message).into_bytes(),
                )
            })
            .collect();

        group.throughput(Throughput::Elements(signers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(signers), &pairs, |b, pairs| {
            b.iter(|| {
                let mut map = SignatureMap::new();
                for (prefix, signature) in pairs {
                    map.insert(prefix.clone(), signature.clone());
                }
                map
            });
        });
    }

    group.finish();
}

fn bench_transfer_freeze(c: &mut Criterion) {
    let payer = AccountId::new(0, 0, 1001);
    c.bench_function("transaction/freeze_transfer_10_legs", |b| {
        b.iter_batched(
            || {
                let mut transfer = Transfer::new().hbar_transfer(payer, -90);
                for n in 0..9 {
                    transfer = transfer.hbar_transfer(AccountId::new(0, 0, 2000 + n), 10);
                }
                Transaction::new(transfer)
                    .transaction_id(TransactionId::with_valid_start(
                        payer,
                        Timestamp::new(1_700_000_000, 0),
                    ))
                    .node_account_ids([AccountId::new(0, 0, 3)])
            },
            |tx| tx.freeze().expect("freeze"),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_key_generation,
    bench_sign_message,
    bench_verify_signature,
    bench_transaction_hash,
    bench_freeze,
    bench_sign_all_nodes,
    bench_signature_map_insert,
    bench_transfer_freeze,
);
criterion_main!(benches);

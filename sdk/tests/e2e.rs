//! End-to-end tests for the transaction engine.
//!
//! Each test walks a transaction through draft, freeze, signing and, where
//! relevant, execution against the scripted in-memory network. They pin
//! down the lifecycle guarantees: frozen bytes never move, per-node bodies
//! differ only in the node id, signature maps are canonical, and the
//! executor's outcomes match what the network said.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use helix_sdk::config::ExecutionConfig;
use helix_sdk::crypto::{FnSigner, PrivateKey, Signer, SignerError};
use helix_sdk::ids::{AccountId, ScheduleId, Timestamp, TokenId, TransactionId};
use helix_sdk::network::{Executor, MethodRegistry, MockNetwork};
use helix_sdk::proto::{Status, TransactionBody};
use helix_sdk::transaction::{
    FrozenTransaction, Phase, ScheduleSign, SharedTransaction, TokenAssociate, Transaction,
    Transfer,
};
use helix_sdk::Error;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const VALID_START: Timestamp = Timestamp::new(1_700_000_000, 0);

fn account(num: u64) -> AccountId {
    AccountId::new(0, 0, num)
}

fn payer() -> AccountId {
    account(1001)
}

fn nodes() -> [AccountId; 3] {
    [account(3), account(4), account(5)]
}

fn associate_draft() -> Transaction<TokenAssociate> {
    Transaction::new(
        TokenAssociate::new()
            .account_id(payer())
            .token_ids([TokenId::new(0, 0, 5005), TokenId::new(0, 0, 5006)]),
    )
    .transaction_id(TransactionId::with_valid_start(payer(), VALID_START))
    .node_account_ids(nodes())
    .max_transaction_fee(150_000_000)
    .valid_duration(Duration::from_secs(120))
    .memo("e2e")
}

/// Wraps a key and counts how often it is asked to sign.
fn counting_signer(key: PrivateKey, counter: Arc<AtomicUsize>) -> impl Signer {
    let public_key = key.public_key();
    FnSigner::new(public_key, move |bytes| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(key.sign(bytes))
    })
}

fn fast_config() -> ExecutionConfig {
    ExecutionConfig {
        min_backoff_ms: 50,
        max_backoff_ms: 400,
        jitter_ms: 10,
        ..ExecutionConfig::default()
    }
}

fn executor_at(net: &Arc<MockNetwork>, now: Timestamp) -> Executor {
    Executor::new(net.clone(), MethodRegistry::standard(), fast_config())
        .unwrap()
        .with_clock(move || now)
}

// ---------------------------------------------------------------------------
// Freeze guarantees
// ---------------------------------------------------------------------------

#[test]
fn setters_after_freeze_fail_and_leave_bytes_unchanged() {
    let shared = SharedTransaction::new(associate_draft());
    let frozen = shared.freeze().unwrap();
    let before: Vec<Vec<u8>> = frozen
        .messages()
        .iter()
        .map(|m| m.body_bytes().to_vec())
        .collect();

    let attempts = [
        shared.set_memo("changed").map(|_| ()),
        shared.set_max_transaction_fee(1).map(|_| ()),
        shared.set_valid_duration(Duration::from_secs(30)).map(|_| ()),
        shared.set_node_account_ids([account(9)]).map(|_| ()),
        shared
            .set_transaction_id(TransactionId::with_valid_start(account(2), VALID_START))
            .map(|_| ()),
        shared
            .update_kind(|k| k.add_token_id(TokenId::new(0, 0, 1)))
            .map(|_| ()),
    ];
    for result in attempts {
        assert!(matches!(result, Err(Error::FrozenState { .. })));
    }

    let after: Vec<Vec<u8>> = shared
        .frozen()
        .unwrap()
        .messages()
        .iter()
        .map(|m| m.body_bytes().to_vec())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn per_node_bodies_differ_only_in_node_id() {
    let frozen = associate_draft().freeze().unwrap();
    let messages = frozen.messages();
    assert_eq!(messages.len(), 3);

    for a in messages {
        for b in messages {
            let bytes_a = a.body_bytes();
            let bytes_b = b.body_bytes();
            assert_eq!(bytes_a.len(), bytes_b.len());

            // Swapping the node id turns one body into the other exactly.
            let mut body = TransactionBody::from_bytes(bytes_a).unwrap();
            body.node_account_id = b.node_account_id();
            assert_eq!(body.to_bytes().unwrap(), bytes_b);

            // And the differing bytes sit inside one 24-byte id field.
            let diffs: Vec<usize> = (0..bytes_a.len())
                .filter(|&i| bytes_a[i] != bytes_b[i])
                .collect();
            if let (Some(first), Some(last)) = (diffs.first(), diffs.last()) {
                assert!(last - first < 24);
            }
        }
    }
}

#[test]
fn freezing_twice_changes_nothing() {
    let frozen = associate_draft().freeze().unwrap();
    frozen.sign(&PrivateKey::from_seed(&[1; 32])).unwrap();
    let before = frozen.to_bytes().unwrap();
    let again = frozen.freeze().unwrap();
    assert_eq!(again.to_bytes().unwrap(), before);
    assert_eq!(again.phase(), Phase::Signed);

    let shared = SharedTransaction::new(associate_draft());
    let first = shared.freeze().unwrap();
    let second = shared.freeze().unwrap();
    assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

#[test]
fn signature_maps_are_deterministic() {
    let alice = PrivateKey::from_seed(&[1; 32]);
    let bob = PrivateKey::from_seed(&[2; 32]);

    let first = associate_draft().freeze().unwrap();
    first.sign(&alice).unwrap().sign(&bob).unwrap();

    let second = associate_draft().freeze().unwrap();
    second.sign(&bob).unwrap().sign(&alice).unwrap();

    for ((node_a, map_a), (node_b, map_b)) in first.signatures().into_iter().zip(second.signatures())
    {
        assert_eq!(node_a, node_b);
        assert_eq!(map_a.to_bytes().unwrap(), map_b.to_bytes().unwrap());
        assert_eq!(map_a.len(), 2);
    }
    assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
}

#[test]
fn failing_second_signer_keeps_only_the_first_signature() {
    let frozen = associate_draft().freeze().unwrap();
    let first = PrivateKey::generate();
    let broken_key = PrivateKey::generate();
    let broken = FnSigner::new(broken_key.public_key(), |_| {
        Err(SignerError::Unavailable("hardware wallet disconnected".to_string()))
    });

    let err = frozen.sign_with_all(&[&first as &dyn Signer, &broken]).unwrap_err();
    match err {
        Error::Signing { public_key, reason } => {
            assert_eq!(public_key, broken_key.public_key().to_hex());
            assert!(reason.contains("hardware wallet disconnected"));
        }
        other => panic!("expected signing error, got {:?}", other),
    }

    for (_, map) in frozen.signatures() {
        assert_eq!(map.len(), 1);
        assert!(map.contains(first.public_key().as_bytes()));
    }
}

#[test]
fn signatures_do_not_transfer_between_nodes() {
    let frozen = associate_draft().freeze().unwrap();
    let key = PrivateKey::generate();
    let for_node_3 = key.sign(frozen.body_bytes(account(3)).unwrap());

    let result = frozen.add_signature(account(4), &key.public_key(), for_node_3.clone());
    assert!(result.is_err());
    frozen
        .add_signature(account(3), &key.public_key(), for_node_3)
        .unwrap();
    assert_eq!(frozen.phase(), Phase::Frozen);
}

#[test]
fn concurrent_per_node_signing() {
    let frozen = Arc::new(associate_draft().freeze().unwrap());
    let key = PrivateKey::generate();

    let handles: Vec<_> = nodes()
        .into_iter()
        .map(|node| {
            let frozen = Arc::clone(&frozen);
            let key = key.clone();
            std::thread::spawn(move || frozen.sign_node(node, &key).map(|_| ()))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(frozen.phase(), Phase::Signed);
    for message in frozen.messages() {
        let sig = message.signature_map();
        let bytes = sig.get(key.public_key().as_bytes()).unwrap();
        let signature = helix_sdk::crypto::Signature::from_slice(bytes).unwrap();
        assert!(key.public_key().verify(message.body_bytes(), &signature));
    }
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[test]
fn scheduled_message_has_no_node_or_fee() {
    let draft = associate_draft();
    let scheduled = draft.build_scheduled_message().unwrap();
    let json = serde_json::to_value(&scheduled).unwrap();
    let fields = json.as_object().unwrap();
    assert!(!fields.contains_key("node_account_id"));
    assert!(!fields.contains_key("transaction_fee"));
    assert_eq!(scheduled.memo, "e2e");

    // Frozen or not, the scheduled encoding is the same.
    let frozen = draft.freeze().unwrap();
    assert_eq!(frozen.build_scheduled_message().unwrap(), scheduled);
}

#[test]
fn scheduling_unsupported_kind_fails() {
    let draft = Transaction::new(ScheduleSign::new().schedule_id(ScheduleId::new(0, 0, 88)))
        .transaction_id(TransactionId::with_valid_start(payer(), VALID_START))
        .node_account_ids(nodes());
    assert!(matches!(
        draft.build_scheduled_message(),
        Err(Error::SchedulingUnsupported(_))
    ));
    assert!(matches!(draft.schedule(), Err(Error::SchedulingUnsupported(_))));

    // It still freezes and executes normally.
    assert!(draft.freeze().is_ok());
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

fn signed_associate() -> FrozenTransaction<TokenAssociate> {
    let frozen = associate_draft().freeze().unwrap();
    frozen.sign(&PrivateKey::generate()).unwrap();
    frozen
}

#[tokio::test(start_paused = true)]
async fn expired_transaction_short_circuits_without_network_calls() {
    let net = Arc::new(MockNetwork::new());
    let now = VALID_START.plus(Duration::from_secs(121));
    let frozen = signed_associate();

    let err = executor_at(&net, now).execute(&frozen).await.unwrap_err();
    match err {
        Error::Expired { transaction_id } => assert_eq!(transaction_id, frozen.transaction_id()),
        other => panic!("expected expiry, got {:?}", other),
    }
    assert_eq!(net.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn exactly_at_expiry_is_expired() {
    let net = Arc::new(MockNetwork::new());
    let now = VALID_START.plus(Duration::from_secs(120));
    let err = executor_at(&net, now)
        .execute(&signed_associate())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Expired { .. }));
    assert_eq!(net.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn busy_nodes_are_skipped_without_resigning() {
    let net = Arc::new(MockNetwork::new());
    net.respond(account(3), Status::Busy);
    net.respond(account(4), Status::Busy);

    let counter = Arc::new(AtomicUsize::new(0));
    let frozen = associate_draft().freeze().unwrap();
    frozen
        .sign(&counting_signer(PrivateKey::generate(), Arc::clone(&counter)))
        .unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    let signed_before = frozen.signed_transactions();

    let report = executor_at(&net, VALID_START.plus(Duration::from_secs(5)))
        .execute(&frozen)
        .await
        .unwrap();

    assert_eq!(net.submitted_nodes(), nodes().to_vec());
    assert_eq!(report.node_account_id, account(5));
    assert_eq!(report.receipt.status, Status::Success);
    assert_eq!(report.attempts.len(), 3);

    // No signer was invoked during execution, and every submission carried
    // exactly the bytes signed before it started.
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert_eq!(net.submitted_transactions(), signed_before);
}

#[tokio::test(start_paused = true)]
async fn rejection_reports_status_and_node() {
    let net = Arc::new(MockNetwork::new());
    net.respond(account(3), Status::Busy);
    net.respond(account(4), Status::DuplicateTransaction);

    let err = executor_at(&net, VALID_START.plus(Duration::from_secs(5)))
        .execute(&signed_associate())
        .await
        .unwrap_err();

    match err {
        Error::Rejected {
            status,
            node_account_id,
            ..
        } => {
            assert_eq!(status, Status::DuplicateTransaction);
            assert_eq!(node_account_id, account(4));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(net.submitted_nodes(), vec![account(3), account(4)]);
}

#[tokio::test(start_paused = true)]
async fn transfer_round_trip_through_client_config() {
    let config = helix_sdk::config::ClientConfig::from_json(
        r#"{
            "operator_account_id": "0.0.2",
            "nodes": ["0.0.3", "0.0.4"],
            "execution": { "jitter_ms": 0, "min_backoff_ms": 10 }
        }"#,
    )
    .unwrap();

    let frozen = Transaction::new(
        Transfer::new()
            .hbar_transfer(account(2), -25)
            .hbar_transfer(account(1002), 25),
    )
    .freeze_with(&config)
    .unwrap();
    frozen.sign(&PrivateKey::generate()).unwrap();

    let net = Arc::new(MockNetwork::new());
    net.script_receipts(account(3), [Ok(Status::Unknown), Ok(Status::Success)]);
    let executor = Executor::from_client_config(net.clone(), &config).unwrap();
    let report = executor.execute(&frozen).await.unwrap();

    assert_eq!(report.transaction_id.account_id, account(2));
    assert_eq!(report.receipt.transaction_id, frozen.transaction_id());
    assert_eq!(net.receipt_queries(), 2);
}

#[tokio::test(start_paused = true)]
async fn one_executor_drives_many_transactions() {
    let net = Arc::new(MockNetwork::new());
    let executor = executor_at(&net, VALID_START.plus(Duration::from_secs(5)));

    let transactions: Vec<_> = (0..4)
        .map(|n| {
            let frozen = associate_draft()
                .transaction_id(
                    TransactionId::with_valid_start(payer(), VALID_START).with_nonce(n),
                )
                .freeze()
                .unwrap();
            frozen.sign(&PrivateKey::generate()).unwrap();
            frozen
        })
        .collect();

    let reports =
        futures::future::join_all(transactions.iter().map(|tx| executor.execute(tx))).await;

    for (report, tx) in reports.into_iter().zip(&transactions) {
        let report = report.unwrap();
        assert_eq!(report.transaction_id, tx.transaction_id());
        assert_eq!(report.node_account_id, account(3));
    }
    assert_eq!(net.submitted_nodes().len(), 4);
    assert_eq!(net.receipt_queries(), 4);
}

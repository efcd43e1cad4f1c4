//! Walks one transaction through its whole lifecycle against the scripted
//! in-memory network: build, freeze, sign, execute, and schedule.
//!
//! ```text
//! RUST_LOG=helix_sdk=debug cargo run -p helix-sdk --example demo
//! HELIX_LOG_FORMAT=json cargo run -p helix-sdk --example demo
//! ```

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use helix_sdk::config::ClientConfig;
use helix_sdk::crypto::PrivateKey;
use helix_sdk::ids::{AccountId, TokenId};
use helix_sdk::logging::{init_logging, LogFormat};
use helix_sdk::network::{CancelToken, Executor, MockNetwork};
use helix_sdk::proto::Status;
use helix_sdk::transaction::{TokenAssociate, TokenAssociateTransaction, Transaction, Transfer};

#[tokio::main]
async fn main() -> Result<()> {
    let format = std::env::var("HELIX_LOG_FORMAT")
        .map(|s| LogFormat::from_str_lossy(&s))
        .unwrap_or_default();
    init_logging("info", format);

    let config = ClientConfig::from_json(
        r#"{
            "operator_account_id": "0.0.1001",
            "nodes": ["0.0.3", "0.0.4", "0.0.5"],
            "execution": { "min_backoff_ms": 100, "max_backoff_ms": 1000 }
        }"#,
    )?;
    let operator = PrivateKey::generate();
    let treasury = PrivateKey::generate();

    // The first two nodes are busy; the third accepts.
    let network = Arc::new(MockNetwork::new());
    network.respond(AccountId::new(0, 0, 3), Status::Busy);
    network.respond(AccountId::new(0, 0, 4), Status::PlatformNotActive);
    network.script_receipts(AccountId::new(0, 0, 5), [Ok(Status::Unknown), Ok(Status::Success)]);

    let executor = Executor::from_client_config(network.clone(), &config)?;

    // Token association: one signer.
    let associate: TokenAssociateTransaction = Transaction::new(
        TokenAssociate::new()
            .account_id(AccountId::new(0, 0, 1001))
            .token_ids([TokenId::new(0, 0, 5005), TokenId::new(0, 0, 5006)]),
    )
    .memo("demo association");

    let frozen = associate.freeze_with(&config)?;
    frozen.sign(&operator)?;
    info!(
        transaction_id = %frozen.transaction_id(),
        phase = %frozen.phase(),
        nodes = frozen.messages().len(),
        "association signed"
    );

    let report = executor
        .execute_with_cancel(&frozen, &CancelToken::new())
        .await?;
    info!(
        node = %report.node_account_id,
        status = %report.receipt.status,
        attempts = report.attempts.len(),
        "association reached consensus"
    );

    // Transfer: two signers, then scheduled instead of submitted directly.
    let transfer = Transaction::new(
        Transfer::new()
            .hbar_transfer(AccountId::new(0, 0, 1001), -1_000)
            .hbar_transfer(AccountId::new(0, 0, 98), 1_000),
    )
    .memo("demo transfer");

    let scheduled = transfer.schedule()?.build()?;
    info!(
        kind = %scheduled.kind,
        bytes = scheduled.to_bytes()?.len(),
        "transfer wrapped for scheduling"
    );

    let frozen = transfer.freeze_with(&config)?;
    frozen.sign(&operator)?.sign(&treasury)?;
    for (node, hash) in frozen.transaction_hashes()? {
        info!(%node, hash = %hex::encode(hash), "transfer hash");
    }

    Ok(())
}

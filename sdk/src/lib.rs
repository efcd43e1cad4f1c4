// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Helix SDK: Transaction Engine
//!
//! Client-side construction, signing, and submission of Helix ledger
//! transactions. A caller describes *what* they want (associate these tokens
//! with this account, move these funds) and this crate turns that intent
//! into signed, network-ready messages, hands them to a node, and reports
//! what the network decided.
//!
//! ## Architecture
//!
//! - **transaction**: The Draft → Frozen lifecycle, per-node body
//!   assembly, multi-party signing, and the scheduled encoding.
//! - **network**: Method routing, the node channel boundary, and the
//!   executor that retries across nodes and polls for receipts.
//! - **proto**: The wire-schema boundary. Bodies, signature maps, receipts.
//! - **crypto**: Ed25519 keys, the signer capability, transaction hashes.
//! - **ids**: Account, token, schedule, and transaction identifiers.
//! - **config**: Protocol constants and externally supplied client config.
//! - **error**: The crate-wide error taxonomy.
//! - **logging**: `tracing` subscriber setup for embedders.
//!
//! ## Lifecycle
//!
//! ```text
//! Transaction<K> (Draft) ──freeze──► FrozenTransaction<K> ──sign──► Executor::execute
//!                                         │                              │
//!                                  one message per node           receipt / rejection /
//!                                                                 expiry / exhaustion
//! ```
//!
//! ## Design Philosophy
//!
//! 1. A frozen transaction never changes its bytes. Retries pick a
//!    different node, they never rebuild or re-sign.
//! 2. Every kind supplies only its payload. The envelope, the signing, and
//!    the retry loop are shared.
//! 3. Every terminal outcome is reported. Nothing is dropped on the floor.

pub mod config;
pub mod crypto;
pub mod error;
pub mod ids;
pub mod logging;
pub mod network;
pub mod proto;
pub mod transaction;

pub use error::{Error, Result};

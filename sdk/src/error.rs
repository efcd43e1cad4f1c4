//! Error types for the transaction engine.
//!
//! Every fallible operation in the crate returns [`Error`]. Validation and
//! phase errors surface synchronously at the call that caused them.
//! Transient network failures are absorbed by the executor's retry loop
//! and only reach the caller as [`Error::RetryExhausted`].

use thiserror::Error;

use crate::ids::{AccountId, TransactionId};
use crate::proto::Status;
use crate::transaction::KindTag;

/// Errors that can occur while building, signing, or executing a transaction.
#[derive(Debug, Error)]
pub enum Error {
    /// A payload or envelope field is missing or invalid.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A mutation was attempted after the transaction was frozen.
    #[error("transaction is frozen: cannot modify {field}")]
    FrozenState {
        /// The field the caller tried to change.
        field: &'static str,
    },

    /// The signer capability failed to produce a signature.
    #[error("signing failed for key {public_key}: {reason}")]
    Signing {
        /// Hex-encoded public key of the signer that failed.
        public_key: String,
        /// What went wrong.
        reason: String,
    },

    /// The transaction kind cannot be wrapped in a schedule.
    #[error("{0} does not support scheduled execution")]
    SchedulingUnsupported(KindTag),

    /// A node was busy or unreachable. Retried internally by the executor.
    #[error("transient failure on node {node_account_id}: {reason}")]
    NetworkTransient {
        /// The node that failed.
        node_account_id: AccountId,
        /// Human-readable cause.
        reason: String,
    },

    /// The network rejected the transaction deterministically.
    #[error("transaction {transaction_id} rejected by node {node_account_id} with status {status}")]
    Rejected {
        /// The status code the network reported.
        status: Status,
        /// The node that reported it.
        node_account_id: AccountId,
        /// The rejected transaction.
        transaction_id: TransactionId,
    },

    /// The transaction's valid-duration window has elapsed.
    #[error("transaction {transaction_id} expired")]
    Expired {
        /// The expired transaction.
        transaction_id: TransactionId,
    },

    /// The attempt budget or submission deadline was spent.
    #[error("gave up after {attempts} attempts: {last_error}")]
    RetryExhausted {
        /// Number of submissions made.
        attempts: u32,
        /// The last transient failure observed.
        last_error: String,
    },

    /// The caller aborted execution.
    #[error("execution cancelled")]
    Cancelled,

    /// No remote method is registered for this kind. A packaging defect.
    #[error("no method registered for {0}")]
    UnregisteredKind(KindTag),

    /// A message about to be submitted has no signatures.
    #[error("message for node {node_account_id} is not signed")]
    NotSigned {
        /// The node whose message is unsigned.
        node_account_id: AccountId,
    },

    /// A channel failure that retrying cannot fix.
    #[error("transport error: {0}")]
    Transport(String),

    /// Encoding or decoding a wire message failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Returns `true` if the executor should move on to another node.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::NetworkTransient { .. })
    }
}

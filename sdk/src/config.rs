//! # Protocol Configuration & Constants
//!
//! Every magic number the engine relies on lives here, next to the
//! configuration structs an embedding client hands to the core. The core
//! only ever reads these values. Loading them (from a file, the
//! environment, a service registry) is the client's business.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::AccountId;

// ---------------------------------------------------------------------------
// Envelope Limits
// ---------------------------------------------------------------------------

/// Valid-duration used when the caller does not set one. Two minutes is
/// long enough to survive a few retries and short enough that a stale
/// transaction does not linger.
pub const DEFAULT_VALID_DURATION: Duration = Duration::from_secs(120);

/// Longest valid-duration the network accepts.
pub const MAX_VALID_DURATION: Duration = Duration::from_secs(180);

/// Maximum memo length in bytes (UTF-8 encoded).
pub const MAX_MEMO_LENGTH: usize = 100;

/// Default ceiling on the fee a payer is willing to pay, in tinybars.
/// 2 hbar covers every kind in the catalog at current fee schedules.
pub const DEFAULT_MAX_TRANSACTION_FEE: u64 = 200_000_000;

/// Absolute ceiling for `max_transaction_fee`. Anything above this is
/// almost certainly a units mistake.
pub const MAX_TRANSACTION_FEE_CEILING: u64 = 100_000_000_000;

/// Generated transaction ids start a little in the past so that a node
/// whose clock runs slightly behind ours does not see a valid-start in
/// its future. Backdating is drawn uniformly from this range.
pub const VALID_START_BACKDATE_MS: std::ops::RangeInclusive<u64> = 5_000..=8_000;

// ---------------------------------------------------------------------------
// Execution Defaults
// ---------------------------------------------------------------------------

/// Submissions attempted before giving up, counted across all nodes.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// First backoff delay after a transient failure.
pub const DEFAULT_MIN_BACKOFF_MS: u64 = 250;

/// Backoff never grows beyond this.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 8_000;

/// Upper bound of the random jitter added to every backoff.
pub const DEFAULT_JITTER_MS: u64 = 100;

/// Wall-clock budget for all submission attempts of one execution.
pub const DEFAULT_SUBMISSION_DEADLINE_MS: u64 = 120_000;

/// Pause between receipt queries.
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 500;

/// How long to wait for a receipt after a node accepted the transaction.
pub const DEFAULT_RECEIPT_POLL_TIMEOUT_MS: u64 = 30_000;

// ---------------------------------------------------------------------------
// ExecutionConfig
// ---------------------------------------------------------------------------

/// Order in which the executor walks the candidate node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOrdering {
    /// Caller-supplied order, wrapping around when the list is exhausted.
    #[default]
    AsGiven,
    /// A fresh random permutation per execution.
    Shuffled,
}

/// Tunables for [`crate::network::Executor`].
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use helix_sdk::config::ExecutionConfig;
///
/// let cfg: ExecutionConfig = serde_json::from_str(r#"{ "max_attempts": 3 }"#).unwrap();
/// assert_eq!(cfg.max_attempts, 3);
/// assert_eq!(cfg.min_backoff_ms, 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Total submissions allowed across all nodes.
    pub max_attempts: u32,
    /// Backoff after the first transient failure.
    pub min_backoff_ms: u64,
    /// Backoff cap.
    pub max_backoff_ms: u64,
    /// Random jitter added to each backoff (0 disables jitter).
    pub jitter_ms: u64,
    /// Wall-clock budget for the submission loop.
    pub submission_deadline_ms: u64,
    /// Pause between receipt queries.
    pub receipt_poll_interval_ms: u64,
    /// Receipt polling gives up (as expired) after this long.
    pub receipt_poll_timeout_ms: u64,
    /// Node walk strategy.
    pub node_ordering: NodeOrdering,
    /// Report receipts with a non-success final status as rejections.
    pub validate_receipt_status: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_backoff_ms: DEFAULT_MIN_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            jitter_ms: DEFAULT_JITTER_MS,
            submission_deadline_ms: DEFAULT_SUBMISSION_DEADLINE_MS,
            receipt_poll_interval_ms: DEFAULT_RECEIPT_POLL_INTERVAL_MS,
            receipt_poll_timeout_ms: DEFAULT_RECEIPT_POLL_TIMEOUT_MS,
            node_ordering: NodeOrdering::AsGiven,
            validate_receipt_status: true,
        }
    }
}

impl ExecutionConfig {
    /// Submission deadline as a `Duration`.
    pub fn submission_deadline(&self) -> Duration {
        Duration::from_millis(self.submission_deadline_ms)
    }

    /// Receipt poll interval as a `Duration`.
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    /// Receipt poll timeout as a `Duration`.
    pub fn receipt_poll_timeout(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_timeout_ms)
    }
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// What the embedding client knows about the network and its operator.
///
/// Consumed by [`crate::transaction::Transaction::freeze_with`] to fill in
/// anything the caller left unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Account that pays for transactions when no id was set explicitly.
    pub operator_account_id: Option<AccountId>,
    /// Candidate nodes, in preference order.
    pub nodes: Vec<AccountId>,
    /// Fee ceiling applied when the transaction does not set one.
    pub default_max_transaction_fee: u64,
    /// Valid-duration applied when the transaction does not set one.
    pub default_valid_duration_secs: u64,
    /// Executor tunables.
    pub execution: ExecutionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            operator_account_id: None,
            nodes: Vec::new(),
            default_max_transaction_fee: DEFAULT_MAX_TRANSACTION_FEE,
            default_valid_duration_secs: DEFAULT_VALID_DURATION.as_secs(),
            execution: ExecutionConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse a client configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default valid-duration as a `Duration`.
    pub fn default_valid_duration(&self) -> Duration {
        Duration::from_secs(self.default_valid_duration_secs)
    }
}

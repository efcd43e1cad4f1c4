//! Submission, retry and receipt resolution.
//!
//! The executor sends a frozen, signed transaction to one candidate node at
//! a time. Busy or unreachable nodes are skipped with exponential backoff;
//! a deterministic rejection ends the run at once; an accepted submission
//! moves on to polling that node for the receipt.
//!
//! ```text
//! Idle ─► Attempting(node_i) ─┬─ accepted ──► polling ─► Succeeded / Rejected / Expired
//!                             ├─ busy/unreachable ─► backoff ─► Attempting(node_i+1)
//!                             ├─ rejected ──► Rejected
//!                             └─ expired / budget spent / cancelled
//! ```
//!
//! Attempts are strictly sequential. A retry never rebuilds or re-signs:
//! it picks the next node's already-signed message.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::{ClientConfig, ExecutionConfig, NodeOrdering};
use crate::error::{Error, Result};
use crate::ids::{AccountId, Timestamp, TransactionId};
use crate::proto::{Status, TransactionReceipt, TransactionResponse};
use crate::transaction::{FrozenTransaction, KindTag, NodeMessage, TransactionKind};

use super::backoff::backoff_delay;
use super::cancel::CancelToken;
use super::channel::{ChannelError, Network};
use super::registry::MethodRegistry;

/// Source of wall-clock time, used for the expiry check.
pub type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// What happened on one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Precheck passed.
    Accepted,
    /// The node answered with a retryable precheck code.
    Busy(Status),
    /// The channel to the node failed in a retryable way.
    Unreachable(String),
}

/// One entry of the attempt log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub node_account_id: AccountId,
    pub outcome: AttemptOutcome,
}

/// The result of a successful execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub transaction_id: TransactionId,
    /// The node that accepted the submission and served the receipt.
    pub node_account_id: AccountId,
    pub receipt: TransactionReceipt,
    /// Every submission made, in order. The last one is the accepted one.
    pub attempts: Vec<Attempt>,
}

/// How a single submission was classified.
enum Classified {
    Accepted,
    Transient(AttemptOutcome, String),
    Rejected(Status),
    Fatal(String),
}

fn classify(result: std::result::Result<TransactionResponse, ChannelError>) -> Classified {
    match result {
        Ok(response) if response.precheck == Status::Ok => Classified::Accepted,
        Ok(response) if response.precheck.is_retryable_precheck() => Classified::Transient(
            AttemptOutcome::Busy(response.precheck),
            format!("precheck {}", response.precheck),
        ),
        Ok(response) => Classified::Rejected(response.precheck),
        Err(e) if e.is_retryable() => {
            Classified::Transient(AttemptOutcome::Unreachable(e.to_string()), e.to_string())
        }
        Err(e) => Classified::Fatal(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// Drives frozen transactions to a terminal outcome.
pub struct Executor {
    network: Arc<dyn Network>,
    registry: MethodRegistry,
    config: ExecutionConfig,
    clock: Clock,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Executor {
    /// Creates an executor. Fails if `registry` lacks a route for any kind
    /// this crate ships, or if `config` is unusable.
    pub fn new(
        network: Arc<dyn Network>,
        registry: MethodRegistry,
        config: ExecutionConfig,
    ) -> Result<Self> {
        registry.ensure_complete(&KindTag::ALL)?;
        if config.max_attempts == 0 {
            return Err(Error::Validation("max_attempts must be at least 1".to_string()));
        }
        if config.min_backoff_ms > config.max_backoff_ms {
            return Err(Error::Validation(format!(
                "min_backoff_ms ({}) exceeds max_backoff_ms ({})",
                config.min_backoff_ms, config.max_backoff_ms
            )));
        }
        Ok(Self {
            network,
            registry,
            config,
            clock: Arc::new(Timestamp::now),
        })
    }

    /// Standard routes and the client's execution settings.
    pub fn from_client_config(network: Arc<dyn Network>, config: &ClientConfig) -> Result<Self> {
        Self::new(network, MethodRegistry::standard(), config.execution.clone())
    }

    /// Replaces the wall clock used for expiry checks.
    pub fn with_clock(mut self, clock: impl Fn() -> Timestamp + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Submits `transaction` and waits for its receipt.
    pub async fn execute<K: TransactionKind>(
        &self,
        transaction: &FrozenTransaction<K>,
    ) -> Result<ExecutionReport> {
        self.execute_with_cancel(transaction, &CancelToken::new())
            .await
    }

    /// Like [`execute`](Self::execute), but stops with
    /// [`Error::Cancelled`] once `cancel` fires.
    pub async fn execute_with_cancel<K: TransactionKind>(
        &self,
        transaction: &FrozenTransaction<K>,
        cancel: &CancelToken,
    ) -> Result<ExecutionReport> {
        let kind = K::TAG;
        let span = info_span!(
            "execute",
            execution_id = %Uuid::new_v4(),
            transaction_id = %transaction.transaction_id(),
            %kind,
        );
        self.run(transaction, cancel).instrument(span).await
    }

    /// Signed messages in the order they will be tried.
    fn candidates<'a, K: TransactionKind>(
        &self,
        transaction: &'a FrozenTransaction<K>,
    ) -> Result<Vec<&'a NodeMessage>> {
        let mut candidates: Vec<&NodeMessage> = transaction
            .messages()
            .iter()
            .filter(|m| {
                let signed = m.is_signed();
                if !signed {
                    debug!(node = %m.node_account_id(), "skipping unsigned node message");
                }
                signed
            })
            .collect();

        if candidates.is_empty() {
            let node_account_id = transaction
                .messages()
                .first()
                .map(NodeMessage::node_account_id)
                .unwrap_or_default();
            return Err(Error::NotSigned { node_account_id });
        }

        if self.config.node_ordering == NodeOrdering::Shuffled {
            candidates.shuffle(&mut rand::thread_rng());
        }
        Ok(candidates)
    }

    async fn run<K: TransactionKind>(
        &self,
        transaction: &FrozenTransaction<K>,
        cancel: &CancelToken,
    ) -> Result<ExecutionReport> {
        let method = self.registry.resolve(K::TAG)?;
        let candidates = self.candidates(transaction)?;
        let transaction_id = transaction.transaction_id();
        let expires_at = transaction_id.expires_at(transaction.valid_duration());
        let deadline = Instant::now() + self.config.submission_deadline();

        let mut attempts: Vec<Attempt> = Vec::new();
        let mut last_error = "no attempt completed".to_string();

        loop {
            if cancel.is_cancelled() {
                info!(attempts = attempts.len(), "execution cancelled");
                return Err(Error::Cancelled);
            }
            if (self.clock)() >= expires_at {
                warn!(%expires_at, "transaction expired before submission");
                return Err(Error::Expired { transaction_id });
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(attempts = attempts.len(), %last_error, "submission deadline reached");
                return Err(Error::RetryExhausted {
                    attempts: attempts.len() as u32,
                    last_error,
                });
            }

            let message = candidates[attempts.len() % candidates.len()];
            let node = message.node_account_id();
            let attempt = attempts.len() as u32 + 1;

            debug!(attempt, %node, %method, "submitting");
            let submission = self
                .network
                .submit(node, method, message.to_signed_transaction());
            let result = match timeout(remaining, submission).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(attempt, %node, "submission deadline reached during call");
                    return Err(Error::RetryExhausted {
                        attempts: attempt,
                        last_error: Error::NetworkTransient {
                            node_account_id: node,
                            reason: "no response before submission deadline".to_string(),
                        }
                        .to_string(),
                    });
                }
            };

            match classify(result) {
                Classified::Accepted => {
                    info!(attempt, %node, "submission accepted");
                    attempts.push(Attempt {
                        node_account_id: node,
                        outcome: AttemptOutcome::Accepted,
                    });
                    return self
                        .await_receipt(node, transaction_id, attempts, cancel)
                        .await;
                }
                Classified::Rejected(Status::TransactionExpired) => {
                    warn!(attempt, %node, "node reports transaction expired");
                    return Err(Error::Expired { transaction_id });
                }
                Classified::Rejected(status) => {
                    warn!(attempt, %node, %status, "submission rejected");
                    return Err(Error::Rejected {
                        status,
                        node_account_id: node,
                        transaction_id,
                    });
                }
                Classified::Fatal(reason) => {
                    warn!(attempt, %node, %reason, "channel failure");
                    return Err(Error::Transport(reason));
                }
                Classified::Transient(outcome, reason) => {
                    last_error = Error::NetworkTransient {
                        node_account_id: node,
                        reason,
                    }
                    .to_string();
                    attempts.push(Attempt {
                        node_account_id: node,
                        outcome,
                    });
                }
            }

            let made = attempts.len() as u32;
            if made >= self.config.max_attempts {
                warn!(attempts = made, %last_error, "attempt budget spent");
                return Err(Error::RetryExhausted {
                    attempts: made,
                    last_error,
                });
            }

            let delay = backoff_delay(made, &self.config);
            let remaining = deadline.saturating_duration_since(Instant::now());
            if delay > remaining {
                warn!(attempts = made, %last_error, "submission deadline reached");
                return Err(Error::RetryExhausted {
                    attempts: made,
                    last_error,
                });
            }

            warn!(
                attempt = made,
                delay_ms = delay.as_millis() as u64,
                %last_error,
                "retrying on next node"
            );
            self.pause(delay, cancel).await?;
        }
    }

    /// Polls `node` until the receipt is final or the poll timeout passes.
    async fn await_receipt(
        &self,
        node: AccountId,
        transaction_id: TransactionId,
        attempts: Vec<Attempt>,
        cancel: &CancelToken,
    ) -> Result<ExecutionReport> {
        let poll_deadline = Instant::now() + self.config.receipt_poll_timeout();

        loop {
            if cancel.is_cancelled() {
                info!(%node, "receipt polling cancelled");
                return Err(Error::Cancelled);
            }

            let remaining = poll_deadline.saturating_duration_since(Instant::now());
            let query = self.network.query_receipt(node, transaction_id);
            match timeout(remaining, query).await {
                Ok(Ok(receipt)) if receipt.status.is_final() => {
                    return self.finish(node, transaction_id, receipt, attempts);
                }
                Ok(Ok(receipt)) => {
                    debug!(%node, status = %receipt.status, "receipt not final yet")
                }
                Ok(Err(e)) if e.is_retryable() => {
                    debug!(%node, error = %e, "receipt query failed")
                }
                Ok(Err(e)) => return Err(Error::Transport(e.to_string())),
                Err(_) => {
                    warn!(%node, "receipt query outlived the poll timeout");
                    return Err(Error::Expired { transaction_id });
                }
            }

            let remaining = poll_deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(%node, "no final receipt before poll timeout");
                return Err(Error::Expired { transaction_id });
            }
            self.pause(self.config.receipt_poll_interval().min(remaining), cancel)
                .await?;
        }
    }

    fn finish(
        &self,
        node: AccountId,
        transaction_id: TransactionId,
        receipt: TransactionReceipt,
        attempts: Vec<Attempt>,
    ) -> Result<ExecutionReport> {
        match receipt.status {
            Status::Success => info!(%node, "transaction succeeded"),
            Status::TransactionExpired => {
                warn!(%node, "receipt reports transaction expired");
                return Err(Error::Expired { transaction_id });
            }
            status if self.config.validate_receipt_status => {
                warn!(%node, %status, "receipt reports failure");
                return Err(Error::Rejected {
                    status,
                    node_account_id: node,
                    transaction_id,
                });
            }
            status => info!(%node, %status, "receipt returned without status validation"),
        }
        Ok(ExecutionReport {
            transaction_id,
            node_account_id: node,
            receipt,
            attempts,
        })
    }

    /// Sleeps for `delay` unless `cancel` fires first.
    async fn pause(&self, delay: Duration, cancel: &CancelToken) -> Result<()> {
        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(()),
            _ = cancel.cancelled() => {
                info!("execution cancelled while waiting");
                Err(Error::Cancelled)
            }
        }
    }
}

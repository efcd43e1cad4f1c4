//! The Draft phase.
//!
//! [`Transaction<K>`] holds the envelope fields and a kind's payload while
//! they can still change. Every setter consumes and returns the draft, so
//! configuration chains. [`Transaction::freeze`] is the single validation
//! gate: it checks the envelope, validates the payload, materializes one
//! body per candidate node, and hands back a [`FrozenTransaction<K>`],
//! which has no setters at all.
//!
//! ```
//! use helix_sdk::ids::{AccountId, Timestamp, TokenId, TransactionId};
//! use helix_sdk::transaction::{TokenAssociate, Transaction};
//!
//! let payer = AccountId::new(0, 0, 1001);
//! let frozen = Transaction::new(
//!     TokenAssociate::new()
//!         .account_id(payer)
//!         .token_ids([TokenId::new(0, 0, 5005)]),
//! )
//! .transaction_id(TransactionId::with_valid_start(payer, Timestamp::new(1_700_000_000, 0)))
//! .node_account_ids([AccountId::new(0, 0, 3), AccountId::new(0, 0, 4)])
//! .memo("associate")
//! .freeze()
//! .unwrap();
//!
//! assert_eq!(frozen.node_account_ids().len(), 2);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::config::{
    ClientConfig, DEFAULT_MAX_TRANSACTION_FEE, DEFAULT_VALID_DURATION, MAX_MEMO_LENGTH,
    MAX_TRANSACTION_FEE_CEILING, MAX_VALID_DURATION,
};
use crate::error::{Error, Result};
use crate::ids::{AccountId, TransactionId};
use crate::proto::{SchedulableTransactionBody, TransactionBody};

use super::body::{BodyAssembler, Envelope};
use super::frozen::FrozenTransaction;
use super::kind::TransactionKind;
use super::schedule::ScheduleAdapter;
use super::signing::SignatureManager;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a transaction is in its lifecycle, up to submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Fields may still change.
    Draft,
    /// Bodies are fixed; signatures may be added.
    Frozen,
    /// Every node's message carries at least one signature.
    Signed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "Draft"),
            Self::Frozen => write!(f, "Frozen"),
            Self::Signed => write!(f, "Signed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction (Draft)
// ---------------------------------------------------------------------------

/// A transaction that can still be configured.
///
/// Unset optional fields fall back to the protocol defaults at freeze time
/// (or to the client's defaults with [`Transaction::freeze_with`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction<K> {
    kind: K,
    transaction_id: Option<TransactionId>,
    node_account_ids: Vec<AccountId>,
    max_transaction_fee: Option<u64>,
    valid_duration: Option<Duration>,
    memo: String,
}

impl<K: TransactionKind> Transaction<K> {
    /// Starts a draft around `kind`'s payload.
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            transaction_id: None,
            node_account_ids: Vec::new(),
            max_transaction_fee: None,
            valid_duration: None,
            memo: String::new(),
        }
    }

    /// Sets an explicit transaction id.
    pub fn transaction_id(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    /// Sets the candidate nodes, in preferred submission order.
    pub fn node_account_ids(mut self, nodes: impl IntoIterator<Item = AccountId>) -> Self {
        self.node_account_ids = nodes.into_iter().collect();
        self
    }

    /// Sets the most the payer will pay, in tinybars.
    pub fn max_transaction_fee(mut self, fee: u64) -> Self {
        self.max_transaction_fee = Some(fee);
        self
    }

    /// Sets how long after valid-start the network will accept the
    /// transaction.
    pub fn valid_duration(mut self, duration: Duration) -> Self {
        self.valid_duration = Some(duration);
        self
    }

    /// Sets the memo. At most 100 bytes, checked at freeze.
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Replaces the payload through a closure, e.g. to add a token.
    pub fn map_kind(mut self, f: impl FnOnce(K) -> K) -> Self {
        self.kind = f(self.kind);
        self
    }

    /// The payload.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Mutable access to the payload while still a draft.
    pub fn kind_mut(&mut self) -> &mut K {
        &mut self.kind
    }

    /// The explicit transaction id, if one was set.
    pub fn get_transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    /// Candidate nodes in submission order.
    pub fn get_node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    /// The fee ceiling, if set. Freeze falls back to the default.
    pub fn get_max_transaction_fee(&self) -> Option<u64> {
        self.max_transaction_fee
    }

    /// The valid-duration, if set. Freeze falls back to the default.
    pub fn get_valid_duration(&self) -> Option<Duration> {
        self.valid_duration
    }

    /// The memo, empty unless set.
    pub fn get_memo(&self) -> &str {
        &self.memo
    }

    /// Always [`Phase::Draft`]; frozen transactions are a different type.
    pub fn phase(&self) -> Phase {
        Phase::Draft
    }

    fn envelope(&self) -> Result<Envelope> {
        let transaction_id = self.transaction_id.ok_or_else(|| {
            Error::Validation(
                "transaction id is not set: set one explicitly or freeze with a client config"
                    .to_string(),
            )
        })?;
        Ok(Envelope {
            transaction_id,
            max_transaction_fee: self
                .max_transaction_fee
                .unwrap_or(DEFAULT_MAX_TRANSACTION_FEE),
            valid_duration: self.valid_duration.unwrap_or(DEFAULT_VALID_DURATION),
            memo: self.memo.clone(),
        })
    }

    fn check_envelope(&self, envelope: &Envelope) -> Result<()> {
        if self.node_account_ids.is_empty() {
            return Err(Error::Validation(
                "at least one node account id is required".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(self.node_account_ids.len());
        for node in &self.node_account_ids {
            if !seen.insert(node) {
                return Err(Error::Validation(format!("node {} listed twice", node)));
            }
        }
        if envelope.memo.len() > MAX_MEMO_LENGTH {
            return Err(Error::Validation(format!(
                "memo is {} bytes, limit is {}",
                envelope.memo.len(),
                MAX_MEMO_LENGTH
            )));
        }
        if envelope.valid_duration < Duration::from_secs(1)
            || envelope.valid_duration > MAX_VALID_DURATION
        {
            return Err(Error::Validation(format!(
                "valid duration must be between 1s and {}s",
                MAX_VALID_DURATION.as_secs()
            )));
        }
        if envelope.max_transaction_fee > MAX_TRANSACTION_FEE_CEILING {
            return Err(Error::Validation(format!(
                "max transaction fee {} exceeds ceiling {}",
                envelope.max_transaction_fee, MAX_TRANSACTION_FEE_CEILING
            )));
        }
        Ok(())
    }

    /// Builds the body that would be sent to `node_account_id`, without
    /// freezing. Needs a transaction id.
    pub fn build_message(&self, node_account_id: AccountId) -> Result<TransactionBody> {
        let envelope = self.envelope()?;
        BodyAssembler::new(&envelope, &self.kind).build_message(node_account_id)
    }

    /// Builds the schedulable encoding of this draft's payload.
    pub fn build_scheduled_message(&self) -> Result<SchedulableTransactionBody> {
        Ok(self.schedule()?.build()?.body)
    }

    /// Wraps this draft's payload for scheduling. Fails straight away if
    /// the kind cannot be scheduled.
    pub fn schedule(&self) -> Result<ScheduleAdapter<K>> {
        Ok(ScheduleAdapter::new(self.kind.clone())?.memo(self.memo.clone()))
    }

    /// Validates everything and fixes one body per candidate node.
    pub fn freeze(self) -> Result<FrozenTransaction<K>> {
        let envelope = self.envelope()?;
        self.check_envelope(&envelope)?;

        let bodies =
            BodyAssembler::new(&envelope, &self.kind).build_messages(&self.node_account_ids)?;

        debug!(
            transaction_id = %envelope.transaction_id,
            kind = %K::TAG,
            nodes = bodies.len(),
            "transaction frozen"
        );

        Ok(FrozenTransaction::from_parts(
            self.kind,
            envelope,
            SignatureManager::new(bodies),
        ))
    }

    /// Fills unset fields from the client's configuration, then freezes.
    ///
    /// A missing transaction id is generated for the client's operator.
    pub fn freeze_with(mut self, config: &ClientConfig) -> Result<FrozenTransaction<K>> {
        if self.node_account_ids.is_empty() {
            self.node_account_ids = config.nodes.clone();
        }
        if self.max_transaction_fee.is_none() {
            self.max_transaction_fee = Some(config.default_max_transaction_fee);
        }
        if self.valid_duration.is_none() {
            self.valid_duration = Some(config.default_valid_duration());
        }
        if self.transaction_id.is_none() {
            if let Some(operator) = config.operator_account_id {
                self.transaction_id = Some(TransactionId::generate(operator));
            }
        }
        self.freeze()
    }
}

//! Scheduled encoding.
//!
//! A scheduled transaction is not sent to a node directly. Its payload is
//! wrapped, without node id or fee, into a separate schedule-create
//! transaction, and executes later once enough signatures have been
//! collected. [`ScheduleAdapter`] produces that wrapped payload.

use crate::error::{Error, Result};
use crate::proto::SchedulableTransactionBody;

use super::body::build_scheduled_message;
use super::kind::{KindTag, TransactionKind};

/// The schedulable form of one transaction's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledMessage {
    pub kind: KindTag,
    pub body: SchedulableTransactionBody,
}

impl ScheduledMessage {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.body.to_bytes()
    }
}

/// Wraps a payload for scheduling.
///
/// Construction fails for kinds that cannot be scheduled, so the mistake
/// shows up before anything is signed or sent.
#[derive(Debug, Clone)]
pub struct ScheduleAdapter<K> {
    kind: K,
    memo: String,
}

impl<K: TransactionKind> ScheduleAdapter<K> {
    pub fn new(kind: K) -> Result<Self> {
        if !K::SCHEDULABLE {
            return Err(Error::SchedulingUnsupported(K::TAG));
        }
        Ok(Self {
            kind,
            memo: String::new(),
        })
    }

    /// Memo carried by the inner transaction.
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Validates the payload and builds the schedulable body.
    pub fn build(&self) -> Result<ScheduledMessage> {
        Ok(ScheduledMessage {
            kind: K::TAG,
            body: build_scheduled_message(&self.kind, &self.memo)?,
        })
    }
}

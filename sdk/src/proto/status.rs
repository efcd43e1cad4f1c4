//! Response codes, precheck responses and receipts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ScheduleId, TransactionId};

/// Status codes reported by nodes, both at precheck and in receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Precheck passed; the node forwarded the transaction to consensus.
    Ok,
    /// Reached consensus and applied.
    Success,
    /// Not yet known. Receipts report this until consensus is reached.
    Unknown,
    /// The node is overloaded.
    Busy,
    /// The node could not hand the transaction to the platform.
    PlatformTransactionNotCreated,
    /// The node's platform is still starting or is behind.
    PlatformNotActive,
    /// The valid window has passed.
    TransactionExpired,
    /// Valid-start is too far in the future or the past.
    InvalidTransactionStart,
    /// Valid duration is outside the accepted range.
    InvalidTransactionDuration,
    /// A transaction with this id was already submitted.
    DuplicateTransaction,
    InvalidSignature,
    InvalidTransactionBody,
    /// The body names a different node than the one it was sent to.
    InvalidNodeAccount,
    InsufficientTxFee,
    InsufficientPayerBalance,
    MemoTooLong,
    InvalidAccountId,
    InvalidTokenId,
    TokenAlreadyAssociatedToAccount,
    TokenNotAssociatedToAccount,
    InvalidScheduleId,
    /// The schedule already has every signature it needs.
    NoNewValidSignatures,
}

impl Status {
    /// Precheck codes after which the same message may be sent to another
    /// node unchanged.
    pub fn is_retryable_precheck(self) -> bool {
        matches!(
            self,
            Status::Busy | Status::PlatformTransactionNotCreated | Status::PlatformNotActive
        )
    }

    /// Whether a receipt with this status is final.
    pub fn is_final(self) -> bool {
        !matches!(self, Status::Unknown | Status::Busy)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Ok => "OK",
            Status::Success => "SUCCESS",
            Status::Unknown => "UNKNOWN",
            Status::Busy => "BUSY",
            Status::PlatformTransactionNotCreated => "PLATFORM_TRANSACTION_NOT_CREATED",
            Status::PlatformNotActive => "PLATFORM_NOT_ACTIVE",
            Status::TransactionExpired => "TRANSACTION_EXPIRED",
            Status::InvalidTransactionStart => "INVALID_TRANSACTION_START",
            Status::InvalidTransactionDuration => "INVALID_TRANSACTION_DURATION",
            Status::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            Status::InvalidSignature => "INVALID_SIGNATURE",
            Status::InvalidTransactionBody => "INVALID_TRANSACTION_BODY",
            Status::InvalidNodeAccount => "INVALID_NODE_ACCOUNT",
            Status::InsufficientTxFee => "INSUFFICIENT_TX_FEE",
            Status::InsufficientPayerBalance => "INSUFFICIENT_PAYER_BALANCE",
            Status::MemoTooLong => "MEMO_TOO_LONG",
            Status::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Status::InvalidTokenId => "INVALID_TOKEN_ID",
            Status::TokenAlreadyAssociatedToAccount => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
            Status::TokenNotAssociatedToAccount => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
            Status::InvalidScheduleId => "INVALID_SCHEDULE_ID",
            Status::NoNewValidSignatures => "NO_NEW_VALID_SIGNATURES",
        };
        f.write_str(name)
    }
}

/// A node's immediate answer to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub precheck: Status,
}

impl TransactionResponse {
    pub fn new(precheck: Status) -> Self {
        Self { precheck }
    }

    /// A response that passed precheck.
    pub fn accepted() -> Self {
        Self::new(Status::Ok)
    }
}

/// The network's record of a transaction's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub status: Status,
    pub transaction_id: TransactionId,
    /// Set when the transaction created a schedule.
    pub schedule_id: Option<ScheduleId>,
    /// Set when the transaction triggered a scheduled inner transaction.
    pub scheduled_transaction_id: Option<TransactionId>,
}

impl TransactionReceipt {
    pub fn new(transaction_id: TransactionId, status: Status) -> Self {
        Self {
            status,
            transaction_id,
            schedule_id: None,
            scheduled_transaction_id: None,
        }
    }
}

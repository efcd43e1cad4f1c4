//! Transaction bodies and the per-kind data they carry.
//!
//! A [`TransactionBody`] is what gets signed and sent to one node. Its
//! [`TransactionData`] slot is a tagged union selected by transaction kind.
//! [`SchedulableTransactionBody`] wraps the same data but drops the node id
//! and fee, since both are decided when the schedule executes.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::{AccountId, ScheduleId, TokenId, TransactionId};

/// The full body sent to exactly one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    /// Shared by every node's copy.
    pub transaction_id: TransactionId,
    /// The only field that differs between per-node copies.
    pub node_account_id: AccountId,
    /// Maximum fee the payer is willing to pay, in tinybars.
    pub transaction_fee: u64,
    /// Length of the valid window starting at the id's valid-start.
    pub valid_duration_secs: u64,
    /// Free-form note, at most [`crate::config::MAX_MEMO_LENGTH`] bytes.
    pub memo: String,
    /// Kind-specific payload.
    pub data: TransactionData,
}

impl TransactionBody {
    /// Canonical byte encoding. Signatures are computed over these bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a body previously produced by [`TransactionBody::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// The body of a transaction whose execution is deferred to a schedule.
///
/// Has no node id and no fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulableTransactionBody {
    /// Memo of the inner transaction.
    pub memo: String,
    /// Kind-specific payload.
    pub data: TransactionData,
}

impl SchedulableTransactionBody {
    /// Canonical byte encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

/// The kind-specific slot of a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    CryptoTransfer(CryptoTransferBody),
    TokenAssociate(TokenAssociateBody),
    TokenDissociate(TokenDissociateBody),
    ScheduleSign(ScheduleSignBody),
}

/// One leg of a transfer. Negative amounts debit the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    pub account_id: AccountId,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoTransferBody {
    /// Sorted by account id; amounts sum to zero.
    pub transfers: Vec<AccountAmount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAssociateBody {
    pub account_id: AccountId,
    pub token_ids: Vec<TokenId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDissociateBody {
    pub account_id: AccountId,
    pub token_ids: Vec<TokenId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSignBody {
    pub schedule_id: ScheduleId,
}

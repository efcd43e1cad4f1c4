//! # Wire Messages
//!
//! The message shapes exchanged with nodes. Everything here is plain data
//! with serde derives; bodies are encoded with bincode's fixed-width
//! integer encoding, so two bodies that differ only in the node id differ
//! only in the node id's bytes.

pub mod body;
pub mod signature;
pub mod status;

pub use body::{
    AccountAmount, CryptoTransferBody, ScheduleSignBody, SchedulableTransactionBody,
    TokenAssociateBody, TokenDissociateBody, TransactionBody, TransactionData,
};
pub use signature::{SignatureMap, SignaturePair, SignedTransaction, TransactionList};
pub use status::{Status, TransactionReceipt, TransactionResponse};

//! # Transaction Module
//!
//! The lifecycle every transaction kind shares, from a mutable draft to a
//! set of signed per-node messages.
//!
//! ## Architecture
//!
//! ```text
//! kind.rs          TransactionKind capability trait and KindTag
//! builder.rs       Transaction<K>, the Draft phase (setters + freeze gate)
//! body.rs          BodyAssembler: envelope + payload -> one body per node
//! signing.rs       NodeMessage / SignatureManager: per-node signature maps
//! frozen.rs        FrozenTransaction<K>, the Frozen and Signed phases
//! shared.rs        SharedTransaction<K>, a lock-guarded draft for many tasks
//! schedule.rs      ScheduleAdapter: the schedulable encoding
//! transfer.rs      CryptoTransfer
//! token.rs         TokenAssociate / TokenDissociate
//! schedule_sign.rs ScheduleSign
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Draft**: configure a [`Transaction<K>`] with chained setters.
//! 2. **Freeze**: [`Transaction::freeze`] validates and fixes one body per
//!    candidate node.
//! 3. **Sign**: [`FrozenTransaction::sign`] adds a signature to every
//!    node's map. Repeat for each required signer.
//! 4. **Execute**: hand it to [`crate::network::Executor`].

pub mod body;
pub mod builder;
pub mod frozen;
pub mod kind;
pub mod schedule;
pub mod schedule_sign;
pub mod shared;
pub mod signing;
pub mod token;
pub mod transfer;

pub use body::{BodyAssembler, Envelope};
pub use builder::{Phase, Transaction};
pub use frozen::FrozenTransaction;
pub use kind::{KindTag, TransactionKind};
pub use schedule::{ScheduleAdapter, ScheduledMessage};
pub use schedule_sign::{ScheduleSign, ScheduleSignTransaction};
pub use shared::SharedTransaction;
pub use signing::{NodeMessage, SignatureManager};
pub use token::{
    TokenAssociate, TokenAssociateTransaction, TokenDissociate, TokenDissociateTransaction,
};
pub use transfer::{Transfer, TransferTransaction};

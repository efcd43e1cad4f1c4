//! The capability every concrete transaction kind provides.
//!
//! The engine is generic over [`TransactionKind`]: a kind only owns its own
//! payload fields and knows how to validate them and turn them into the
//! [`TransactionData`] slot of a body. Everything else (ids, node copies,
//! signing, submission) is shared.

use std::fmt;

use crate::error::{Error, Result};
use crate::proto::TransactionData;

// ---------------------------------------------------------------------------
// KindTag
// ---------------------------------------------------------------------------

/// Discriminant naming a transaction kind. Used to look up the remote
/// method that receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindTag {
    CryptoTransfer,
    TokenAssociate,
    TokenDissociate,
    ScheduleSign,
}

impl KindTag {
    /// Every kind this crate ships.
    pub const ALL: [KindTag; 4] = [
        KindTag::CryptoTransfer,
        KindTag::TokenAssociate,
        KindTag::TokenDissociate,
        KindTag::ScheduleSign,
    ];
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CryptoTransfer => write!(f, "CryptoTransfer"),
            Self::TokenAssociate => write!(f, "TokenAssociate"),
            Self::TokenDissociate => write!(f, "TokenDissociate"),
            Self::ScheduleSign => write!(f, "ScheduleSign"),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// A concrete transaction kind.
///
/// Implementors must keep [`build_data`](TransactionKind::build_data) pure:
/// the same payload must always produce the same data, since it is called
/// once per candidate node and the results must agree.
pub trait TransactionKind: Clone + Send + Sync + 'static {
    /// Which kind this is.
    const TAG: KindTag;

    /// Whether this kind may be wrapped in a schedule.
    const SCHEDULABLE: bool = true;

    /// Checks that every required payload field is present and sane.
    /// Called at assembly time, never by setters.
    fn validate(&self) -> Result<()>;

    /// The kind-specific slot of a regular body.
    fn build_data(&self) -> TransactionData;

    /// The kind-specific slot of a schedulable body.
    ///
    /// Defaults to the regular mapping for schedulable kinds and to
    /// [`Error::SchedulingUnsupported`] otherwise.
    fn build_scheduled_data(&self) -> Result<TransactionData> {
        if !Self::SCHEDULABLE {
            return Err(Error::SchedulingUnsupported(Self::TAG));
        }
        Ok(self.build_data())
    }
}

//! Entity and transaction identifiers.
//!
//! Accounts, tokens, and schedules share the `shard.realm.num` shape. They
//! serialize as that string in human-readable formats (JSON configs) and as
//! three fixed-width integers in binary formats, so an id always occupies
//! the same number of bytes inside an encoded body.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Entity ids
// ---------------------------------------------------------------------------

fn parse_entity(s: &str, what: &str) -> Result<(u64, u64, u64)> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 3 {
        return Err(Error::Validation(format!(
            "invalid {} '{}': expected shard.realm.num",
            what, s
        )));
    }
    let mut out = [0u64; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| Error::Validation(format!("invalid {} '{}'", what, s)))?;
    }
    Ok((out[0], out[1], out[2]))
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            /// Shard number.
            pub shard: u64,
            /// Realm number.
            pub realm: u64,
            /// Entity number within the realm.
            pub num: u64,
        }

        impl $name {
            /// Creates an id from its three components.
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let (shard, realm, num) = parse_entity(s, $what)?;
                Ok(Self::new(shard, realm, num))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.collect_str(self)
                } else {
                    (self.shard, self.realm, self.num).serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(D::Error::custom)
                } else {
                    let (shard, realm, num) = <(u64, u64, u64)>::deserialize(deserializer)?;
                    Ok(Self::new(shard, realm, num))
                }
            }
        }
    };
}

entity_id!(
    /// A ledger account. Payers, nodes, and token holders are all accounts.
    AccountId,
    "account id"
);

entity_id!(
    /// A fungible or non-fungible token type.
    TokenId,
    "token id"
);

entity_id!(
    /// A pending scheduled transaction.
    ScheduleId,
    "schedule id"
);

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Seconds + nanoseconds since the Unix epoch, the resolution the network
/// uses for valid-start and consensus times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Whole seconds since the epoch.
    pub seconds: i64,
    /// Nanoseconds within the second.
    pub nanos: u32,
}

impl Timestamp {
    /// Creates a timestamp from components.
    pub const fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Utc::now().into()
    }

    /// Returns this timestamp shifted forward by `d`.
    pub fn plus(self, d: Duration) -> Self {
        let total = self.nanos as u64 + d.subsec_nanos() as u64;
        Self {
            seconds: self.seconds + d.as_secs() as i64 + (total / 1_000_000_000) as i64,
            nanos: (total % 1_000_000_000) as u32,
        }
    }

    /// Returns this timestamp shifted back by `d`.
    pub fn minus(self, d: Duration) -> Self {
        let mut seconds = self.seconds - d.as_secs() as i64;
        let mut nanos = self.nanos as i64 - d.subsec_nanos() as i64;
        if nanos < 0 {
            nanos += 1_000_000_000;
            seconds -= 1;
        }
        Self {
            seconds,
            nanos: nanos as u32,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    /// Parses `seconds.fraction`, where the fraction has one to nine digits
    /// and reads as a decimal fraction of a second (`100.5` is half past).
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("invalid timestamp '{}'", s));

        let (secs, frac) = s.split_once('.').ok_or_else(invalid)?;
        if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let digits: u32 = frac.parse().map_err(|_| invalid())?;
        let nanos = digits * 10u32.pow(9 - frac.len() as u32);

        Ok(Self::new(secs.parse().map_err(|_| invalid())?, nanos))
    }
}

// ---------------------------------------------------------------------------
// TransactionId
// ---------------------------------------------------------------------------

/// Identifies one logical transaction: who pays, and from when it is valid.
///
/// The same id is shared by every per-node message of a transaction, which
/// is what lets the network deduplicate a submission that reached more
/// than one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    /// The paying account.
    pub account_id: AccountId,
    /// Start of the valid window.
    pub valid_start: Timestamp,
    /// Set on the inner transaction of a schedule.
    pub scheduled: bool,
    /// Distinguishes child transactions that share a parent id.
    pub nonce: Option<i32>,
}

impl TransactionId {
    /// Creates an id with an explicit valid-start.
    pub fn with_valid_start(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
            scheduled: false,
            nonce: None,
        }
    }

    /// Generates a fresh id for `payer`, backdated by a few seconds so that
    /// nodes with slightly slow clocks still accept it.
    pub fn generate(payer: AccountId) -> Self {
        let backdate = rand::thread_rng().gen_range(config::VALID_START_BACKDATE_MS);
        let valid_start = Timestamp::now().minus(Duration::from_millis(backdate));
        Self::with_valid_start(payer, valid_start)
    }

    /// Marks the id as belonging to a scheduled inner transaction.
    pub fn scheduled(mut self) -> Self {
        self.scheduled = true;
        self
    }

    /// Attaches a child nonce.
    pub fn with_nonce(mut self, nonce: i32) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// First instant at which the transaction is no longer valid.
    pub fn expires_at(&self, valid_duration: Duration) -> Timestamp {
        self.valid_start.plus(valid_duration)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account_id, self.valid_start)?;
        if self.scheduled {
            write!(f, "?scheduled")?;
        }
        if let Some(nonce) = self.nonce {
            write!(f, "/{}", nonce)?;
        }
        Ok(())
    }
}

impl FromStr for TransactionId {
    type Err = Error;

    /// Parses `shard.realm.num@seconds.nanos[?scheduled][/nonce]`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("invalid transaction id '{}'", s));

        let (account, rest) = s.split_once('@').ok_or_else(invalid)?;
        let (rest, nonce) = match rest.split_once('/') {
            Some((r, n)) => (r, Some(n.parse::<i32>().map_err(|_| invalid())?)),
            None => (rest, None),
        };
        let (time, scheduled) = match rest.strip_suffix("?scheduled") {
            Some(t) => (t, true),
            None => (rest, false),
        };

        Ok(Self {
            account_id: account.parse()?,
            valid_start: time.parse().map_err(|_| invalid())?,
            scheduled,
            nonce,
        })
    }
}

//! Routing from transaction kind to remote method.
//!
//! The table is built once, when the executor is constructed, and never
//! changes afterwards. A kind missing from it is a packaging defect, so
//! the executor refuses to start rather than fail on first use.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::transaction::KindTag;

/// A node-side service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Crypto,
    Token,
    Schedule,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crypto => write!(f, "proto.CryptoService"),
            Self::Token => write!(f, "proto.TokenService"),
            Self::Schedule => write!(f, "proto.ScheduleService"),
        }
    }
}

/// A (service, operation) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Method {
    pub service: Service,
    pub operation: &'static str,
}

impl Method {
    pub const fn new(service: Service, operation: &'static str) -> Self {
        Self { service, operation }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.operation)
    }
}

/// Kind → method table.
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<KindTag, Method>,
}

impl MethodRegistry {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The routes for every kind in [`KindTag::ALL`].
    pub fn standard() -> Self {
        Self::new()
            .register(KindTag::CryptoTransfer, Method::new(Service::Crypto, "cryptoTransfer"))
            .register(KindTag::TokenAssociate, Method::new(Service::Token, "associateTokens"))
            .register(KindTag::TokenDissociate, Method::new(Service::Token, "dissociateTokens"))
            .register(KindTag::ScheduleSign, Method::new(Service::Schedule, "signSchedule"))
    }

    /// Adds or replaces a route.
    pub fn register(mut self, kind: KindTag, method: Method) -> Self {
        self.methods.insert(kind, method);
        self
    }

    pub fn resolve(&self, kind: KindTag) -> Result<Method> {
        self.methods
            .get(&kind)
            .copied()
            .ok_or(Error::UnregisteredKind(kind))
    }

    /// Fails on the first kind in `kinds` that has no route.
    pub fn ensure_complete(&self, kinds: &[KindTag]) -> Result<()> {
        kinds.iter().try_for_each(|kind| self.resolve(*kind).map(|_| ()))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

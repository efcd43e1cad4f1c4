//! # Network Module
//!
//! Getting a signed transaction to the network and finding out what
//! happened to it.
//!
//! ```text
//! registry.rs  MethodRegistry: kind -> (service, operation)
//! channel.rs   Network trait: submit + receipt query, ChannelError
//! executor.rs  Executor: node selection, retry/backoff, receipt polling
//! backoff.rs   Exponential backoff with jitter
//! cancel.rs    CancelToken
//! mock.rs      MockNetwork, a scripted in-memory Network
//! ```

pub mod backoff;
pub mod cancel;
pub mod channel;
pub mod executor;
pub mod mock;
pub mod registry;

pub use cancel::CancelToken;
pub use channel::{ChannelError, Network};
pub use executor::{Attempt, AttemptOutcome, Clock, ExecutionReport, Executor};
pub use mock::MockNetwork;
pub use registry::{Method, MethodRegistry, Service};

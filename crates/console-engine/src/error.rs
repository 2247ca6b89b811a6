//! Console error taxonomy
//!
//! Every variant is recoverable at the session boundary.

use crate::host::HostError;
use crate::session::SessionState;
use thiserror::Error;

/// Errors reported by [`crate::ConsoleSession`] and [`crate::Console`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Failed to fetch log replay: {0}")]
    ReplayFailed(#[source] HostError),

    #[error("Failed to subscribe to live log events: {0}")]
    SubscriptionFailed(#[source] HostError),

    #[error("Failed to dispatch command: {0}")]
    CommandDispatchFailed(#[source] HostError),

    #[error("Invalid buffer capacity {0}, must be greater than zero")]
    InvalidCapacity(usize),

    #[error("Session is already open (state: {0:?})")]
    AlreadyOpen(SessionState),
}

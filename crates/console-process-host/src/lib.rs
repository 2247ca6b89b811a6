//! Process-backed console host
//!
//! [`ProcessHost`] attaches to a child process' stdio and serves it through
//! the [`console_engine::ConsoleHost`] capabilities:
//!
//! - stdout lines become live events, stderr lines are prefixed with `ERROR: `
//! - the most recent lines are retained and answer replay requests
//! - commands are written to stdin, one per line
//!
//! Starting, stopping and restarting the process is left to the caller.

mod error;
mod host;

pub use error::ProcessHostError;
pub use host::{ProcessHost, STDERR_PREFIX};

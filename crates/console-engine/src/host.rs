//! Host capability trait
//!
//! The backend that owns the managed process is consumed through
//! [`ConsoleHost`]: a request/response replay fetch, a push-style live
//! subscription, and command invocation.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync`; hosts usually deliver live events
//! from their own reader tasks.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Failures reported by a host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Host unavailable: {0}")]
    Unavailable(String),

    #[error("Host did not answer in time")]
    Timeout,

    #[error("Host rejected the request: {0}")]
    Rejected(String),
}

/// Opaque handle identifying one live subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One line pushed through a [`LiveSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveLine {
    /// Position in the host's output, for hosts that number their lines
    pub index: Option<u64>,
    pub text: String,
}

impl LiveLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            index: None,
            text: text.into(),
        }
    }

    pub fn at(index: u64, text: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            text: text.into(),
        }
    }

    /// Whether a replay numbered through `replay_through` already holds this line
    pub fn is_covered_by(&self, replay_through: Option<u64>) -> bool {
        matches!((self.index, replay_through), (Some(index), Some(through)) if index <= through)
    }
}

/// Retained history returned by [`ConsoleHost::fetch_replay`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replay {
    /// Oldest first
    pub lines: Vec<String>,

    /// Output index of the last line in `lines`. Live lines numbered at or
    /// below it were recorded before the snapshot and must not be ingested
    /// again.
    pub through: Option<u64>,
}

impl From<Vec<String>> for Replay {
    fn from(lines: Vec<String>) -> Self {
        Self {
            lines,
            through: None,
        }
    }
}

/// Event callback handed to [`ConsoleHost::subscribe_live`].
///
/// Lines delivered here reach the session in delivery order.
#[derive(Debug, Clone)]
pub struct LiveSink {
    tx: mpsc::UnboundedSender<LiveLine>,
}

impl LiveSink {
    /// Create a sink and the receiver the session reads from
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LiveLine>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver one unnumbered line.
    ///
    /// Returns `false` once the receiving session is gone; hosts should then
    /// drop the sink.
    pub fn deliver(&self, line: impl Into<String>) -> bool {
        self.tx.send(LiveLine::new(line)).is_ok()
    }

    /// Deliver a line stamped with its output index
    pub fn deliver_at(&self, index: u64, line: impl Into<String>) -> bool {
        self.tx.send(LiveLine::at(index, line)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Capabilities a console consumes from the process host
///
/// # Example
///
/// ```rust,ignore
/// async fn tail(host: &dyn ConsoleHost) -> Result<(), HostError> {
///     let (sink, mut events) = LiveSink::channel();
///     let id = host.subscribe_live(sink).await?;
///     let replay = host.fetch_replay().await?;
///     for line in &replay.lines {
///         println!("{line}");
///     }
///     while let Some(line) = events.recv().await {
///         if !line.is_covered_by(replay.through) {
///             println!("{}", line.text);
///         }
///     }
///     host.unsubscribe(id);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ConsoleHost: Send + Sync {
    /// Fetch the retained log history, oldest first
    async fn fetch_replay(&self) -> Result<Replay, HostError>;

    /// Start delivering live lines to `sink`
    async fn subscribe_live(&self, sink: LiveSink) -> Result<SubscriptionId, HostError>;

    /// Stop delivering to a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Forward a command line to the managed process
    async fn dispatch_command(&self, text: &str) -> Result<(), HostError>;
}

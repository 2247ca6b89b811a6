//! Live log console engine
//!
//! Merges a one-shot historical replay with an indefinite live event stream
//! into a bounded, classified line buffer, and keeps the small pieces of UI
//! state a console needs (follow mode, command history).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  fetch_replay / subscribe_live   ┌─────────────────┐
//! │ ConsoleHost  │◄─────────────────────────────────│ ConsoleSession  │
//! │ (trait)      │──── LiveSink events ────────────►│  pending queue  │
//! └──────────────┘                                  │  BoundedLogBuf  │
//!                                                   └────────┬────────┘
//!                                                            │ snapshot / changes
//!                        ┌───────────────────────────────────▼────────┐
//!                        │ Console (facade for the presentation layer) │
//!                        │  ScrollFollowController                     │
//!                        │  CommandHistoryNavigator                    │
//!                        └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use console_engine::Console;
//!
//! let mut console = Console::new(host);
//! console.open_session(1000).await?;
//! loop {
//!     console.pump();
//!     for line in console.lines().iter() {
//!         println!("{} {}", line.severity, line.display_text);
//!     }
//! }
//! ```

pub mod buffer;
pub mod console;
pub mod error;
pub mod history;
pub mod host;
pub mod line;
pub mod scroll;
pub mod session;

pub use buffer::{BoundedLogBuffer, DEFAULT_CAPACITY};
pub use console::Console;
pub use error::ConsoleError;
pub use history::CommandHistoryNavigator;
pub use host::{ConsoleHost, HostError, LiveLine, LiveSink, Replay, SubscriptionId};
pub use line::LogLine;
pub use scroll::ScrollFollowController;
pub use session::{ConsoleSession, SessionState};

// Re-export classifier types so front ends only need this crate
pub use console_classifier::{classify, ClassifiedLine, Severity};

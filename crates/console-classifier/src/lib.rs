//! Console Line Classifier
//!
//! Turns raw server console output into display text plus a severity,
//! stripping terminal color escapes before matching severity markers.
//!
//! # Example
//!
//! ```
//! use console_classifier::{classify, Severity};
//!
//! let line = classify("\x1b[33m[12:00:01] [Server thread/WARN]: Can't keep up!\x1b[0m");
//! assert_eq!(line.severity, Severity::Warn);
//! assert_eq!(line.display_text, "[12:00:01] [Server thread/WARN]: Can't keep up!");
//! ```

mod ansi;
mod classifier;
mod types;

pub use ansi::strip_ansi;
pub use classifier::{classify, severity_of, SEVERITY_MARKERS};
pub use types::*;

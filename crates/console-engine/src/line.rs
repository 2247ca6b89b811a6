//! Classified console line

use console_classifier::{classify, Severity};
use serde::{Deserialize, Serialize};

/// A single ingested console line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Ingestion order within the owning session. Only meant for stable list keys.
    pub sequence: u64,

    /// Text exactly as delivered by the host (escapes preserved)
    pub raw_text: String,

    /// Text with terminal escapes removed
    pub display_text: String,

    /// Severity derived from `display_text`
    pub severity: Severity,
}

impl LogLine {
    /// Classify `raw_text` and tag it with `sequence`
    pub fn new(sequence: u64, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let classified = classify(&raw_text);
        Self {
            sequence,
            raw_text,
            display_text: classified.display_text,
            severity: classified.severity,
        }
    }
}

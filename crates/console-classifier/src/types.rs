//! Type definitions for classified console lines

use serde::{Deserialize, Serialize};

/// Severity of a console line, used by front ends to pick a style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No marker matched
    #[default]
    Default,
    /// `INFO` marker
    Info,
    /// `WARN` marker
    Warn,
    /// `ERROR` or `SEVERE` marker
    Error,
    /// Server finished starting (`Done (`)
    Success,
}

/// Result of classifying one raw line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    /// Text with terminal escapes removed
    pub display_text: String,

    /// Severity derived from `display_text`
    pub severity: Severity,
}

impl Severity {
    /// Lowercase name, matches the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Default => "default",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Severity classification

use crate::ansi::strip_ansi;
use crate::types::{ClassifiedLine, Severity};

/// Case-sensitive markers in priority order. First match wins.
pub const SEVERITY_MARKERS: &[(&str, Severity)] = &[
    ("ERROR", Severity::Error),
    ("SEVERE", Severity::Error),
    ("WARN", Severity::Warn),
    ("INFO", Severity::Info),
    ("Done (", Severity::Success),
];

/// Classify a raw console line.
///
/// Escapes are stripped first, so a colored `WARN` still matches. Never fails;
/// lines without a marker are [`Severity::Default`].
pub fn classify(raw: &str) -> ClassifiedLine {
    let display_text = strip_ansi(raw);
    let severity = severity_of(&display_text);
    ClassifiedLine {
        display_text,
        severity,
    }
}

/// Severity of already-stripped text
pub fn severity_of(text: &str) -> Severity {
    SEVERITY_MARKERS
        .iter()
        .find(|(marker, _)| text.contains(marker))
        .map(|(_, severity)| *severity)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_marker_lines() {
        let cases = [
            ("[Server thread/ERROR]: Encountered an unexpected exception", Severity::Error),
            ("[Server thread/SEVERE]: This crash report has been saved", Severity::Error),
            ("[Server thread/WARN]: Can't keep up!", Severity::Warn),
            ("[Server thread/INFO]: Starting minecraft server", Severity::Info),
            ("Done (4.512s)! For help, type \"help\"", Severity::Success),
            ("Preparing spawn area: 87%", Severity::Default),
        ];

        for (line, expected) in cases {
            assert_eq!(classify(line).severity, expected, "line: {line}");
        }
    }

    #[test]
    fn test_warn_beats_info() {
        assert_eq!(severity_of("INFO something WARN"), Severity::Warn);
    }

    #[test]
    fn test_error_beats_completion_marker() {
        // Startup line that mentions an error wins over the success marker
        assert_eq!(
            severity_of("[Server thread/INFO]: Done (2.0s)! ERROR count: 0"),
            Severity::Error
        );
    }

    #[test]
    fn test_info_beats_completion_marker() {
        // The usual vanilla "Done" line is logged at INFO level
        assert_eq!(
            severity_of("[12:00:00] [Server thread/INFO]: Done (3.1s)!"),
            Severity::Info
        );
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(severity_of("warning: lowercase does not count"), Severity::Default);
        assert_eq!(severity_of("done (1s)"), Severity::Default);
    }

    #[test]
    fn test_escapes_stripped_before_matching() {
        let line = classify("\x1b[31mERR\x1b[0mOR split by a color code");
        assert_eq!(line.display_text, "ERROR split by a color code");
        assert_eq!(line.severity, Severity::Error);
    }

    #[test]
    fn test_empty_line_is_default() {
        let line = classify("");
        assert_eq!(line.display_text, "");
        assert_eq!(line.severity, Severity::Default);
    }
}

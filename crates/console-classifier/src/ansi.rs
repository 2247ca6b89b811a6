//! ANSI escape handling

use ansi_parser::{AnsiParser, Output};

/// Remove terminal escape sequences (colors, cursor movement) from a line.
///
/// Only the text blocks between escapes are kept, in order.
pub fn strip_ansi(line: &str) -> String {
    // Fast path: most server lines carry no escapes at all
    if !line.contains('\x1b') {
        return line.to_string();
    }

    line.ansi_parse()
        .filter_map(|output| match output {
            Output::TextBlock(text) => Some(text),
            Output::Escape(_) => None,
        })
        .collect()
}

//! Command input history
//!
//! Shell-style recall of previously submitted commands. The cursor counts
//! back from the most recent entry; `None` means the user is not browsing.

/// Submitted commands plus a browse cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistoryNavigator {
    /// Oldest first, most recent last
    commands: Vec<String>,
    /// Offset back from the most recent command
    cursor: Option<usize>,
}

impl CommandHistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted command and stop browsing
    pub fn submit(&mut self, text: impl Into<String>) {
        self.commands.push(text.into());
        self.cursor = None;
    }

    /// Step to an older command (arrow up).
    ///
    /// Stays on the oldest entry once reached. Returns `None` only when
    /// there is no history at all.
    pub fn navigate_back(&mut self) -> Option<&str> {
        let last = self.commands.len().checked_sub(1)?;
        let cursor = match self.cursor {
            None => 0,
            Some(cursor) if cursor < last => cursor + 1,
            Some(cursor) => cursor,
        };
        self.cursor = Some(cursor);
        self.command_at(cursor)
    }

    /// Step to a newer command (arrow down).
    ///
    /// Moving past the most recent entry ends browsing and returns an empty
    /// string so the input can be cleared.
    pub fn navigate_forward(&mut self) -> &str {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                self.command_at(cursor - 1).unwrap_or_default()
            }
            _ => {
                self.cursor = None;
                ""
            }
        }
    }

    /// Current browse offset, `None` when not browsing
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_browsing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Submitted commands, oldest first
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn command_at(&self, cursor: usize) -> Option<&str> {
        let index = self.commands.len().checked_sub(1 + cursor)?;
        self.commands.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_and_forth() {
        let mut history = CommandHistoryNavigator::new();
        history.submit("help");
        history.submit("list");

        assert_eq!(history.navigate_back(), Some("list"));
        assert_eq!(history.navigate_back(), Some("help"));
        assert_eq!(history.navigate_back(), Some("help"));
        assert_eq!(history.cursor(), Some(1));

        assert_eq!(history.navigate_forward(), "list");
        assert_eq!(history.navigate_forward(), "");
        assert!(!history.is_browsing());
    }

    #[test]
    fn test_empty_history() {
        let mut history = CommandHistoryNavigator::new();
        assert_eq!(history.navigate_back(), None);
        assert_eq!(history.cursor(), None);
        assert_eq!(history.navigate_forward(), "");
    }

    #[test]
    fn test_forward_without_browsing_is_empty() {
        let mut history = CommandHistoryNavigator::new();
        history.submit("say hi");

        assert_eq!(history.navigate_forward(), "");
        assert_eq!(history.cursor(), None);
        assert_eq!(history.navigate_back(), Some("say hi"));
    }

    #[test]
    fn test_submit_resets_cursor() {
        let mut history = CommandHistoryNavigator::new();
        history.submit("time set day");
        history.submit("weather clear");
        history.navigate_back();
        history.navigate_back();

        history.submit("list");
        assert_eq!(history.cursor(), None);
        assert_eq!(history.navigate_back(), Some("list"));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_single_entry_stays_put() {
        let mut history = CommandHistoryNavigator::new();
        history.submit("stop");

        assert_eq!(history.navigate_back(), Some("stop"));
        assert_eq!(history.navigate_back(), Some("stop"));
        assert_eq!(history.cursor(), Some(0));
    }
}

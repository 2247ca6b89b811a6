//! Presentation facade
//!
//! Bundles a [`ConsoleSession`] with the UI-side state machines so a front
//! end talks to a single value.

use crate::buffer::BoundedLogBuffer;
use crate::error::ConsoleError;
use crate::history::CommandHistoryNavigator;
use crate::host::ConsoleHost;
use crate::line::LogLine;
use crate::scroll::ScrollFollowController;
use crate::session::{ConsoleSession, SessionState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Everything a console view needs
pub struct Console<H: ConsoleHost> {
    session: ConsoleSession<H>,
    scroll: ScrollFollowController,
    history: CommandHistoryNavigator,
}

impl<H: ConsoleHost> Console<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self::from_session(ConsoleSession::new(host))
    }

    /// Wrap a pre-configured session (e.g. one with a replay timeout)
    pub fn from_session(session: ConsoleSession<H>) -> Self {
        Self {
            session,
            scroll: ScrollFollowController::new(),
            history: CommandHistoryNavigator::new(),
        }
    }

    pub fn with_replay_timeout(self, timeout: Duration) -> Self {
        Self {
            session: self.session.with_replay_timeout(timeout),
            ..self
        }
    }

    pub async fn open_session(&mut self, capacity: usize) -> Result<(), ConsoleError> {
        self.session.open(capacity).await
    }

    pub fn close_session(&mut self) {
        self.session.close();
    }

    /// Submit the typed command. On error the caller keeps the input for retry.
    pub async fn submit(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.session.submit_command(text, &mut self.history).await
    }

    pub fn navigate_history_back(&mut self) -> Option<&str> {
        self.history.navigate_back()
    }

    pub fn navigate_history_forward(&mut self) -> &str {
        self.history.navigate_forward()
    }

    pub fn report_viewport_position(&mut self, distance_from_bottom: usize, threshold: usize) {
        self.scroll
            .record_viewport_position(distance_from_bottom, threshold);
    }

    pub fn resume_follow(&mut self) {
        self.scroll.resume_follow();
    }

    pub fn should_auto_scroll(&self) -> bool {
        self.scroll.should_auto_scroll()
    }

    pub fn clear_view(&mut self) {
        self.session.clear_view();
    }

    /// Ingest live lines that already arrived, returns how many
    pub fn pump(&mut self) -> usize {
        self.session.pump()
    }

    pub fn lines(&self) -> &BoundedLogBuffer {
        self.session.lines()
    }

    pub fn snapshot(&self) -> Vec<LogLine> {
        self.session.snapshot()
    }

    pub fn changes(&self) -> watch::Receiver<u64> {
        self.session.changes()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &ConsoleSession<H> {
        &self.session
    }

    pub fn scroll(&self) -> &ScrollFollowController {
        &self.scroll
    }

    pub fn history(&self) -> &CommandHistoryNavigator {
        &self.history
    }
}

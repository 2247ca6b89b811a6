//! Application state and key handling
//!
//! `scroll_offset` counts rows from the bottom of the log: 0 shows the
//! newest lines, larger values show older ones.

use console_config::ConsoleSettings;
use console_engine::{Console, ConsoleHost, LogLine, SessionState};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct App<H: ConsoleHost> {
    console: Console<H>,
    capacity: usize,
    near_bottom_threshold: usize,
    /// Text in the command input line
    pub input: String,
    scroll_offset: usize,
    /// Rows available to the log pane at the last render
    page_height: usize,
    /// Last error, shown in the status line until the next success
    status: Option<String>,
    pub running: bool,
}

impl<H: ConsoleHost> App<H> {
    pub fn new(console: Console<H>, settings: &ConsoleSettings) -> Self {
        Self {
            console,
            capacity: settings.capacity,
            near_bottom_threshold: settings.near_bottom_threshold,
            input: String::new(),
            scroll_offset: 0,
            page_height: 0,
            status: None,
            running: true,
        }
    }

    /// Open (or reopen) the console session
    pub async fn open(&mut self) {
        self.console.close_session();
        match self.console.open_session(self.capacity).await {
            Ok(()) => {
                log::info!("Console session live with {} lines", self.console.lines().len());
                self.status = None;
                self.follow();
            }
            Err(e) => {
                log::error!("Failed to open console session: {}", e);
                self.status = Some(format!("Failed to open console: {}", e));
            }
        }
    }

    /// Ingest pending live lines, keeping the viewport anchored when not following
    pub fn tick(&mut self) -> usize {
        let added = self.console.pump();
        if added > 0 {
            if self.console.should_auto_scroll() {
                self.scroll_offset = 0;
            } else {
                self.scroll_offset = (self.scroll_offset + added).min(self.max_scroll());
            }
        }
        added
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => self.running = false,
            KeyCode::Esc => self.running = false,
            KeyCode::Char('l') if ctrl => self.clear(),
            KeyCode::Enter => self.submit().await,
            KeyCode::Up => {
                if let Some(command) = self.console.navigate_history_back() {
                    self.input = command.to_string();
                }
            }
            KeyCode::Down => self.input = self.console.navigate_history_forward().to_string(),
            KeyCode::PageUp => self.scroll_up(self.page_step()),
            KeyCode::PageDown => self.scroll_down(self.page_step()),
            KeyCode::Home => self.scroll_up(self.max_scroll()),
            KeyCode::End => self.follow(),
            KeyCode::F(5) => self.open().await,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !ctrl => self.input.push(c),
            _ => {}
        }
    }

    /// Send the input line; on failure the input is kept for retry
    async fn submit(&mut self) {
        let command = self.input.clone();
        match self.console.submit(&command).await {
            Ok(()) => {
                self.input.clear();
                self.status = None;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn clear(&mut self) {
        self.console.clear_view();
        self.follow();
    }

    fn scroll_up(&mut self, rows: usize) {
        self.scroll_offset = (self.scroll_offset + rows).min(self.max_scroll());
        self.report_position();
    }

    /// Paging all the way down counts as resuming follow
    fn scroll_down(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
        if self.scroll_offset == 0 {
            self.follow();
        } else {
            self.report_position();
        }
    }

    fn follow(&mut self) {
        self.scroll_offset = 0;
        self.console.resume_follow();
    }

    fn report_position(&mut self) {
        self.console
            .report_viewport_position(self.scroll_offset, self.near_bottom_threshold);
    }

    fn page_step(&self) -> usize {
        self.page_height.saturating_sub(1).max(1)
    }

    fn max_scroll(&self) -> usize {
        self.console.lines().len().saturating_sub(self.page_height)
    }

    pub fn set_page_height(&mut self, rows: usize) {
        self.page_height = rows;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Lines that fit into `available_height` rows at the current offset
    pub fn visible_lines(&self, available_height: usize) -> impl Iterator<Item = &LogLine> {
        let lines = self.console.lines();
        let total = lines.len();

        let max_scroll = total.saturating_sub(available_height);
        let effective_scroll = self.scroll_offset.min(max_scroll);

        // end is the index AFTER the last visible line
        let end = total.saturating_sub(effective_scroll);
        let start = end.saturating_sub(available_height);

        lines.iter().skip(start).take(end - start)
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn is_following(&self) -> bool {
        self.console.should_auto_scroll()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.console.state()
    }

    pub fn line_count(&self) -> usize {
        self.console.lines().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_engine::ConsoleSession;
    use console_process_host::ProcessHost;
    use pretty_assertions::assert_eq;
    use ratatui::crossterm::event::KeyEventKind;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};

    struct Harness {
        app: App<ProcessHost>,
        host: Arc<ProcessHost>,
        stdout: DuplexStream,
        stdin: DuplexStream,
        _stderr: DuplexStream,
    }

    fn settings(capacity: usize) -> ConsoleSettings {
        ConsoleSettings {
            capacity,
            near_bottom_threshold: 0,
            ..ConsoleSettings::default()
        }
    }

    fn harness(capacity: usize) -> Harness {
        let (stdout_w, stdout_r) = duplex(4096);
        let (stderr_w, stderr_r) = duplex(4096);
        let (stdin_w, stdin_r) = duplex(4096);
        let host = Arc::new(ProcessHost::attach(stdout_r, stderr_r, stdin_w, 100).unwrap());
        let console = Console::from_session(ConsoleSession::new(Arc::clone(&host)));
        Harness {
            app: App::new(console, &settings(capacity)),
            host,
            stdout: stdout_w,
            stdin: stdin_r,
            _stderr: stderr_w,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: ratatui::crossterm::event::KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char(c))
        }
    }

    async fn type_text(app: &mut App<ProcessHost>, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await;
        }
    }

    /// Write lines to the fake stdout and pump until the last one arrived
    async fn emit(h: &mut Harness, lines: &[&str]) {
        let last = lines.last().copied().unwrap_or_default();
        for line in lines {
            h.stdout
                .write_all(format!("{}\n", line).as_bytes())
                .await
                .unwrap();
        }
        for _ in 0..200 {
            h.app.tick();
            if h.app.console.lines().last().map(|l| l.raw_text.as_str()) == Some(last) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("lines never arrived");
    }

    fn visible(app: &App<ProcessHost>, rows: usize) -> Vec<String> {
        app.visible_lines(rows)
            .map(|line| line.display_text.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_submit_writes_to_stdin_and_clears_input() {
        let mut h = harness(100);
        h.app.open().await;
        assert_eq!(h.app.state(), SessionState::Live);

        type_text(&mut h.app, "list").await;
        h.app.handle_key(key(KeyCode::Enter)).await;
        assert_eq!(h.app.input, "");
        assert_eq!(h.app.status(), None);

        let mut buf = [0u8; 5];
        h.stdin.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"list\n");
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_input() {
        let mut h = harness(100);
        h.app.open().await;
        drop(h.stdout);
        // Wait until both output streams are seen as closed
        drop(h._stderr);
        for _ in 0..200 {
            if !h.host.is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        type_text(&mut h.app, "stop").await;
        h.app.handle_key(key(KeyCode::Enter)).await;

        assert_eq!(h.app.input, "stop");
        assert!(h.app.status().unwrap().contains("server not running"));
    }

    #[tokio::test]
    async fn test_history_keys() {
        let mut h = harness(100);
        h.app.open().await;

        for command in ["help", "list"] {
            type_text(&mut h.app, command).await;
            h.app.handle_key(key(KeyCode::Enter)).await;
        }

        h.app.handle_key(key(KeyCode::Up)).await;
        assert_eq!(h.app.input, "list");
        h.app.handle_key(key(KeyCode::Up)).await;
        assert_eq!(h.app.input, "help");
        h.app.handle_key(key(KeyCode::Up)).await;
        assert_eq!(h.app.input, "help");
        h.app.handle_key(key(KeyCode::Down)).await;
        assert_eq!(h.app.input, "list");
        h.app.handle_key(key(KeyCode::Down)).await;
        assert_eq!(h.app.input, "");
    }

    #[tokio::test]
    async fn test_follow_and_anchor() {
        let mut h = harness(100);
        h.app.open().await;
        h.app.set_page_height(2);

        emit(&mut h, &["one", "two", "three", "four"]).await;
        assert!(h.app.is_following());
        assert_eq!(visible(&h.app, 2), vec!["three", "four"]);

        h.app.handle_key(key(KeyCode::PageUp)).await;
        assert!(!h.app.is_following());
        assert_eq!(h.app.scroll_offset(), 1);
        assert_eq!(visible(&h.app, 2), vec!["two", "three"]);

        // New output does not move the viewport while scrolled back
        emit(&mut h, &["five"]).await;
        assert_eq!(visible(&h.app, 2), vec!["two", "three"]);

        h.app.handle_key(key(KeyCode::End)).await;
        assert!(h.app.is_following());
        assert_eq!(visible(&h.app, 2), vec!["four", "five"]);
    }

    #[tokio::test]
    async fn test_home_then_page_down_resumes_follow() {
        let mut h = harness(100);
        h.app.open().await;
        h.app.set_page_height(3);
        emit(&mut h, &["a", "b", "c", "d", "e", "f"]).await;

        h.app.handle_key(key(KeyCode::Home)).await;
        assert_eq!(visible(&h.app, 3), vec!["a", "b", "c"]);
        assert!(!h.app.is_following());

        h.app.handle_key(key(KeyCode::PageDown)).await;
        h.app.handle_key(key(KeyCode::PageDown)).await;
        assert_eq!(h.app.scroll_offset(), 0);
        assert!(h.app.is_following());
    }

    #[tokio::test]
    async fn test_clear_and_quit() {
        let mut h = harness(100);
        h.app.open().await;
        emit(&mut h, &["[Server thread/INFO]: hello"]).await;
        assert_eq!(h.app.line_count(), 1);

        h.app.handle_key(ctrl('l')).await;
        assert_eq!(h.app.line_count(), 0);
        assert_eq!(h.app.state(), SessionState::Live);

        assert!(h.app.running);
        h.app.handle_key(ctrl('c')).await;
        assert!(!h.app.running);
    }

    #[tokio::test]
    async fn test_capacity_from_settings() {
        let mut h = harness(3);
        h.app.open().await;
        emit(&mut h, &["1", "2", "3", "4", "5"]).await;
        assert_eq!(h.app.line_count(), 3);
        assert_eq!(visible(&h.app, 10), vec!["3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_reopen_replays_host_history() {
        let mut h = harness(100);
        h.app.open().await;
        emit(&mut h, &["before"]).await;
        h.app.handle_key(ctrl('l')).await;
        assert_eq!(h.app.line_count(), 0);

        h.app.handle_key(key(KeyCode::F(5))).await;
        assert_eq!(h.app.state(), SessionState::Live);
        assert_eq!(visible(&h.app, 10), vec!["before"]);
    }
}

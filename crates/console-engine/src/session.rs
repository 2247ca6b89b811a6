//! Console session lifecycle
//!
//! A session opens by fetching the host's log replay and subscribing to live
//! events at the same time. Either may complete first, so live lines that
//! arrive while the replay is still outstanding are parked in a pending
//! queue. Once both have completed the buffer holds, in order:
//!
//! 1. the replay lines
//! 2. the pending live lines, in arrival order
//! 3. every later live line, as it is pumped
//!
//! A live line recorded after the subscription but before the replay
//! snapshot reaches both feeds. Hosts that number their lines report the
//! last replayed index with the replay, and live lines at or below it are
//! dropped.
//!
//! ```text
//!        open()                 replay ingested + subscribed           close()
//! Idle ─────────► Replaying ─────────────────────────────────► Live ─────────► Closed
//!   ▲                 │                                                          │
//!   └─ failure/drop ──┘                                                          │
//!   ▲                                                                            │
//!   └────────────────────────────── open() ──────────────────────────────────────┘
//! ```

use crate::buffer::BoundedLogBuffer;
use crate::error::ConsoleError;
use crate::history::CommandHistoryNavigator;
use crate::host::{ConsoleHost, HostError, LiveLine, LiveSink, Replay, SubscriptionId};
use crate::line::LogLine;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};

/// Lifecycle state of a [`ConsoleSession`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Never opened, or the last open failed or was cancelled
    #[default]
    Idle,
    /// Waiting for the replay and/or the live subscription
    Replaying,
    /// Replay ingested and subscribed; live lines go straight to the buffer
    Live,
    /// Torn down by [`ConsoleSession::close`]
    Closed,
}

/// Orchestrates replay-then-live ingestion against a [`ConsoleHost`].
///
/// The session is the only writer into its [`BoundedLogBuffer`].
pub struct ConsoleSession<H: ConsoleHost> {
    host: Arc<H>,
    state: SessionState,
    buffer: BoundedLogBuffer,
    /// Capacity requested by the current `open`
    capacity: usize,
    /// Live lines received before the replay was ingested
    pending: VecDeque<LiveLine>,
    replay_ingested: bool,
    /// Last host output index contained in the ingested replay
    replay_through: Option<u64>,
    subscription: Option<SubscriptionId>,
    live_rx: Option<mpsc::UnboundedReceiver<LiveLine>>,
    next_sequence: u64,
    replay_timeout: Option<Duration>,
    revision: watch::Sender<u64>,
}

impl<H: ConsoleHost> ConsoleSession<H> {
    pub fn new(host: Arc<H>) -> Self {
        let buffer = BoundedLogBuffer::default();
        let capacity = buffer.capacity();
        let (revision, _) = watch::channel(0);

        Self {
            host,
            state: SessionState::Idle,
            buffer,
            capacity,
            pending: VecDeque::new(),
            replay_ingested: false,
            replay_through: None,
            subscription: None,
            live_rx: None,
            next_sequence: 0,
            replay_timeout: None,
            revision,
        }
    }

    /// Fail the replay fetch with [`HostError::Timeout`] after `timeout`
    pub fn with_replay_timeout(mut self, timeout: Duration) -> Self {
        self.replay_timeout = Some(timeout);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current lines, oldest first
    pub fn lines(&self) -> &BoundedLogBuffer {
        &self.buffer
    }

    /// Owned copy of the current lines
    pub fn snapshot(&self) -> Vec<LogLine> {
        self.buffer.snapshot()
    }

    /// Receiver that observes a new revision after every buffer change
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Whether the host is still delivering live events
    pub fn is_streaming(&self) -> bool {
        self.state == SessionState::Live && self.live_rx.is_some()
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Open the session: fetch the replay and subscribe to live events.
    ///
    /// On success the session is [`SessionState::Live`]. A failed replay
    /// returns [`ConsoleError::ReplayFailed`] as soon as it is known, keeps
    /// the previous lines and tears down any subscription already
    /// established. On [`ConsoleError::SubscriptionFailed`] the replay is
    /// still ingested. After either failure, or when the returned future is
    /// dropped before completing, the session is back to
    /// [`SessionState::Idle`] and `open` may be retried.
    pub async fn open(&mut self, capacity: usize) -> Result<(), ConsoleError> {
        self.begin_open(capacity)?;

        let (sink, mut live_rx) = LiveSink::channel();
        let host = Arc::clone(&self.host);
        let replay = fetch_replay_with_timeout(host.as_ref(), self.replay_timeout);
        let subscribe = host.subscribe_live(sink);
        tokio::pin!(replay, subscribe);

        let mut guard = OpenGuard {
            session: self,
            armed: true,
        };

        let mut replay_error: Option<HostError> = None;
        let mut subscribe_error: Option<HostError> = None;
        let mut replay_done = false;
        let mut subscribe_done = false;

        while !(replay_done && subscribe_done) {
            tokio::select! {
                biased;

                result = &mut subscribe, if !subscribe_done => {
                    subscribe_done = true;
                    match result {
                        Ok(id) => guard.session.on_subscription_established(id),
                        Err(e) => subscribe_error = Some(e),
                    }
                }
                result = &mut replay, if !replay_done => {
                    replay_done = true;
                    match result {
                        Ok(replay) => guard.session.on_replay_resolved(replay),
                        Err(e) => {
                            // Nothing to go live on, stop waiting for the subscription
                            replay_error = Some(e);
                            break;
                        }
                    }
                }
                Some(event) = live_rx.recv() => guard.session.on_live_event(event),
            }
        }

        guard.armed = false;
        let session = &mut *guard.session;

        if let Some(e) = replay_error {
            log::warn!("Console replay failed: {}", e);
            session.abort_open();
            return Err(ConsoleError::ReplayFailed(e));
        }

        if let Some(e) = subscribe_error {
            log::warn!(
                "Live subscription failed, keeping {} replayed lines: {}",
                session.buffer.len(),
                e
            );
            session.abort_open();
            return Err(ConsoleError::SubscriptionFailed(e));
        }

        session.live_rx = Some(live_rx);
        log::info!(
            "Console session live with {} lines (capacity {})",
            session.buffer.len(),
            session.capacity
        );
        Ok(())
    }

    /// Tear down the live subscription.
    ///
    /// Safe to call repeatedly and without an active subscription; only the
    /// first call reaches the host.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            log::debug!("Console session already closed");
            return;
        }

        if let Some(id) = self.subscription.take() {
            log::debug!("Unsubscribing live subscription {}", id);
            self.host.unsubscribe(id);
        }
        self.live_rx = None;
        self.pending.clear();
        self.replay_ingested = false;
        self.state = SessionState::Closed;
        log::info!("Console session closed");
    }

    /// Ingest every live line that has already arrived.
    ///
    /// Returns the number of lines ingested.
    pub fn pump(&mut self) -> usize {
        let Some(rx) = self.live_rx.as_mut() else {
            return 0;
        };

        let mut received = Vec::new();
        let mut stream_ended = false;
        loop {
            match rx.try_recv() {
                Ok(event) => received.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    stream_ended = true;
                    break;
                }
            }
        }

        if stream_ended {
            log::info!("Live log stream ended");
            self.live_rx = None;
        }

        let fresh = self.without_replayed(received);
        let count = fresh.len();
        if count > 0 {
            self.ingest_batch(fresh);
        }
        count
    }

    /// Wait for the next live line and ingest it.
    ///
    /// Returns `None` once the live stream has ended or the session is not live.
    pub async fn next_live(&mut self) -> Option<&LogLine> {
        loop {
            let event = self.live_rx.as_mut()?.recv().await;
            match event {
                Some(event) if event.is_covered_by(self.replay_through) => continue,
                Some(event) => {
                    self.ingest(event.text);
                    self.notify();
                    return self.buffer.last();
                }
                None => {
                    log::info!("Live log stream ended");
                    self.live_rx = None;
                    return None;
                }
            }
        }
    }

    /// Reset the local view. Host-side retention is unaffected.
    pub fn clear_view(&mut self) {
        self.buffer.clear();
        self.notify();
    }

    /// Forward a command to the host and record it in `history`.
    ///
    /// Blank input is ignored. A rejected command leaves `history` and the
    /// buffer untouched.
    pub async fn submit_command(
        &self,
        text: &str,
        history: &mut CommandHistoryNavigator,
    ) -> Result<(), ConsoleError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        self.host.dispatch_command(text).await.map_err(|e| {
            log::warn!("Command {:?} rejected: {}", text, e);
            ConsoleError::CommandDispatchFailed(e)
        })?;

        log::debug!("Dispatched command {:?}", text);
        history.submit(text);
        Ok(())
    }

    /// Route one live line according to the current state
    fn on_live_event(&mut self, event: LiveLine) {
        match self.state {
            SessionState::Replaying => self.pending.push_back(event),
            SessionState::Live if event.is_covered_by(self.replay_through) => {
                log::trace!("Dropping live line already in the replay");
            }
            SessionState::Live => {
                self.ingest(event.text);
                self.notify();
            }
            SessionState::Idle | SessionState::Closed => {
                log::trace!("Dropping live line outside an open session");
            }
        }
    }

    fn begin_open(&mut self, capacity: usize) -> Result<(), ConsoleError> {
        if capacity == 0 {
            return Err(ConsoleError::InvalidCapacity(capacity));
        }
        if matches!(self.state, SessionState::Replaying | SessionState::Live) {
            return Err(ConsoleError::AlreadyOpen(self.state));
        }

        log::debug!("Opening console session (capacity {})", capacity);
        self.capacity = capacity;
        self.state = SessionState::Replaying;
        self.pending.clear();
        self.replay_ingested = false;
        self.replay_through = None;
        self.subscription = None;
        self.live_rx = None;
        Ok(())
    }

    /// Re-seed the buffer with the replay, then try to go live
    fn on_replay_resolved(&mut self, replay: Replay) {
        if self.state != SessionState::Replaying {
            return;
        }

        log::debug!(
            "Replay resolved with {} lines (through {:?})",
            replay.lines.len(),
            replay.through
        );
        self.buffer = match BoundedLogBuffer::new(self.capacity) {
            Ok(buffer) => buffer,
            // begin_open already rejected a zero capacity
            Err(_) => BoundedLogBuffer::default(),
        };
        self.ingest_batch(replay.lines);
        self.replay_through = replay.through;
        self.replay_ingested = true;
        self.try_go_live();
    }

    fn on_subscription_established(&mut self, id: SubscriptionId) {
        log::debug!("Live subscription {} established", id);
        self.subscription = Some(id);
        self.try_go_live();
    }

    /// Drain the pending queue behind the replay once both sides are ready
    fn try_go_live(&mut self) {
        if self.state != SessionState::Replaying
            || !self.replay_ingested
            || self.subscription.is_none()
        {
            return;
        }

        let queued: Vec<LiveLine> = self.pending.drain(..).collect();
        let pending = self.without_replayed(queued);
        if !pending.is_empty() {
            log::debug!("Draining {} live lines received during replay", pending.len());
            self.ingest_batch(pending);
        }
        self.state = SessionState::Live;
    }

    /// Return to Idle, releasing any subscription this open established
    fn abort_open(&mut self) {
        if let Some(id) = self.subscription.take() {
            log::debug!("Tearing down live subscription {} after failed open", id);
            self.host.unsubscribe(id);
        }
        self.pending.clear();
        self.replay_ingested = false;
        self.live_rx = None;
        self.state = SessionState::Idle;
    }

    /// Texts of the lines the ingested replay does not already hold
    fn without_replayed(&self, events: Vec<LiveLine>) -> Vec<String> {
        let through = self.replay_through;
        events
            .into_iter()
            .filter(|event| !event.is_covered_by(through))
            .map(|event| event.text)
            .collect()
    }

    fn ingest(&mut self, raw: String) {
        let line = LogLine::new(self.next_sequence, raw);
        self.next_sequence += 1;
        self.buffer.append(line);
    }

    fn ingest_batch(&mut self, lines: Vec<String>) {
        for raw in lines {
            self.ingest(raw);
        }
        self.notify();
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

impl<H: ConsoleHost> Drop for ConsoleSession<H> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.host.unsubscribe(id);
        }
    }
}

/// Returns the session to Idle when an `open` future is dropped mid-flight
struct OpenGuard<'a, H: ConsoleHost> {
    session: &'a mut ConsoleSession<H>,
    armed: bool,
}

impl<H: ConsoleHost> Drop for OpenGuard<'_, H> {
    fn drop(&mut self) {
        if self.armed {
            log::debug!("Console open cancelled");
            self.session.abort_open();
        }
    }
}

async fn fetch_replay_with_timeout<H: ConsoleHost + ?Sized>(
    host: &H,
    timeout: Option<Duration>,
) -> Result<Replay, HostError> {
    match timeout {
        Some(timeout) => tokio::time::timeout(timeout, host.fetch_replay())
            .await
            .unwrap_or(Err(HostError::Timeout)),
        None => host.fetch_replay().await,
    }
}

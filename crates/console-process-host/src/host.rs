//! Child process stdio as a [`ConsoleHost`]

use crate::error::ProcessHostError;
use async_trait::async_trait;
use console_config::ServerCommand;
use console_engine::{BoundedLogBuffer, ConsoleHost, HostError, LiveSink, Replay, SubscriptionId};
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

/// Prefix added to every stderr line
pub const STDERR_PREFIX: &str = "ERROR: ";

type BoxedStdin = Box<dyn AsyncWrite + Send + Unpin>;

/// Console host serving a process' output and accepting its commands
pub struct ProcessHost {
    shared: Arc<Shared>,
    stdin: tokio::sync::Mutex<Option<BoxedStdin>>,
    /// Held so `kill_on_drop` ends the process together with the host
    child: Mutex<Option<Child>>,
    readers: Vec<JoinHandle<()>>,
}

/// State shared with the reader tasks
struct Shared {
    output: Mutex<Output>,
    next_subscription: AtomicU64,
    open_streams: AtomicUsize,
}

/// Replay history and subscribers live under one lock. Every line gets the
/// next output index; a replay reports the index of its last line, so a
/// line delivered live and also captured by a later snapshot can be
/// recognised by the session.
struct Output {
    history: BoundedLogBuffer<String>,
    subscribers: HashMap<SubscriptionId, LiveSink>,
    next_index: u64,
}

impl ProcessHost {
    /// Launch `command` with piped stdio and attach to it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(command: &ServerCommand) -> Result<Self, ProcessHostError> {
        log::info!(
            "Launching {} {:?} in {}",
            command.program,
            command.args,
            command.working_dir.display()
        );

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessHostError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(ProcessHostError::MissingPipe("stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(ProcessHostError::MissingPipe("stderr"))?;
        let stdin = child
            .stdin
            .take()
            .ok_or(ProcessHostError::MissingPipe("stdin"))?;

        let host = Self::attach(stdout, stderr, stdin, command.replay_capacity)?;
        *lock(&host.child) = Some(child);
        Ok(host)
    }

    /// Attach to already-open output and input streams.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach<O, E, I>(
        stdout: O,
        stderr: E,
        stdin: I,
        replay_capacity: usize,
    ) -> Result<Self, ProcessHostError>
    where
        O: AsyncRead + Send + Unpin + 'static,
        E: AsyncRead + Send + Unpin + 'static,
        I: AsyncWrite + Send + Unpin + 'static,
    {
        let shared = Arc::new(Shared {
            output: Mutex::new(Output {
                history: BoundedLogBuffer::new(replay_capacity)?,
                subscribers: HashMap::new(),
                next_index: 0,
            }),
            next_subscription: AtomicU64::new(1),
            open_streams: AtomicUsize::new(2),
        });

        let readers = vec![
            tokio::spawn(forward_lines(stdout, Arc::clone(&shared), "")),
            tokio::spawn(forward_lines(stderr, Arc::clone(&shared), STDERR_PREFIX)),
        ];

        Ok(Self {
            shared,
            stdin: tokio::sync::Mutex::new(Some(Box::new(stdin))),
            child: Mutex::new(None),
            readers,
        })
    }

    /// Whether the process output is still open
    pub fn is_running(&self) -> bool {
        self.shared.is_streaming()
    }

    /// Number of active live subscriptions
    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.output).subscribers.len()
    }
}

impl Drop for ProcessHost {
    fn drop(&mut self) {
        for reader in &self.readers {
            reader.abort();
        }
    }
}

#[async_trait]
impl ConsoleHost for ProcessHost {
    async fn fetch_replay(&self) -> Result<Replay, HostError> {
        let output = lock(&self.shared.output);
        Ok(Replay {
            lines: output.history.snapshot(),
            through: output.next_index.checked_sub(1),
        })
    }

    async fn subscribe_live(&self, sink: LiveSink) -> Result<SubscriptionId, HostError> {
        let mut output = lock(&self.shared.output);
        // Checked under the output lock so a closing reader cannot miss this sink
        if !self.shared.is_streaming() {
            return Err(HostError::Unavailable("server output closed".to_string()));
        }

        let id = SubscriptionId(self.shared.next_subscription.fetch_add(1, Ordering::Relaxed));
        output.subscribers.insert(id, sink);
        log::debug!("Live subscription {} registered", id);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if lock(&self.shared.output).subscribers.remove(&id).is_some() {
            log::debug!("Live subscription {} removed", id);
        }
    }

    async fn dispatch_command(&self, text: &str) -> Result<(), HostError> {
        if !self.shared.is_streaming() {
            return Err(HostError::Unavailable("server not running".to_string()));
        }

        let mut stdin = self.stdin.lock().await;
        let writer = stdin
            .as_mut()
            .ok_or_else(|| HostError::Unavailable("server not running".to_string()))?;

        let line = format!("{}\n", text);
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| HostError::Rejected(e.to_string()))?;
        writer
            .flush()
            .await
            .map_err(|e| HostError::Rejected(e.to_string()))?;

        log::debug!("Sent command to server: {:?}", text);
        Ok(())
    }
}

impl Shared {
    fn is_streaming(&self) -> bool {
        self.open_streams.load(Ordering::SeqCst) > 0
    }

    /// Number `line`, retain it for replay and push it to every subscriber
    fn record(&self, line: String) {
        let mut output = lock(&self.output);
        let index = output.next_index;
        output.next_index += 1;
        output.subscribers.retain(|id, sink| {
            let delivered = sink.deliver_at(index, line.as_str());
            if !delivered {
                log::debug!("Dropping closed live subscription {}", id);
            }
            delivered
        });
        output.history.append(line);
    }

    /// Called by each reader when its stream ends
    fn stream_closed(&self) {
        let mut output = lock(&self.output);
        if self.open_streams.fetch_sub(1, Ordering::SeqCst) == 1 {
            log::info!(
                "Server output closed, ending {} live subscriptions",
                output.subscribers.len()
            );
            output.subscribers.clear();
        }
    }
}

/// Read `reader` line by line until EOF, recording each line.
///
/// Invalid UTF-8 is replaced rather than ending the stream.
async fn forward_lines<R>(reader: R, shared: Arc<Shared>, prefix: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                let text = text.trim_end_matches(['\n', '\r']);
                shared.record(format!("{}{}", prefix, text));
            }
            Err(e) => {
                log::warn!("Failed to read server output: {}", e);
                break;
            }
        }
    }

    shared.stream_closed();
}

/// Lock a std mutex, recovering the data if a holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

use anyhow::{Context, Result};
use console_config::ConsoleConfig;
use console_engine::Console;
use console_process_host::ProcessHost;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

mod app;
mod logger;
mod theme;
mod view;

use app::App;
use theme::Theme;

const TICK: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = logger::init()?;
    log::info!("Starting craft-console, logging to {:?}", log_file);

    let config = ConsoleConfig::load();
    let host = Arc::new(
        ProcessHost::spawn(&config.server).context("Failed to start the server process")?,
    );

    let mut console = Console::new(Arc::clone(&host));
    if let Some(timeout) = config.console.replay_timeout() {
        console = console.with_replay_timeout(timeout);
    }
    let mut app = App::new(console, &config.console);
    app.open().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        log::error!("Console loop failed: {:#}", err);
    }

    // Closing the session unsubscribes before the host (and its child) go away
    drop(app);
    log::info!("Exiting craft-console");
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<ProcessHost>,
) -> Result<()> {
    let theme = Theme::default();
    let mut events = spawn_input_reader();
    let mut tick = tokio::time::interval(TICK);

    while app.running {
        app.tick();

        let mut rows = 0;
        terminal.draw(|frame| rows = view::render(&*app, &theme, frame))?;
        app.set_page_height(rows);

        tokio::select! {
            Some(event) = events.recv() => {
                // Only process key press events (ignore key release)
                if let Event::Key(key) = event {
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key).await;
                    }
                }
            }
            _ = tick.tick() => {}
        }
    }

    Ok(())
}

/// Read terminal events on a dedicated thread, crossterm's reader blocks
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::error!("Failed to read terminal event: {}", e);
                break;
            }
        }
    });
    rx
}

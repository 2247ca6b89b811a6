//! Console configuration
//!
//! Configuration loaded from `.craft-console.toml`. Every key is optional.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from .craft-console.toml
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Log view behaviour
    #[serde(default)]
    pub console: ConsoleSettings,

    /// Process the console attaches to
    #[serde(default)]
    pub server: ServerCommand,
}

/// `[console]` table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConsoleSettings {
    /// Maximum number of lines kept in the log view
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Rows from the bottom that still count as "at bottom"
    #[serde(default = "default_near_bottom_threshold")]
    pub near_bottom_threshold: usize,

    /// Replay fetch timeout in milliseconds, 0 waits forever
    #[serde(default = "default_replay_timeout_ms")]
    pub replay_timeout_ms: u64,
}

/// `[server]` table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerCommand {
    /// Program to launch (e.g. "java")
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments passed to the program
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Working directory of the launched process
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Lines the host retains for replay to newly opened consoles
    #[serde(default = "default_capacity")]
    pub replay_capacity: usize,
}

fn default_capacity() -> usize {
    1000
}

fn default_near_bottom_threshold() -> usize {
    1
}

fn default_replay_timeout_ms() -> u64 {
    5000
}

fn default_program() -> String {
    "java".to_string()
}

fn default_args() -> Vec<String> {
    ["-Xms1024M", "-Xmx4096M", "-jar", "server.jar", "nogui"]
        .iter()
        .map(|arg| arg.to_string())
        .collect()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            near_bottom_threshold: default_near_bottom_threshold(),
            replay_timeout_ms: default_replay_timeout_ms(),
        }
    }
}

impl Default for ServerCommand {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            working_dir: default_working_dir(),
            replay_capacity: default_capacity(),
        }
    }
}

impl ConsoleSettings {
    /// Replay timeout, `None` when disabled
    pub fn replay_timeout(&self) -> Option<Duration> {
        (self.replay_timeout_ms > 0).then(|| Duration::from_millis(self.replay_timeout_ms))
    }
}

impl ConsoleConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded console config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Ignoring invalid config file: {:#}", e);
                }
            }
        }

        log::debug!("Using default console config");
        Self::default()
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the console cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.console.capacity == 0 {
            bail!("console.capacity must be greater than zero");
        }
        if self.server.replay_capacity == 0 {
            bail!("server.replay_capacity must be greater than zero");
        }
        if self.server.program.trim().is_empty() {
            bail!("server.program must not be empty");
        }
        Ok(())
    }
}

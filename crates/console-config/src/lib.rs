//! Configuration and file management for craft-console
//!
//! This crate provides:
//! - File path utilities for config and cache files
//! - Configuration file lookup
//! - Console and server launch configuration (ConsoleConfig)

pub mod config_file;
pub mod console_config;
pub mod paths;

pub use config_file::load_config_file;
pub use console_config::{ConsoleConfig, ConsoleSettings, ServerCommand};
pub use paths::cache_dir;

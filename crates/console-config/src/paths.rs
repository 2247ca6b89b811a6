//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/craft-console/`, `~/.cache/craft-console/`
//! - macOS: `~/Library/Application Support/craft-console/`, `~/Library/Caches/craft-console/`
//! - Windows: `%APPDATA%\craft-console\`, `%LOCALAPPDATA%\craft-console\`

use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const APP_NAME: &str = "craft-console";

/// Get the application cache directory, creating it if missing
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {:?}", dir))?;
    Ok(dir)
}

/// Path of the config file inside the config directory (not created)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_path_name() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("craft-console/config.toml"));
        }
    }
}

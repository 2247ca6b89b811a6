use std::{env, path::PathBuf};

const CONFIG_FILE: &str = ".craft-console.toml";

/// Load config file content
///
/// Searches, in order:
/// 1. `.craft-console.toml` in the current working directory
/// 2. `~/.craft-console.toml`
/// 3. `config.toml` in the platform config directory
///
/// Returns the first file content found, None otherwise.
pub fn load_config_file() -> Option<String> {
    candidate_paths().into_iter().find_map(|path| {
        let content = std::fs::read_to_string(&path).ok()?;
        log::debug!("Loaded config from {}", path.display());
        Some(content)
    })
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home_config) = get_home_config_path() {
        paths.push(home_config);
    }
    if let Some(global) = crate::paths::global_config_path() {
        paths.push(global);
    }
    paths
}

/// Get the path to the config file in the home directory
///
/// Returns ~/.craft-console.toml if HOME environment variable is set.
fn get_home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cwd_is_searched_first() {
        let paths = candidate_paths();
        assert_eq!(paths[0], PathBuf::from(CONFIG_FILE));
    }
}

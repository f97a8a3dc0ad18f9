use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "envs";

/// Resolve an XDG base directory, falling back to a path under `$HOME`
fn xdg_base(var: &str, fallback: &str) -> Result<PathBuf> {
    match env::var_os(var) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(home_dir()?.join(fallback)),
    }
}

/// Get the XDG config directory for envs
///
/// Returns `$XDG_CONFIG_HOME/envs` or `~/.config/envs` if not set
pub fn config_dir() -> Result<PathBuf> {
    Ok(xdg_base("XDG_CONFIG_HOME", ".config")?.join(APP_DIR))
}

/// Get the XDG state directory for envs
///
/// Returns `$XDG_STATE_HOME/envs` or `~/.local/state/envs` if not set
pub fn state_dir() -> Result<PathBuf> {
    Ok(xdg_base("XDG_STATE_HOME", ".local/state")?.join(APP_DIR))
}

/// Get the home directory
pub fn home_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .context("Failed to get home directory")
        .map(|bd| bd.home_dir().to_path_buf())
}

//! Centralized path resolution for filerctl
//!
//! # Environment Variables
//!
//! - `FILERCTL_CONFIG_DIR` - Override config directory
//! - `FILERCTL_STATE_DIR` - Override state directory (filer state file)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `FILERCTL_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/filerctl` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\filerctl`
//!    - macOS/Linux: `~/.config/filerctl`
//!
//! For state_dir():
//! 1. `FILERCTL_STATE_DIR` environment variable
//! 2. `XDG_STATE_HOME/filerctl` (if set)
//! 3. Platform default:
//!    - Windows: `%LOCALAPPDATA%\filerctl`
//!    - macOS/Linux: `~/.local/state/filerctl`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "FILERCTL_CONFIG_DIR";

/// Environment variable for state directory override
pub const ENV_STATE_DIR: &str = "FILERCTL_STATE_DIR";

const APP_DIR: &str = "filerctl";

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "filerctl.toml";

/// Default manifest file name inside the config directory
pub const MANIFEST_FILE: &str = "manifest.toml";

/// Default filer state file name inside the state directory
pub const STATE_FILE: &str = "filer.json";

/// Get the filerctl config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!("Using config dir from {ENV_CONFIG_DIR}: {}", path.display());
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join(APP_DIR);
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join(APP_DIR);
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join(APP_DIR);
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the filerctl state directory path
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_STATE_DIR) {
        let path = expand(&dir);
        log::debug!("Using state dir from {ENV_STATE_DIR}: {}", path.display());
        return Ok(path);
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(xdg_state).join(APP_DIR);
        log::debug!("Using XDG_STATE_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(local_app_data) = dirs::data_local_dir() {
            let path = local_app_data.join(APP_DIR);
            log::debug!("Using Windows state dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".local").join("state").join(APP_DIR);
    log::debug!("Using default state dir: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables are left as written.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Run `f` with `key` set to `value`, restoring the previous value after.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: each test touches its own variable
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: as above
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/config/path", || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/config/path"));
        });

        let home = dirs::home_dir().unwrap();
        with_env_var(ENV_CONFIG_DIR, "~/dotfiles/filerctl", || {
            assert_eq!(config_dir().unwrap(), home.join("dotfiles").join("filerctl"));
        });
    }

    #[test]
    fn test_state_dir_env_override() {
        with_env_var(ENV_STATE_DIR, "/custom/state/path", || {
            assert_eq!(state_dir().unwrap(), PathBuf::from("/custom/state/path"));
        });
    }

    #[test]
    fn test_expand_with_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand("~/test/path"), home.join("test").join("path"));
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_with_env_var() {
        with_env_var("FILERCTL_TEST_VAR", "test_value", || {
            assert_eq!(
                expand("/path/$FILERCTL_TEST_VAR/file"),
                PathBuf::from("/path/test_value/file")
            );
        });
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        assert_eq!(
            expand("/path/$NONEXISTENT_VAR_12345/file"),
            PathBuf::from("/path/$NONEXISTENT_VAR_12345/file")
        );
    }
}

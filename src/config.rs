//! `filerctl.toml` configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manifest path; defaults to `manifest.toml` next to the config file
    pub manifest: Option<String>,
    pub backend: BackendConfig,
    pub retry: RetrySettings,
    pub apply: ApplyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// JSON file holding the filer state; defaults to the state directory
    pub state_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let defaults = filerkit::RetryConfig::default();
        Self {
            max_attempts: defaults.max_attempts,
            initial_delay_ms: defaults.base_delay.as_millis() as u64,
            backoff: defaults.backoff_factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Ask before committing changes
    pub confirm: bool,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self { confirm: true }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist.
    ///
    /// `explicit` comes from `--config`; an explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file {} does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => paths::config_dir()?.join(paths::CONFIG_FILE),
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let backoff = self.retry.backoff;
        if !backoff.is_finite() || backoff < 1.0 {
            anyhow::bail!("retry.backoff must be a finite number of at least 1.0, got {backoff}");
        }
        Ok(())
    }

    /// Manifest location: the override, the configured path, or the default
    pub fn manifest_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        match &self.manifest {
            Some(path) => Ok(paths::expand(path)),
            None => Ok(paths::config_dir()?.join(paths::MANIFEST_FILE)),
        }
    }

    /// Filer state file location
    pub fn state_file(&self) -> Result<PathBuf> {
        match &self.backend.state_file {
            Some(path) => Ok(paths::expand(path)),
            None => Ok(paths::state_dir()?.join(paths::STATE_FILE)),
        }
    }

    /// Retry policy for discovery calls
    pub fn retry_config(&self) -> filerkit::RetryConfig {
        let defaults = filerkit::RetryConfig::default();
        filerkit::RetryConfig {
            max_attempts: self.retry.max_attempts.max(1),
            base_delay: Duration::from_millis(self.retry.initial_delay_ms),
            backoff_factor: self.retry.backoff,
            max_delay: defaults.max_delay,
        }
    }
}

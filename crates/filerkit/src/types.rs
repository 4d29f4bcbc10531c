//! Core types for filer operations.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Kinds of filer objects the client can manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Directory-level quota tree inside a volume
    Qtree,
    /// Flexible volume inside an aggregate
    Volume,
}

impl ObjectKind {
    /// Short kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qtree => "qtree",
            Self::Volume => "volume",
        }
    }

    /// API used to enumerate objects of this kind.
    pub fn list_api(&self) -> &'static str {
        match self {
            Self::Qtree => "qtree-list",
            Self::Volume => "volume-list-info",
        }
    }

    /// API used to create an object of this kind.
    pub fn create_api(&self) -> &'static str {
        match self {
            Self::Qtree => "qtree-create",
            Self::Volume => "volume-create",
        }
    }

    /// API used to delete an object of this kind.
    pub fn delete_api(&self) -> &'static str {
        match self {
            Self::Qtree => "qtree-delete",
            Self::Volume => "volume-destroy",
        }
    }

    /// Name of the collection element in the list response.
    pub fn list_key(&self) -> &'static str {
        match self {
            Self::Qtree => "qtrees",
            Self::Volume => "volumes",
        }
    }

    /// Name of each record element in the list collection.
    pub fn info_key(&self) -> &'static str {
        match self {
            Self::Qtree => "qtree-info",
            Self::Volume => "volume-info",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qtree" => Ok(Self::Qtree),
            "volume" => Ok(Self::Volume),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}

/// A call made against a backend, as recorded by the in-memory filer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    /// Enumerate all objects of a kind
    List(ObjectKind),
    /// Create one object with ordered arguments
    Create(ObjectKind, Vec<(String, String)>),
    /// Delete one object by path or name
    Delete(ObjectKind, String),
}

impl Call {
    /// Whether this call mutates filer state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::List(_))
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts
    pub max_attempts: u32,
    /// Base delay between retries
    pub base_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_factor: f64,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with custom settings.
    pub fn new(max_attempts: u32, base_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_attempts,
            base_delay,
            backoff_factor,
            max_delay: Duration::from_secs(30),
        }
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.as_secs_f64() * self.backoff_factor.powi(attempt as i32);
        let capped = delay.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Create a config that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_api_names() {
        assert_eq!(ObjectKind::Qtree.list_api(), "qtree-list");
        assert_eq!(ObjectKind::Qtree.delete_api(), "qtree-delete");
        assert_eq!(ObjectKind::Volume.create_api(), "volume-create");
        assert_eq!(ObjectKind::Volume.list_key(), "volumes");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("qtree".parse::<ObjectKind>().unwrap(), ObjectKind::Qtree);
        assert_eq!("volume".parse::<ObjectKind>().unwrap(), ObjectKind::Volume);
        assert!("lun".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn test_delay_for_attempt() {
        let config = RetryConfig::new(4, Duration::from_secs(1), 2.0);
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig {
            max_attempts: 10,
            base_delay: Duration::from_secs(10),
            backoff_factor: 10.0,
            max_delay: Duration::from_secs(30),
        };
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(30));
    }
}

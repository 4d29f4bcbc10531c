//! Error types for reconciliation

use thiserror::Error;

/// Errors raised while validating, discovering or converging resources
#[derive(Debug, Error)]
pub enum Error {
    /// A declared value is outside the attribute's legal value space
    #[error("invalid {attribute} for {kind} '{identity}': {message}")]
    Validation {
        kind: String,
        identity: String,
        attribute: String,
        value: String,
        message: String,
    },

    /// Enumerating the remote instances of a kind failed
    #[error("failed to discover {kind} instances: {source:#}")]
    RemoteQuery {
        kind: String,
        #[source]
        source: anyhow::Error,
    },

    /// A create or destroy call was rejected by the remote
    #[error("{operation} of {kind} '{identity}' failed: {source:#}")]
    RemoteAction {
        kind: String,
        identity: String,
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{kind} '{identity}' has no attribute named '{attribute}'")]
    UnknownAttribute {
        kind: String,
        identity: String,
        attribute: String,
    },

    #[error("{declared} '{identity}' cannot be handled as a {expected}")]
    KindMismatch {
        expected: String,
        declared: String,
        identity: String,
    },
}

impl Error {
    /// Identity of the resource the error is about, when there is one
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::Validation { identity, .. }
            | Self::RemoteAction { identity, .. }
            | Self::UnknownAttribute { identity, .. }
            | Self::KindMismatch { identity, .. } => Some(identity),
            Self::RemoteQuery { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_action_includes_cause() {
        let err = Error::RemoteAction {
            kind: "volume".into(),
            identity: "vol1".into(),
            operation: "create".into(),
            source: anyhow::anyhow!("aggregate is full"),
        };
        assert_eq!(
            err.to_string(),
            "create of volume 'vol1' failed: aggregate is full"
        );
        assert_eq!(err.identity(), Some("vol1"));
    }

    #[test]
    fn test_remote_query_has_no_identity() {
        let err = Error::RemoteQuery {
            kind: "qtree".into(),
            source: anyhow::anyhow!("connection refused"),
        };
        assert!(err.identity().is_none());
        assert!(err.to_string().contains("qtree"));
    }
}

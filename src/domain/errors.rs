//! Domain errors for agentdeck.

use thiserror::Error;

use crate::domain::models::AgentId;

/// Domain-level errors raised by record stores and the list view.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to create agent: {0}")]
    CreationFailed(String),

    #[error("Failed to update agent {id}: {reason}")]
    UpdateFailed { id: AgentId, reason: String },

    #[error("Failed to delete agent {id}: {reason}")]
    DeleteFailed { id: AgentId, reason: String },

    #[error("Failed to fetch agents: {0}")]
    FetchFailed(String),

    #[error("Failed to subscribe to changes: {0}")]
    SubscriptionFailed(String),

    #[error("Record store error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Whether this error came from a rejected write.
    ///
    /// Write failures are shown to the user as an alert offering a retry;
    /// read failures degrade to an empty or stale list instead.
    pub const fn is_write_failure(&self) -> bool {
        matches!(
            self,
            Self::CreationFailed(_)
                | Self::UpdateFailed { .. }
                | Self::DeleteFailed { .. }
                | Self::AgentNotFound(_)
                | Self::ValidationFailed(_)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        DomainError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failure_classification() {
        assert!(DomainError::CreationFailed("rejected".into()).is_write_failure());
        assert!(DomainError::DeleteFailed {
            id: AgentId::from("a1"),
            reason: "denied".into(),
        }
        .is_write_failure());
        assert!(!DomainError::FetchFailed("timeout".into()).is_write_failure());
        assert!(!DomainError::Backend("502".into()).is_write_failure());
    }

    #[test]
    fn test_error_messages() {
        let err = DomainError::UpdateFailed {
            id: AgentId::from("a1"),
            reason: "row locked".into(),
        };
        assert_eq!(err.to_string(), "Failed to update agent a1: row locked");
    }
}

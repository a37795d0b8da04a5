//! Error types for the Draft Queue subsystem

use dl_01_rating::RatingError;
use shared_types::{PlayerId, QueueId, Version};
use thiserror::Error;

/// Draft Queue subsystem errors.
///
/// `Conflict` is the only variant a caller should retry automatically;
/// `InternalInvariantViolation` signals a bug and must not be retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    /// Referenced queue, player or match does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Operation invoked with the wrong status or cardinality
    #[error("Precondition failed: {reason}")]
    PreconditionFailed { reason: String },

    /// Actor lacks authority for the action
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Optimistic concurrency check failed; re-read and retry
    #[error("Conflict on {resource}: expected {expected}, found {actual}")]
    Conflict {
        resource: String,
        expected: String,
        actual: String,
    },

    /// Malformed input
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A state the machine must never produce
    #[error("Internal invariant violated: {reason}")]
    InternalInvariantViolation { reason: String },

    /// Command rejected by the queue lifecycle
    #[error("Illegal transition: {reason}")]
    IllegalTransition { reason: String },

    /// Adapter failure
    #[error("Storage error: {reason}")]
    Storage { reason: String },
}

impl DraftError {
    pub fn queue_not_found(queue_id: QueueId) -> Self {
        Self::NotFound {
            entity: "queue",
            id: queue_id.to_string(),
        }
    }

    pub fn player_not_found(player_id: &PlayerId) -> Self {
        Self::NotFound {
            entity: "player",
            id: player_id.to_string(),
        }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            reason: reason.into(),
        }
    }

    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::InternalInvariantViolation {
            reason: reason.into(),
        }
    }

    pub fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalTransition {
            reason: reason.into(),
        }
    }

    /// Write based on an outdated queue snapshot.
    pub fn stale_version(queue_id: QueueId, expected: Version, actual: Version) -> Self {
        Self::Conflict {
            resource: format!("queue {queue_id}"),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Player already held by another in-flight command.
    pub fn player_busy(player_id: &PlayerId) -> Self {
        Self::Conflict {
            resource: format!("player {player_id}"),
            expected: "free".to_string(),
            actual: "held".to_string(),
        }
    }

    /// Only version and guard conflicts are worth an automatic retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InternalInvariantViolation { .. })
    }
}

impl From<RatingError> for DraftError {
    fn from(err: RatingError) -> Self {
        Self::InvalidArgument {
            reason: err.to_string(),
        }
    }
}

/// Result type for draft queue operations
pub type DraftResult<T> = Result<T, DraftError>;

//! Error types for the Rating subsystem

use shared_types::{PlayerId, TeamSide};
use thiserror::Error;

/// Rating subsystem errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    /// A roster has no members, so its average is undefined
    #[error("Team {side} roster is empty")]
    EmptyTeam { side: TeamSide },

    /// The same player appears twice across the two rosters
    #[error("Player {player_id} appears more than once across rosters")]
    DuplicatePlayer { player_id: PlayerId },

    /// Engine configuration out of range
    #[error("Invalid rating configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Result type for rating operations
pub type RatingResult<T> = Result<T, RatingError>;

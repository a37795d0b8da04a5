//! Roster entries consumed by the engine and the updates it produces.

use serde::{Deserialize, Serialize};
use shared_types::{PlayerId, Rating, RatingChange, TeamSide};

/// A rostered player with the rating read from the registry snapshot.
///
/// `rating` is `None` when the registry had no value; the engine substitutes
/// the configured default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedPlayer {
    pub player_id: PlayerId,
    pub rating: Option<Rating>,
}

impl RatedPlayer {
    pub fn new(player_id: PlayerId, rating: Option<Rating>) -> Self {
        Self { player_id, rating }
    }
}

/// A computed post-match rating for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub player_id: PlayerId,
    pub side: TeamSide,
    /// Pre-match rating the delta was applied to (default-filled).
    pub before: Rating,
    pub after: Rating,
}

impl RatingUpdate {
    pub fn delta(&self) -> Rating {
        self.after - self.before
    }

    pub fn into_change(self) -> RatingChange {
        RatingChange {
            player_id: self.player_id,
            before: self.before,
            after: self.after,
        }
    }
}

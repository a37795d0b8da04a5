//! Match recording.

use crate::error::{DraftError, DraftResult};
use shared_types::{
    Match, MatchId, MatchStatus, Queue, RatingChange, TeamSide, ROSTER_SIZE,
};

/// Materializes the immutable result of a finished draft.
pub struct MatchRecorder;

impl MatchRecorder {
    /// Build the match record for `queue` won by `winner`.
    ///
    /// Rosters are copied captain first. Either roster holding anything
    /// other than four players is rejected.
    pub fn record(
        queue: &Queue,
        winner: TeamSide,
        rating_changes: Vec<RatingChange>,
        recorded_at_ms: u64,
    ) -> DraftResult<Match> {
        let team_a = queue.roster(TeamSide::A).to_vec();
        let team_b = queue.roster(TeamSide::B).to_vec();

        for (side, roster) in [(TeamSide::A, &team_a), (TeamSide::B, &team_b)] {
            if roster.len() != ROSTER_SIZE {
                return Err(DraftError::InvalidArgument {
                    reason: format!(
                        "team {side} has {} players, a match needs {ROSTER_SIZE}",
                        roster.len()
                    ),
                });
            }
        }

        Ok(Match {
            id: MatchId::new(),
            queue_id: queue.id,
            name: queue.name.clone(),
            team_a,
            team_b,
            status: MatchStatus::Completed,
            winning_team: winner,
            rating_changes,
            recorded_at_ms,
        })
    }
}

//! Elo rating computation for two-team matches.

use super::value_objects::{RatedPlayer, RatingUpdate};
use crate::error::{RatingError, RatingResult};
use serde::{Deserialize, Serialize};
use shared_types::{PlayerId, Rating, TeamSide, DEFAULT_RATING};
use std::collections::HashSet;

/// K-factor for Elo updates (higher = more volatile)
pub const K_FACTOR: f64 = 32.0;

/// Engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    pub k_factor: f64,
    /// Rating used for a rostered player with no stored value.
    pub default_rating: Rating,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: K_FACTOR,
            default_rating: DEFAULT_RATING,
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> RatingResult<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(RatingError::InvalidConfig {
                reason: format!("k_factor must be positive and finite, got {}", self.k_factor),
            });
        }
        Ok(())
    }
}

/// Team Elo engine.
#[derive(Debug, Clone, Default)]
pub struct RatingEngine {
    config: RatingConfig,
}

impl RatingEngine {
    pub fn new(config: RatingConfig) -> RatingResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Expected score of a team rated `own` against one rated `opponent`.
    pub fn expected_score(own: f64, opponent: f64) -> f64 {
        1.0 / (1.0 + 10.0_f64.powf((opponent - own) / 400.0))
    }

    /// Mean rating over every rostered member, missing ratings defaulted.
    pub fn team_average(&self, side: TeamSide, team: &[RatedPlayer]) -> RatingResult<f64> {
        if team.is_empty() {
            return Err(RatingError::EmptyTeam { side });
        }
        let total: f64 = team.iter().map(|p| f64::from(self.effective(p))).sum();
        Ok(total / team.len() as f64)
    }

    /// Rounded rating delta for a team with the given expected and actual score.
    pub fn delta(&self, expected: f64, actual: f64) -> Rating {
        // f64::round rounds half away from zero.
        (self.config.k_factor * (actual - expected)).round() as Rating
    }

    /// Compute new ratings for both rosters after `winner` won.
    ///
    /// Team A updates come first, then team B, each in roster order.
    pub fn compute(
        &self,
        team_a: &[RatedPlayer],
        team_b: &[RatedPlayer],
        winner: TeamSide,
    ) -> RatingResult<Vec<RatingUpdate>> {
        ensure_disjoint(team_a, team_b)?;

        let avg_a = self.team_average(TeamSide::A, team_a)?;
        let avg_b = self.team_average(TeamSide::B, team_b)?;

        let expected_a = Self::expected_score(avg_a, avg_b);
        let expected_b = 1.0 - expected_a;

        let (actual_a, actual_b) = match winner {
            TeamSide::A => (1.0, 0.0),
            TeamSide::B => (0.0, 1.0),
        };

        let delta_a = self.delta(expected_a, actual_a);
        let delta_b = self.delta(expected_b, actual_b);

        let updates = team_a
            .iter()
            .map(|p| self.update(p, TeamSide::A, delta_a))
            .chain(team_b.iter().map(|p| self.update(p, TeamSide::B, delta_b)))
            .collect();
        Ok(updates)
    }

    fn effective(&self, player: &RatedPlayer) -> Rating {
        player.rating.unwrap_or(self.config.default_rating)
    }

    fn update(&self, player: &RatedPlayer, side: TeamSide, delta: Rating) -> RatingUpdate {
        let before = self.effective(player);
        RatingUpdate {
            player_id: player.player_id.clone(),
            side,
            before,
            after: before + delta,
        }
    }
}

fn ensure_disjoint(team_a: &[RatedPlayer], team_b: &[RatedPlayer]) -> RatingResult<()> {
    let mut seen: HashSet<&PlayerId> = HashSet::new();
    for player in team_a.iter().chain(team_b) {
        if !seen.insert(&player.player_id) {
            return Err(RatingError::DuplicatePlayer {
                player_id: player.player_id.clone(),
            });
        }
    }
    Ok(())
}

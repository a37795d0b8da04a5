//! # Test Fixtures
//!
//! Builds a league on the runtime container and drives queues to a given
//! stage.

use std::sync::Arc;

use dl_02_draft_queue::{
    DraftQueueApi, DraftResult, JoinQueue, PickPlayer, PlayerRegistry, StartMatch,
};
use league_runtime::{LeagueConfig, LeagueContainer};
use shared_types::{PlayerId, QueueId, Rating, DEFAULT_RATING};

/// Ratings used across the integration suite.
///
/// Captains are p1 (1200, team A) and p2 (1100, team B).
pub const SEEDED: [(&str, Rating); 8] = [
    ("p1", 1200),
    ("p2", 1100),
    ("p3", 1000),
    ("p4", 1000),
    ("p5", 1000),
    ("p6", 1000),
    ("p7", 900),
    ("p8", 800),
];

/// Picks that leave team A at an average of 1050 and team B at 950.
pub const BALANCED_PICKS: [(&str, &str); 6] = [
    ("p1", "p3"),
    ("p2", "p4"),
    ("p2", "p7"),
    ("p1", "p5"),
    ("p1", "p6"),
    ("p2", "p8"),
];

pub fn league() -> LeagueContainer {
    match LeagueContainer::new(LeagueConfig::default()) {
        Ok(container) => container,
        Err(err) => panic!("default config must build a container: {err}"),
    }
}

/// Register `player` and move its rating to `rating`.
pub async fn seed_player(
    league: &LeagueContainer,
    player: &str,
    rating: Rating,
) -> DraftResult<()> {
    let id = PlayerId::from(player);
    league
        .draft_queue
        .create_profile(id.clone(), &format!("Player {player}"))
        .await?;
    if rating != DEFAULT_RATING {
        league
            .registry
            .compare_and_set_rating(&id, DEFAULT_RATING, rating)
            .await?;
    }
    Ok(())
}

/// A league whose registry holds the `SEEDED` players.
pub async fn seeded_league() -> DraftResult<LeagueContainer> {
    let league = league();
    for (player, rating) in SEEDED {
        seed_player(&league, player, rating).await?;
    }
    Ok(league)
}

/// Create `name` and join `players` to it.
pub async fn filled_queue(
    league: &LeagueContainer,
    name: &str,
    players: &[&str],
) -> DraftResult<QueueId> {
    let queue_id = league.draft_queue.create_queue(name).await?.value.id;
    for player in players {
        league
            .draft_queue
            .join_queue(JoinQueue {
                queue_id,
                player_id: PlayerId::from(*player),
                base_version: None,
            })
            .await?;
    }
    Ok(queue_id)
}

/// Create `name`, fill it with the `SEEDED` players, start it and run
/// `BALANCED_PICKS`.
pub async fn drafted_queue(league: &LeagueContainer, name: &str) -> DraftResult<QueueId> {
    let players: Vec<&str> = SEEDED.iter().map(|(p, _)| *p).collect();
    let queue_id = filled_queue(league, name, &players).await?;
    let service = Arc::clone(&league.draft_queue);
    service
        .start_match(StartMatch {
            queue_id,
            base_version: None,
        })
        .await?;
    for (captain, picked) in BALANCED_PICKS {
        service
            .pick_player(PickPlayer {
                queue_id,
                actor_id: PlayerId::from(captain),
                picked_id: PlayerId::from(picked),
                base_version: None,
            })
            .await?;
    }
    Ok(queue_id)
}

/// Current rating of `player`.
pub async fn rating(league: &LeagueContainer, player: &str) -> DraftResult<Rating> {
    league.registry.get_rating(&PlayerId::from(player)).await
}

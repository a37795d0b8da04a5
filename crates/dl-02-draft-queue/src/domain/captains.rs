//! Captain selection at match start.

use crate::error::{DraftError, DraftResult};
use dl_01_rating::RatedPlayer;
use shared_types::{Captains, PlayerId, Rating, QUEUE_CAPACITY};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Captains plus the players left for the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptainSelection {
    pub captains: Captains,
    pub draft_pool: BTreeSet<PlayerId>,
}

/// Pick the two highest-rated players as captains.
///
/// Requires exactly eight distinct players, each with a resolved rating.
/// Ties are broken by ascending player id so identical inputs always yield
/// identical captains.
pub fn select_captains(rated: &[RatedPlayer]) -> DraftResult<CaptainSelection> {
    if rated.len() != QUEUE_CAPACITY {
        return Err(DraftError::precondition(format!(
            "captain selection needs {QUEUE_CAPACITY} players, got {}",
            rated.len()
        )));
    }

    let mut ranked: Vec<(Rating, &PlayerId)> = Vec::with_capacity(rated.len());
    for player in rated {
        let rating = player.rating.ok_or_else(|| {
            DraftError::precondition(format!("no rating resolved for {}", player.player_id))
        })?;
        ranked.push((rating, &player.player_id));
    }

    let distinct: BTreeSet<&PlayerId> = ranked.iter().map(|(_, id)| *id).collect();
    if distinct.len() != QUEUE_CAPACITY {
        return Err(DraftError::precondition(format!(
            "captain selection needs {QUEUE_CAPACITY} distinct players, got {}",
            distinct.len()
        )));
    }

    ranked.sort_by_key(|(rating, id)| (Reverse(*rating), *id));

    let captains = Captains {
        team_a: ranked[0].1.clone(),
        team_b: ranked[1].1.clone(),
    };
    let draft_pool = ranked[2..].iter().map(|(_, id)| (*id).clone()).collect();

    Ok(CaptainSelection {
        captains,
        draft_pool,
    })
}

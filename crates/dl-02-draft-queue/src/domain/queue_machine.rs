//! Queue lifecycle state machine.
//!
//! Every transition takes the current queue by reference and returns the
//! next value; nothing is mutated in place and nothing is persisted here.

use super::captains::select_captains;
use super::recorder::MatchRecorder;
use super::sequencer;
use crate::error::{DraftError, DraftResult};
use dl_01_rating::{RatedPlayer, RatingEngine};
use shared_types::{
    DraftState, Match, PickIndex, PlayerId, Queue, QueueId, QueueStatus, TeamSide, QUEUE_CAPACITY,
    ROSTER_SIZE,
};
use std::collections::BTreeSet;

/// Completed queue and the match it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub completed: Queue,
    pub record: Match,
}

/// Transition rules for `Queue`.
pub struct QueueStateMachine;

impl QueueStateMachine {
    /// A new empty queue in `WAITING`.
    pub fn create(name: &str) -> DraftResult<Queue> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DraftError::InvalidArgument {
                reason: "queue name must not be empty".to_string(),
            });
        }
        Ok(Queue {
            id: QueueId::new(),
            name: name.to_string(),
            players: Vec::new(),
            status: QueueStatus::Waiting,
            draft: None,
        })
    }

    pub fn join(queue: &Queue, player: &PlayerId) -> DraftResult<Queue> {
        require_status(queue, QueueStatus::Waiting, "join")?;
        if queue.contains(player) {
            return Err(DraftError::illegal(format!(
                "{player} already joined queue {}",
                queue.name
            )));
        }
        if queue.is_full() {
            return Err(DraftError::illegal(format!(
                "queue {} already has {QUEUE_CAPACITY} players",
                queue.name
            )));
        }

        let mut next = queue.clone();
        next.players.push(player.clone());
        Ok(next)
    }

    pub fn leave(queue: &Queue, player: &PlayerId) -> DraftResult<Queue> {
        require_status(queue, QueueStatus::Waiting, "leave")?;
        if !queue.contains(player) {
            return Err(DraftError::NotFound {
                entity: "queue member",
                id: player.to_string(),
            });
        }

        let mut next = queue.clone();
        next.players.retain(|p| p != player);
        Ok(next)
    }

    /// Select captains and open the draft.
    ///
    /// `rated` must cover exactly the queue's players.
    pub fn start_match(queue: &Queue, rated: &[RatedPlayer]) -> DraftResult<Queue> {
        require_status(queue, QueueStatus::Waiting, "start")?;
        if queue.players.len() != QUEUE_CAPACITY {
            return Err(DraftError::precondition(format!(
                "queue {} has {} players, {QUEUE_CAPACITY} needed to start",
                queue.name,
                queue.players.len()
            )));
        }

        let members: BTreeSet<&PlayerId> = queue.players.iter().collect();
        let supplied: BTreeSet<&PlayerId> = rated.iter().map(|r| &r.player_id).collect();
        if members != supplied {
            return Err(DraftError::precondition(
                "ratings supplied do not match the queue roster",
            ));
        }

        let selection = select_captains(rated)?;
        let current_drafter = sequencer::next_drafter(&selection.captains, PickIndex::FIRST)?;

        let mut next = queue.clone();
        next.status = QueueStatus::Drafting;
        next.draft = Some(DraftState {
            team_a: vec![selection.captains.team_a.clone()],
            team_b: vec![selection.captains.team_b.clone()],
            captains: selection.captains,
            draft_pool: selection.draft_pool,
            pick_index: PickIndex::FIRST,
            current_drafter,
        });
        Ok(next)
    }

    /// `actor` drafts `picked` onto the side they captain.
    pub fn pick(queue: &Queue, actor: &PlayerId, picked: &PlayerId) -> DraftResult<Queue> {
        require_status(queue, QueueStatus::Drafting, "pick")?;

        let mut next = queue.clone();
        let Some(draft) = next.draft.as_mut() else {
            return Err(DraftError::invariant("drafting queue has no draft state"));
        };

        let Some(drafter) = draft.current_drafter.as_ref() else {
            return Err(DraftError::invariant("drafting queue has no current drafter"));
        };
        if drafter != actor {
            return Err(DraftError::Forbidden {
                reason: format!("{actor} is not the current drafter ({drafter})"),
            });
        }
        if !draft.draft_pool.contains(picked) {
            return Err(DraftError::NotFound {
                entity: "draft pool player",
                id: picked.to_string(),
            });
        }

        let side = draft
            .captains
            .side_of(actor)
            .ok_or_else(|| DraftError::invariant(format!("drafter {actor} is not a captain")))?;
        let expected = sequencer::drafter_at(draft.pick_index)?;
        if expected != Some(side) {
            return Err(DraftError::invariant(format!(
                "team {side} drafting at pick {} out of turn",
                draft.pick_index
            )));
        }

        draft.draft_pool.remove(picked);
        draft.roster_mut(side).push(picked.clone());
        draft.pick_index = draft.pick_index.next();
        draft.current_drafter = sequencer::next_drafter(&draft.captains, draft.pick_index)?;
        let finished = draft.current_drafter.is_none();

        if finished {
            next.status = QueueStatus::InProgress;
        }
        Ok(next)
    }

    /// `IN_PROGRESS → COMPLETED`.
    pub fn complete(queue: &Queue) -> DraftResult<Queue> {
        require_status(queue, QueueStatus::InProgress, "complete")?;
        let mut next = queue.clone();
        next.status = QueueStatus::Completed;
        Ok(next)
    }

    /// Record the match, rate it, and complete the queue.
    ///
    /// `ratings` is the pre-match snapshot; rostered players absent from it
    /// are rated at the engine's default.
    pub fn report_winner(
        queue: &Queue,
        winner: TeamSide,
        engine: &RatingEngine,
        ratings: &[RatedPlayer],
        now_ms: u64,
    ) -> DraftResult<ReportOutcome> {
        require_status(queue, QueueStatus::InProgress, "report")?;

        let mut record = MatchRecorder::record(queue, winner, Vec::new(), now_ms)?;

        let lookup = |id: &PlayerId| {
            ratings
                .iter()
                .find(|r| r.player_id == *id)
                .cloned()
                .unwrap_or_else(|| RatedPlayer::new(id.clone(), None))
        };
        let team_a: Vec<RatedPlayer> = record.team_a.iter().map(lookup).collect();
        let team_b: Vec<RatedPlayer> = record.team_b.iter().map(lookup).collect();

        record.rating_changes = engine
            .compute(&team_a, &team_b, winner)?
            .into_iter()
            .map(|u| u.into_change())
            .collect();

        let completed = Self::complete(queue)?;
        Ok(ReportOutcome { completed, record })
    }

    /// Check every structural invariant of `queue`.
    pub fn validate(queue: &Queue) -> DraftResult<()> {
        let unique: BTreeSet<&PlayerId> = queue.players.iter().collect();
        if unique.len() != queue.players.len() {
            return Err(DraftError::invariant(format!(
                "queue {} lists a player twice",
                queue.id
            )));
        }
        if queue.players.len() > QUEUE_CAPACITY {
            return Err(DraftError::invariant(format!(
                "queue {} holds {} players",
                queue.id,
                queue.players.len()
            )));
        }

        let draft = match (queue.status, queue.draft.as_ref()) {
            (QueueStatus::Waiting, None) => return Ok(()),
            (QueueStatus::Waiting, Some(_)) => {
                return Err(DraftError::invariant("waiting queue carries draft state"))
            }
            (status, None) => {
                return Err(DraftError::invariant(format!(
                    "{status} queue has no draft state"
                )))
            }
            (_, Some(draft)) => draft,
        };

        if queue.players.len() != QUEUE_CAPACITY {
            return Err(DraftError::invariant(format!(
                "{} queue has {} players",
                queue.status,
                queue.players.len()
            )));
        }
        validate_partition(&unique, draft)?;
        validate_position(queue.status, draft)
    }
}

fn require_status(queue: &Queue, required: QueueStatus, action: &str) -> DraftResult<()> {
    if queue.status != required {
        return Err(DraftError::precondition(format!(
            "cannot {action} queue {} while {}; requires {required}",
            queue.name, queue.status
        )));
    }
    Ok(())
}

/// teamA, teamB and the pool are a disjoint cover of the players.
fn validate_partition(players: &BTreeSet<&PlayerId>, draft: &DraftState) -> DraftResult<()> {
    if draft.team_a.first() != Some(&draft.captains.team_a)
        || draft.team_b.first() != Some(&draft.captains.team_b)
    {
        return Err(DraftError::invariant("captain is not first on their roster"));
    }

    let mut seen: BTreeSet<&PlayerId> = BTreeSet::new();
    for id in draft.team_a.iter().chain(&draft.team_b).chain(&draft.draft_pool) {
        if !seen.insert(id) {
            return Err(DraftError::invariant(format!("{id} appears in two partitions")));
        }
    }
    if seen != *players {
        return Err(DraftError::invariant(
            "rosters and pool do not cover the queue players",
        ));
    }
    Ok(())
}

fn validate_position(status: QueueStatus, draft: &DraftState) -> DraftResult<()> {
    let implied = PickIndex::from_roster_sizes(draft.team_a.len(), draft.team_b.len());
    if implied != Some(draft.pick_index) {
        return Err(DraftError::invariant(format!(
            "pick index {} disagrees with roster sizes {}/{}",
            draft.pick_index,
            draft.team_a.len(),
            draft.team_b.len()
        )));
    }

    let expected_drafter = sequencer::next_drafter(&draft.captains, draft.pick_index)?;
    match status {
        QueueStatus::Drafting => {
            if expected_drafter.is_none() || draft.current_drafter != expected_drafter {
                return Err(DraftError::invariant(format!(
                    "current drafter {:?} is not the captain due at pick {}",
                    draft.current_drafter, draft.pick_index
                )));
            }
        }
        _ => {
            if draft.current_drafter.is_some()
                || draft.team_a.len() != ROSTER_SIZE
                || draft.team_b.len() != ROSTER_SIZE
            {
                return Err(DraftError::invariant(format!(
                    "{status} queue has an unfinished draft"
                )));
            }
        }
    }
    Ok(())
}

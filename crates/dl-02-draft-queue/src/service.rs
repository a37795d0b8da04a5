//! Draft Queue Service - Core orchestration
//!
//! Reads a versioned snapshot, runs it through the state machine, and writes
//! the result back with compare-and-swap. Match reporting spans the match
//! store, the player registry and the queue store; it is ordered so that a
//! crash part way through leaves a state `recover_pending_reports` can finish.

use crate::domain::{QueueStateMachine, ReportOutcome};
use crate::error::{DraftError, DraftResult};
use crate::locks::PlayerLocks;
use crate::ports::inbound::{
    DraftQueueApi, JoinQueue, LeaveQueue, MatchReport, PickPlayer, ReportWinner, StartMatch,
};
use crate::ports::outbound::{
    ActiveQueueIndex, ChangeNotifier, ClaimOutcome, MatchInsert, MatchStore, PlayerRegistry,
    QueueStore, TimeSource,
};
use async_trait::async_trait;
use dl_01_rating::{RatedPlayer, RatingConfig, RatingEngine};
use serde::{Deserialize, Serialize};
use shared_types::{
    Match, MatchId, PlayerId, PlayerProfile, Queue, QueueId, QueueStatus, RatingChange, TeamSide,
    Version, Versioned,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Draft queue configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DraftQueueConfig {
    pub rating: RatingConfig,
    /// Extra attempts callers make after a `Conflict`
    pub max_conflict_retries: u32,
}

impl Default for DraftQueueConfig {
    fn default() -> Self {
        Self {
            rating: RatingConfig::default(),
            max_conflict_retries: 3,
        }
    }
}

impl DraftQueueConfig {
    pub fn validate(&self) -> DraftResult<()> {
        self.rating.validate()?;
        Ok(())
    }

    /// Total attempts for `retry_on_conflict`.
    pub fn max_attempts(&self) -> u32 {
        self.max_conflict_retries.saturating_add(1)
    }
}

/// Run `op`, re-running it while it fails with a retryable error.
///
/// Only useful for commands that re-read the queue on each attempt, i.e.
/// without a pinned `base_version`.
pub async fn retry_on_conflict<T, F, Fut>(max_attempts: u32, mut op: F) -> DraftResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DraftResult<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                debug!(attempt, %err, "Retrying after conflict");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Draft Queue Service implementation
pub struct DraftQueueService<Q, R, M, A, N, T>
where
    Q: QueueStore,
    R: PlayerRegistry,
    M: MatchStore,
    A: ActiveQueueIndex,
    N: ChangeNotifier,
    T: TimeSource,
{
    config: DraftQueueConfig,
    engine: RatingEngine,
    queues: Arc<Q>,
    registry: Arc<R>,
    matches: Arc<M>,
    active: Arc<A>,
    notifier: Arc<N>,
    clock: Arc<T>,
    locks: PlayerLocks,
}

impl<Q, R, M, A, N, T> DraftQueueService<Q, R, M, A, N, T>
where
    Q: QueueStore,
    R: PlayerRegistry,
    M: MatchStore,
    A: ActiveQueueIndex,
    N: ChangeNotifier,
    T: TimeSource,
{
    /// Create new draft queue service
    pub fn new(
        config: DraftQueueConfig,
        queues: Arc<Q>,
        registry: Arc<R>,
        matches: Arc<M>,
        active: Arc<A>,
        notifier: Arc<N>,
        clock: Arc<T>,
    ) -> DraftResult<Self> {
        config.validate()?;
        let engine = RatingEngine::new(config.rating.clone())?;
        Ok(Self {
            config,
            engine,
            queues,
            registry,
            matches,
            active,
            notifier,
            clock,
            locks: PlayerLocks::new(),
        })
    }

    pub fn config(&self) -> &DraftQueueConfig {
        &self.config
    }

    /// Read a queue and check the caller's base version against it.
    async fn load(
        &self,
        queue_id: QueueId,
        base_version: Option<Version>,
    ) -> DraftResult<Versioned<Queue>> {
        let current = self.queues.get(queue_id).await?;
        if let Some(base) = base_version {
            if base != current.version {
                warn!(%queue_id, %base, current = %current.version, "[dl-02] Stale command");
                return Err(DraftError::stale_version(queue_id, base, current.version));
            }
        }
        Ok(current)
    }

    /// Validate, compare-and-swap, then notify.
    async fn write(&self, next: Queue, expected: Version) -> DraftResult<Versioned<Queue>> {
        QueueStateMachine::validate(&next)?;
        let queue_id = next.id;
        let written = self.queues.put(next, expected).await.map_err(|err| {
            if err.is_retryable() {
                warn!(%queue_id, %expected, %err, "[dl-02] Queue write lost a race");
            }
            err
        })?;
        self.notifier.queue_changed(&written).await;
        Ok(written)
    }

    /// Current ratings of `players`; players without a profile map to `None`.
    async fn snapshot_ratings(&self, players: &[PlayerId]) -> DraftResult<Vec<RatedPlayer>> {
        let mut rated = Vec::with_capacity(players.len());
        for player in players {
            let rating = match self.registry.get_rating(player).await {
                Ok(rating) => Some(rating),
                Err(DraftError::NotFound { .. }) => None,
                Err(err) => return Err(err),
            };
            rated.push(RatedPlayer::new(player.clone(), rating));
        }
        Ok(rated)
    }

    /// Apply the match's rating changes, skipping any already applied.
    async fn apply_ratings(&self, record: &Match) -> DraftResult<Vec<RatingChange>> {
        let mut applied = Vec::new();
        for change in &record.rating_changes {
            match self.registry.get_rating(&change.player_id).await {
                Ok(current) if current == change.after => {}
                Ok(_) => {
                    self.registry
                        .compare_and_set_rating(&change.player_id, change.before, change.after)
                        .await?;
                    applied.push(change.clone());
                }
                Err(DraftError::NotFound { .. }) => {
                    warn!(player = %change.player_id, "[dl-02] No profile for rating change");
                }
                Err(err) => return Err(err),
            }
        }
        if !applied.is_empty() {
            self.notifier
                .ratings_applied(record.queue_id, record.id, &applied)
                .await;
        }
        Ok(applied)
    }

    /// Bind the player to `queue_id`. Returns whether a new claim was made.
    ///
    /// A claim on another queue is honoured only while that queue is active
    /// and still lists the player; otherwise it is stale and taken over.
    async fn claim_active(&self, player_id: &PlayerId, queue_id: QueueId) -> DraftResult<bool> {
        let other = match self.active.claim(player_id, queue_id).await? {
            ClaimOutcome::Acquired => return Ok(true),
            ClaimOutcome::AlreadyHeld => return Ok(false),
            ClaimOutcome::Conflict(other) => other,
        };

        let stale = match self.queues.get(other).await {
            Ok(held) => !(held.value.status.is_active() && held.value.contains(player_id)),
            Err(DraftError::NotFound { .. }) => true,
            Err(err) => return Err(err),
        };
        if !stale {
            return Err(DraftError::precondition(format!(
                "{player_id} is already in active queue {other}"
            )));
        }

        warn!(player = %player_id, stale_queue = %other, %queue_id, "[dl-02] Taking over stale queue claim");
        self.active.release(player_id, other).await?;
        match self.active.claim(player_id, queue_id).await? {
            ClaimOutcome::Acquired => Ok(true),
            ClaimOutcome::AlreadyHeld => Ok(false),
            ClaimOutcome::Conflict(held) => Err(DraftError::precondition(format!(
                "{player_id} is already in active queue {held}"
            ))),
        }
    }

    /// Steps after the match record exists: ratings, queue status, claims.
    async fn finalize(
        &self,
        current: Versioned<Queue>,
        completed: Queue,
        record: &Match,
    ) -> DraftResult<Versioned<Queue>> {
        let applied = self.apply_ratings(record).await?;
        let written = self.write(completed, current.version).await?;

        let queue_id = written.value.id;
        for player in &written.value.players {
            if let Err(err) = self.active.release(player, queue_id).await {
                warn!(%player, %queue_id, %err, "[dl-02] Failed to release queue claim");
            }
        }

        info!(
            %queue_id,
            match_id = %record.id,
            winner = %record.winning_team,
            ratings_applied = applied.len(),
            "[dl-02] Match completed"
        );
        Ok(written)
    }
}

fn ensure_same_winner(record: &Match, winner: TeamSide) -> DraftResult<()> {
    if record.winning_team != winner {
        return Err(DraftError::precondition(format!(
            "match {} already recorded team {} as winner",
            record.id, record.winning_team
        )));
    }
    Ok(())
}

#[async_trait]
impl<Q, R, M, A, N, T> DraftQueueApi for DraftQueueService<Q, R, M, A, N, T>
where
    Q: QueueStore,
    R: PlayerRegistry,
    M: MatchStore,
    A: ActiveQueueIndex,
    N: ChangeNotifier,
    T: TimeSource,
{
    async fn create_profile(
        &self,
        player_id: PlayerId,
        display_name: &str,
    ) -> DraftResult<PlayerProfile> {
        let display_name = display_name.trim();
        if player_id.as_str().trim().is_empty() || display_name.is_empty() {
            return Err(DraftError::InvalidArgument {
                reason: "player id and display name must not be empty".to_string(),
            });
        }

        let profile = PlayerProfile::new(player_id, display_name)
            .with_rating(self.config.rating.default_rating);
        let created = self.registry.create_profile(profile).await?;
        info!(player = %created.player_id, rating = created.rating, "[dl-02] Profile created");
        Ok(created)
    }

    async fn profile(&self, player_id: &PlayerId) -> DraftResult<PlayerProfile> {
        self.registry.get_profile(player_id).await
    }

    async fn leaderboard(&self) -> DraftResult<Vec<PlayerProfile>> {
        let mut profiles = self.registry.list_profiles().await?;
        profiles.sort_by(|a, b| {
            b.rating
                .cmp(&a.rating)
                .then_with(|| a.player_id.cmp(&b.player_id))
        });
        Ok(profiles)
    }

    async fn create_queue(&self, name: &str) -> DraftResult<Versioned<Queue>> {
        let queue = QueueStateMachine::create(name)?;
        let stored = self.queues.insert(queue).await?;
        self.notifier.queue_changed(&stored).await;
        info!(queue_id = %stored.value.id, name = %stored.value.name, "[dl-02] Queue created");
        Ok(stored)
    }

    async fn queue(&self, queue_id: QueueId) -> DraftResult<Versioned<Queue>> {
        self.queues.get(queue_id).await
    }

    async fn list_queues(&self, statuses: &[QueueStatus]) -> DraftResult<Vec<Versioned<Queue>>> {
        self.queues.list(statuses).await
    }

    async fn join_queue(&self, command: JoinQueue) -> DraftResult<Versioned<Queue>> {
        let JoinQueue {
            queue_id,
            player_id,
            base_version,
        } = command;
        let _guard = self.locks.try_acquire(std::slice::from_ref(&player_id))?;

        self.registry.get_profile(&player_id).await?;
        let current = self.load(queue_id, base_version).await?;
        let next = QueueStateMachine::join(&current.value, &player_id)?;

        let acquired = self.claim_active(&player_id, queue_id).await?;

        match self.write(next, current.version).await {
            Ok(written) => {
                debug!(%queue_id, player = %player_id, players = written.value.players.len(), "[dl-02] Player joined");
                Ok(written)
            }
            Err(err) => {
                if acquired {
                    if let Err(release_err) = self.active.release(&player_id, queue_id).await {
                        warn!(player = %player_id, %queue_id, %release_err, "[dl-02] Failed to undo claim");
                    }
                }
                Err(err)
            }
        }
    }

    async fn leave_queue(&self, command: LeaveQueue) -> DraftResult<Versioned<Queue>> {
        let _guard = self
            .locks
            .try_acquire(std::slice::from_ref(&command.player_id))?;

        let current = self.load(command.queue_id, command.base_version).await?;
        let next = QueueStateMachine::leave(&current.value, &command.player_id)?;
        let written = self.write(next, current.version).await?;
        // The leave is committed; a claim left behind is taken over on the
        // player's next join.
        if let Err(err) = self
            .active
            .release(&command.player_id, command.queue_id)
            .await
        {
            warn!(
                player = %command.player_id,
                queue_id = %command.queue_id,
                %err,
                "[dl-02] Failed to release queue claim"
            );
        }

        debug!(queue_id = %command.queue_id, player = %command.player_id, "[dl-02] Player left");
        Ok(written)
    }

    async fn start_match(&self, command: StartMatch) -> DraftResult<Versioned<Queue>> {
        let queue_id = command.queue_id;
        let current = self.load(queue_id, command.base_version).await?;
        let _guard = self.locks.try_acquire(&current.value.players)?;

        let rated = self.snapshot_ratings(&current.value.players).await?;
        let next = QueueStateMachine::start_match(&current.value, &rated)?;

        for player in &current.value.players {
            let bound = self.active.active_queue(player).await?;
            if bound != Some(queue_id) {
                return Err(DraftError::precondition(format!(
                    "{player} is not bound to queue {queue_id}"
                )));
            }
        }

        let written = self.write(next, current.version).await?;
        if let Some(captains) = written.value.captains() {
            info!(
                %queue_id,
                captain_a = %captains.team_a,
                captain_b = %captains.team_b,
                "[dl-02] Draft started"
            );
        }
        Ok(written)
    }

    async fn pick_player(&self, command: PickPlayer) -> DraftResult<Versioned<Queue>> {
        let current = self.load(command.queue_id, command.base_version).await?;
        let next = QueueStateMachine::pick(&current.value, &command.actor_id, &command.picked_id)?;
        let written = self.write(next, current.version).await?;

        debug!(
            queue_id = %command.queue_id,
            captain = %command.actor_id,
            picked = %command.picked_id,
            "[dl-02] Player drafted"
        );
        if written.value.status == QueueStatus::InProgress {
            info!(queue_id = %command.queue_id, "[dl-02] Draft complete, match in progress");
        }
        Ok(written)
    }

    async fn report_winner(&self, command: ReportWinner) -> DraftResult<MatchReport> {
        let queue_id = command.queue_id;
        let winner = command.winning_team;
        let current = self.load(queue_id, command.base_version).await?;
        if current.value.status != QueueStatus::InProgress {
            return Err(DraftError::precondition(format!(
                "cannot report queue {} while {}",
                current.value.name, current.value.status
            )));
        }
        let _guard = self.locks.try_acquire(&current.value.players)?;

        let (completed, record, inserted) = match self.matches.find_by_queue(queue_id).await? {
            Some(existing) => {
                ensure_same_winner(&existing, winner)?;
                warn!(%queue_id, match_id = %existing.id, "[dl-02] Resuming partially applied report");
                (QueueStateMachine::complete(&current.value)?, existing, false)
            }
            None => {
                let ratings = self.snapshot_ratings(&current.value.players).await?;
                let ReportOutcome { completed, record } = QueueStateMachine::report_winner(
                    &current.value,
                    winner,
                    &self.engine,
                    &ratings,
                    self.clock.now_ms(),
                )?;
                match self.matches.insert_if_absent(record).await? {
                    MatchInsert::Inserted(record) => (completed, record, true),
                    MatchInsert::Existing(record) => {
                        ensure_same_winner(&record, winner)?;
                        (completed, record, false)
                    }
                }
            }
        };

        if inserted {
            self.notifier.match_recorded(&record).await;
        }
        let queue = self.finalize(current, completed, &record).await?;
        Ok(MatchReport { queue, record })
    }

    async fn recover_pending_reports(&self) -> DraftResult<Vec<MatchId>> {
        let pending = self.queues.list(&[QueueStatus::InProgress]).await?;
        let mut recovered = Vec::new();

        for current in pending {
            let queue_id = current.value.id;
            let Some(record) = self.matches.find_by_queue(queue_id).await? else {
                continue;
            };
            let _guard = match self.locks.try_acquire(&current.value.players) {
                Ok(guard) => guard,
                Err(err) => {
                    warn!(%queue_id, %err, "[dl-02] Queue busy, recovery deferred");
                    continue;
                }
            };

            warn!(%queue_id, match_id = %record.id, "[dl-02] Completing partially applied report");
            let completed = QueueStateMachine::complete(&current.value)?;
            match self.finalize(current, completed, &record).await {
                Ok(_) => recovered.push(record.id),
                Err(err) if err.is_retryable() => {
                    warn!(%queue_id, %err, "[dl-02] Recovery lost a race, deferred");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(recovered)
    }

    async fn match_history(&self, player_id: &PlayerId) -> DraftResult<Vec<Match>> {
        let mut history = self.matches.list_for_player(player_id).await?;
        // Later inserts first among equal timestamps.
        history.reverse();
        history.sort_by(|a, b| b.recorded_at_ms.cmp(&a.recorded_at_ms));
        Ok(history)
    }

    async fn archive_queue(
        &self,
        queue_id: QueueId,
        base_version: Option<Version>,
    ) -> DraftResult<()> {
        let current = self.load(queue_id, base_version).await?;
        if current.value.status != QueueStatus::Completed {
            return Err(DraftError::precondition(format!(
                "only completed queues can be archived; {} is {}",
                current.value.name, current.value.status
            )));
        }
        self.queues.remove(queue_id, current.version).await?;
        self.notifier.queue_archived(queue_id).await;
        info!(%queue_id, "[dl-02] Queue archived");
        Ok(())
    }
}

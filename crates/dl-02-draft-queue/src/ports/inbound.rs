//! Driving Ports (API - Inbound)

use crate::error::DraftResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{
    Match, MatchId, PlayerId, PlayerProfile, Queue, QueueId, QueueStatus, TeamSide, Version,
    Versioned,
};

/// Add a player to a waiting queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinQueue {
    pub queue_id: QueueId,
    pub player_id: PlayerId,
    /// Version the caller last observed. `None` acts on whatever is current.
    pub base_version: Option<Version>,
}

/// Remove a player from a waiting queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveQueue {
    pub queue_id: QueueId,
    pub player_id: PlayerId,
    pub base_version: Option<Version>,
}

/// Select captains and open the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartMatch {
    pub queue_id: QueueId,
    pub base_version: Option<Version>,
}

/// A captain drafts a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickPlayer {
    pub queue_id: QueueId,
    pub actor_id: PlayerId,
    pub picked_id: PlayerId,
    pub base_version: Option<Version>,
}

/// Declare the winning side of an in-progress match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWinner {
    pub queue_id: QueueId,
    pub winning_team: TeamSide,
    pub base_version: Option<Version>,
}

/// The five queue-mutating commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Join(JoinQueue),
    Leave(LeaveQueue),
    Start(StartMatch),
    Pick(PickPlayer),
    Report(ReportWinner),
}

impl Command {
    pub fn queue_id(&self) -> QueueId {
        match self {
            Self::Join(c) => c.queue_id,
            Self::Leave(c) => c.queue_id,
            Self::Start(c) => c.queue_id,
            Self::Pick(c) => c.queue_id,
            Self::Report(c) => c.queue_id,
        }
    }
}

/// Completed queue plus its match record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub queue: Versioned<Queue>,
    pub record: Match,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Queue(Versioned<Queue>),
    Match(MatchReport),
}

impl CommandOutcome {
    /// The queue snapshot written by the command.
    pub fn queue(&self) -> &Versioned<Queue> {
        match self {
            Self::Queue(queue) => queue,
            Self::Match(report) => &report.queue,
        }
    }
}

/// Primary Draft Queue API
///
/// This is the driving port for the Draft Queue subsystem. Queue-mutating
/// calls are compare-and-swap writes; a `Conflict` means re-read and retry.
#[async_trait]
pub trait DraftQueueApi: Send + Sync {
    /// Register a player at the default rating.
    async fn create_profile(
        &self,
        player_id: PlayerId,
        display_name: &str,
    ) -> DraftResult<PlayerProfile>;

    async fn profile(&self, player_id: &PlayerId) -> DraftResult<PlayerProfile>;

    /// Profiles by rating, highest first; ties by player id.
    async fn leaderboard(&self) -> DraftResult<Vec<PlayerProfile>>;

    async fn create_queue(&self, name: &str) -> DraftResult<Versioned<Queue>>;

    async fn queue(&self, queue_id: QueueId) -> DraftResult<Versioned<Queue>>;

    /// Queues whose status is in `statuses`; empty lists every queue.
    async fn list_queues(&self, statuses: &[QueueStatus]) -> DraftResult<Vec<Versioned<Queue>>>;

    async fn join_queue(&self, command: JoinQueue) -> DraftResult<Versioned<Queue>>;

    async fn leave_queue(&self, command: LeaveQueue) -> DraftResult<Versioned<Queue>>;

    async fn start_match(&self, command: StartMatch) -> DraftResult<Versioned<Queue>>;

    async fn pick_player(&self, command: PickPlayer) -> DraftResult<Versioned<Queue>>;

    /// Record the match, apply ratings and complete the queue as one unit.
    async fn report_winner(&self, command: ReportWinner) -> DraftResult<MatchReport>;

    /// Finish every in-progress queue that already has a match record.
    ///
    /// Returns the ids of the matches finalised.
    async fn recover_pending_reports(&self) -> DraftResult<Vec<MatchId>>;

    /// Matches the player took part in, newest first.
    async fn match_history(&self, player_id: &PlayerId) -> DraftResult<Vec<Match>>;

    /// Remove a completed queue from the store.
    async fn archive_queue(&self, queue_id: QueueId, base_version: Option<Version>)
        -> DraftResult<()>;

    /// Dispatch any queue command.
    async fn execute(&self, command: Command) -> DraftResult<CommandOutcome> {
        match command {
            Command::Join(c) => self.join_queue(c).await.map(CommandOutcome::Queue),
            Command::Leave(c) => self.leave_queue(c).await.map(CommandOutcome::Queue),
            Command::Start(c) => self.start_match(c).await.map(CommandOutcome::Queue),
            Command::Pick(c) => self.pick_player(c).await.map(CommandOutcome::Queue),
            Command::Report(c) => self.report_winner(c).await.map(CommandOutcome::Match),
        }
    }
}

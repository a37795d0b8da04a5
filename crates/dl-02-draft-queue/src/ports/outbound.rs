//! Driven Ports (SPI - Outbound Dependencies)
//!
//! External collaborators the draft queue relies on. Every store port is
//! async so a remote backend can sit behind it.

use crate::error::DraftResult;
use async_trait::async_trait;
use shared_types::{
    Match, MatchId, PlayerId, PlayerProfile, Queue, QueueId, QueueStatus, Rating, RatingChange,
    Version, Versioned,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Versioned queue storage with compare-and-swap writes.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Store a new queue at `Version::INITIAL`.
    async fn insert(&self, queue: Queue) -> DraftResult<Versioned<Queue>>;

    /// Current snapshot, or `NotFound`.
    async fn get(&self, queue_id: QueueId) -> DraftResult<Versioned<Queue>>;

    /// Replace the stored queue if it is still at `expected`.
    ///
    /// Fails with `Conflict` when another write got there first.
    async fn put(&self, queue: Queue, expected: Version) -> DraftResult<Versioned<Queue>>;

    /// Queues whose status is in `statuses`; an empty filter lists all.
    async fn list(&self, statuses: &[QueueStatus]) -> DraftResult<Vec<Versioned<Queue>>>;

    /// Delete the queue if it is still at `expected`.
    async fn remove(&self, queue_id: QueueId, expected: Version) -> DraftResult<()>;
}

/// Player profiles and ratings.
#[async_trait]
pub trait PlayerRegistry: Send + Sync {
    /// Fails with `PreconditionFailed` if the player already has a profile.
    async fn create_profile(&self, profile: PlayerProfile) -> DraftResult<PlayerProfile>;

    async fn get_profile(&self, player_id: &PlayerId) -> DraftResult<PlayerProfile>;

    async fn get_rating(&self, player_id: &PlayerId) -> DraftResult<Rating>;

    /// Set the rating to `new` only if it currently equals `expected`.
    async fn compare_and_set_rating(
        &self,
        player_id: &PlayerId,
        expected: Rating,
        new: Rating,
    ) -> DraftResult<()>;

    async fn list_profiles(&self) -> DraftResult<Vec<PlayerProfile>>;
}

/// Result of `MatchStore::insert_if_absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchInsert {
    Inserted(Match),
    /// A match already existed for the queue; the stored record is returned.
    Existing(Match),
}

impl MatchInsert {
    pub fn into_record(self) -> Match {
        match self {
            Self::Inserted(record) | Self::Existing(record) => record,
        }
    }
}

/// Match records, at most one per queue.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn insert_if_absent(&self, record: Match) -> DraftResult<MatchInsert>;

    async fn find_by_queue(&self, queue_id: QueueId) -> DraftResult<Option<Match>>;

    async fn get(&self, match_id: MatchId) -> DraftResult<Match>;

    /// Every match with `player_id` on either roster, in insertion order.
    async fn list_for_player(&self, player_id: &PlayerId) -> DraftResult<Vec<Match>>;
}

/// Result of claiming a player for a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The player was free and is now bound to the queue.
    Acquired,
    /// The player was already bound to this queue.
    AlreadyHeld,
    /// The player is bound to another active queue.
    Conflict(QueueId),
}

/// Per-player pointer to the one active queue they belong to.
#[async_trait]
pub trait ActiveQueueIndex: Send + Sync {
    async fn claim(&self, player_id: &PlayerId, queue_id: QueueId) -> DraftResult<ClaimOutcome>;

    /// Drop the claim if it is held for `queue_id`. Returns whether it was.
    async fn release(&self, player_id: &PlayerId, queue_id: QueueId) -> DraftResult<bool>;

    async fn active_queue(&self, player_id: &PlayerId) -> DraftResult<Option<QueueId>>;
}

/// Change notification sink. Delivery is best effort and never fails a
/// command.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    async fn queue_changed(&self, queue: &Versioned<Queue>);

    async fn queue_archived(&self, queue_id: QueueId);

    async fn match_recorded(&self, record: &Match);

    async fn ratings_applied(&self, queue_id: QueueId, match_id: MatchId, changes: &[RatingChange]);
}

/// Time source for match timestamps.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now_ms(&self) -> u64;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    time: AtomicU64,
}

impl ManualTimeSource {
    pub fn new(initial: u64) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.time.store(ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> u64 {
        self.time.load(Ordering::SeqCst)
    }
}

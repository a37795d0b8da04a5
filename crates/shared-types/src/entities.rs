//! # Core Domain Entities
//!
//! Defines the league entities shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `PlayerId`, `QueueId`, `MatchId`, `Version`
//! - **Players**: `PlayerProfile`, `Rating`
//! - **Queues & Drafts**: `Queue`, `QueueStatus`, `DraftState`, `Captains`, `PickIndex`
//! - **Matches**: `Match`, `MatchStatus`, `RatingChange`, `TeamSide`

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Integer skill rating.
pub type Rating = i32;

/// Rating assigned to a freshly created profile.
pub const DEFAULT_RATING: Rating = 1000;

/// Players required to start a match.
pub const QUEUE_CAPACITY: usize = 8;

/// Players on each finalized roster, captain included.
pub const ROSTER_SIZE: usize = 4;

/// Picks made during one draft (8 players minus 2 captains).
pub const DRAFT_PICKS: u8 = 6;

/// Opaque, globally unique player identity (the authentication subject).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Unique identifier for a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QueueId(pub Uuid);

impl QueueId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QueueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a match record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(pub Uuid);

impl MatchId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optimistic concurrency token attached to every stored queue snapshot.
///
/// A freshly inserted record is at `Version::INITIAL`; every successful
/// write advances it by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(pub u64);

impl Version {
    pub const INITIAL: Version = Version(1);

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A value together with the version it was read or written at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub value: T,
    pub version: Version,
}

impl<T> Versioned<T> {
    pub fn new(value: T, version: Version) -> Self {
        Self { value, version }
    }
}

// =============================================================================
// CLUSTER B: PLAYERS
// =============================================================================

/// A player's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: PlayerId,
    pub display_name: String,
    pub rating: Rating,
}

impl PlayerProfile {
    /// Create a profile at the default starting rating.
    pub fn new(player_id: PlayerId, display_name: impl Into<String>) -> Self {
        Self {
            player_id,
            display_name: display_name.into(),
            rating: DEFAULT_RATING,
        }
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }
}

// =============================================================================
// CLUSTER C: TEAMS
// =============================================================================

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Error returned when a string is not a team tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTeamSideError(pub String);

impl fmt::Display for ParseTeamSideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid team '{}', expected A or B", self.0)
    }
}

impl std::error::Error for ParseTeamSideError {}

impl FromStr for TeamSide {
    type Err = ParseTeamSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            other => Err(ParseTeamSideError(other.to_string())),
        }
    }
}

// =============================================================================
// CLUSTER D: QUEUES & DRAFTS
// =============================================================================

/// Queue lifecycle.
///
/// ```text
/// [WAITING] ──start──→ [DRAFTING] ──6th pick──→ [IN_PROGRESS] ──report──→ [COMPLETED]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueStatus {
    Waiting,
    Drafting,
    InProgress,
    Completed,
}

impl QueueStatus {
    /// Statuses in which a player is bound to the queue.
    pub const ACTIVE: [QueueStatus; 3] = [Self::Waiting, Self::Drafting, Self::InProgress];

    pub fn is_active(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Waiting => "WAITING",
            Self::Drafting => "DRAFTING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        };
        f.write_str(label)
    }
}

/// The two captains of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captains {
    pub team_a: PlayerId,
    pub team_b: PlayerId,
}

impl Captains {
    pub fn captain(&self, side: TeamSide) -> &PlayerId {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    /// The side `player` captains, if any.
    pub fn side_of(&self, player: &PlayerId) -> Option<TeamSide> {
        if *player == self.team_a {
            Some(TeamSide::A)
        } else if *player == self.team_b {
            Some(TeamSide::B)
        } else {
            None
        }
    }
}

/// Number of picks made so far in a draft (0..=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PickIndex(pub u8);

impl PickIndex {
    pub const FIRST: PickIndex = PickIndex(0);
    pub const COMPLETE: PickIndex = PickIndex(DRAFT_PICKS);

    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Pick index implied by roster sizes (each roster counts its captain).
    pub fn from_roster_sizes(team_a: usize, team_b: usize) -> Option<Self> {
        let picks = team_a.checked_sub(1)? + team_b.checked_sub(1)?;
        u8::try_from(picks).ok().map(Self)
    }
}

impl fmt::Display for PickIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Draft-phase fields. Populated at match start and kept afterwards so the
/// finalized rosters stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    pub captains: Captains,
    /// Players not yet drafted.
    pub draft_pool: BTreeSet<PlayerId>,
    /// Team A roster, captain first.
    pub team_a: Vec<PlayerId>,
    /// Team B roster, captain first.
    pub team_b: Vec<PlayerId>,
    pub pick_index: PickIndex,
    /// Captain allowed to make the next pick; `None` once the draft is over.
    pub current_drafter: Option<PlayerId>,
}

impl DraftState {
    pub fn roster(&self, side: TeamSide) -> &[PlayerId] {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    pub fn roster_mut(&mut self, side: TeamSide) -> &mut Vec<PlayerId> {
        match side {
            TeamSide::A => &mut self.team_a,
            TeamSide::B => &mut self.team_b,
        }
    }
}

/// A matchmaking queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,
    pub name: String,
    /// Joined players, in join order.
    pub players: Vec<PlayerId>,
    pub status: QueueStatus,
    pub draft: Option<DraftState>,
}

impl Queue {
    pub fn contains(&self, player: &PlayerId) -> bool {
        self.players.contains(player)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= QUEUE_CAPACITY
    }

    pub fn captains(&self) -> Option<&Captains> {
        self.draft.as_ref().map(|d| &d.captains)
    }

    pub fn current_drafter(&self) -> Option<&PlayerId> {
        self.draft.as_ref().and_then(|d| d.current_drafter.as_ref())
    }

    pub fn roster(&self, side: TeamSide) -> &[PlayerId] {
        self.draft.as_ref().map(|d| d.roster(side)).unwrap_or(&[])
    }
}

// =============================================================================
// CLUSTER E: MATCHES
// =============================================================================

/// Match lifecycle. Records are written once, already completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Completed,
}

/// One player's rating movement caused by a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub before: Rating,
    pub after: Rating,
}

impl RatingChange {
    pub fn delta(&self) -> Rating {
        self.after - self.before
    }
}

/// Immutable result of a completed queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Queue this match was played from; at most one match per queue.
    pub queue_id: QueueId,
    pub name: String,
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub status: MatchStatus,
    pub winning_team: TeamSide,
    pub rating_changes: Vec<RatingChange>,
    pub recorded_at_ms: u64,
}

impl Match {
    pub fn roster(&self, side: TeamSide) -> &[PlayerId] {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    pub fn includes(&self, player: &PlayerId) -> bool {
        self.team_a.contains(player) || self.team_b.contains(player)
    }
}

//! # dl-02-draft-queue
//!
//! Draft Queue subsystem: eight players queue up, the two highest rated
//! become captains, a snake draft fills both teams, and a reported winner
//! produces a match record and new ratings.
//!
//! ## Lifecycle
//!
//! ```text
//! [WAITING] ──start (8 players)──→ [DRAFTING] ──6th pick──→ [IN_PROGRESS] ──report──→ [COMPLETED]
//!   join/leave                        pick (current drafter only)                        archive
//! ```
//!
//! ## Draft order
//!
//! | pick | 0 | 1 | 2 | 3 | 4 | 5 |
//! |------|---|---|---|---|---|---|
//! | team | A | B | B | A | A | B |
//!
//! ## Concurrency
//!
//! Every queue write is a compare-and-swap on the queue's `Version`. A
//! command carrying a stale `base_version`, or losing a race to another
//! writer, fails with `DraftError::Conflict`; that is the only error callers
//! should retry (see [`retry_on_conflict`]).
//!
//! Commands that touch more than one record hold per-player guards for
//! their duration. Guards never wait: contention is reported as `Conflict`.
//!
//! A player is bound to at most one active queue through the
//! `ActiveQueueIndex` claim taken at join and released on leave or match
//! completion.
//!
//! ## Reporting a winner
//!
//! ```text
//! 1. match store   insert_if_absent(record)     (or reuse the existing record)
//! 2. registry      compare_and_set per player   (skipped when already applied)
//! 3. queue store   put(COMPLETED, version)
//! 4. index         release the eight claims
//! ```
//!
//! Each step is idempotent. A queue left `IN_PROGRESS` with a match already
//! recorded is finished by re-reporting the same winner or by
//! `recover_pending_reports`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dl_02_draft_queue::{DraftQueueApi, DraftQueueService, JoinQueue};
//!
//! let queue = service.create_queue("friday").await?;
//! service
//!     .join_queue(JoinQueue {
//!         queue_id: queue.value.id,
//!         player_id: "alice".into(),
//!         base_version: Some(queue.version),
//!     })
//!     .await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod locks;
pub mod ports;
pub mod service;

pub use adapters::{
    EventBusNotifier, InMemoryActiveQueueIndex, InMemoryMatchStore, InMemoryPlayerRegistry,
    InMemoryQueueStore,
};
pub use domain::{MatchRecorder, QueueStateMachine, ReportOutcome, SNAKE_ORDER};
pub use error::{DraftError, DraftResult};
pub use ports::inbound::{
    Command, CommandOutcome, DraftQueueApi, JoinQueue, LeaveQueue, MatchReport, PickPlayer,
    ReportWinner, StartMatch,
};
pub use ports::outbound::{
    ActiveQueueIndex, ChangeNotifier, ClaimOutcome, ManualTimeSource, MatchInsert, MatchStore,
    PlayerRegistry, QueueStore, SystemTimeSource, TimeSource,
};
pub use service::{retry_on_conflict, DraftQueueConfig, DraftQueueService};

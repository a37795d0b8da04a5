//! # Shared Bus - Change Notification for League Subsystems
//!
//! Every successful queue write, recorded match and applied rating batch is
//! published here so that callers can drive navigation (lobby → draft →
//! match) without polling the stores. The draft-queue core never consumes
//! these events itself.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────┐
//! │ DraftQueueService│    publish()       │  Subscriber  │
//! │  (notifier port) │ ──────┐            │  (lobby, UI) │
//! └──────────────────┘       │            └──────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │ ─────────┘
//!                      └──────────────┘  subscribe(filter)
//! ```
//!
//! Delivery is best-effort broadcast: a subscriber that falls more than the
//! channel capacity behind skips the oldest events.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LeagueEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

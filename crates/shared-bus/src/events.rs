//! # League Events
//!
//! Defines the change notifications that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{Match, MatchId, Queue, QueueId, RatingChange, Version};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LeagueEvent {
    // =========================================================================
    // QUEUE LIFECYCLE
    // =========================================================================
    /// A queue was created or successfully written (join, leave, start, pick,
    /// completion). Carries the full new value and its version.
    QueueUpdated { queue: Queue, version: Version },

    /// A completed queue was removed from the store.
    QueueArchived { queue_id: QueueId },

    // =========================================================================
    // MATCH RESULTS
    // =========================================================================
    /// A match record was created for a queue.
    MatchRecorded(Match),

    /// Post-match ratings were written to the player registry.
    RatingsApplied {
        queue_id: QueueId,
        match_id: MatchId,
        changes: Vec<RatingChange>,
    },
}

impl LeagueEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::QueueUpdated { .. } | Self::QueueArchived { .. } => EventTopic::Queue,
            Self::MatchRecorded(_) => EventTopic::Match,
            Self::RatingsApplied { .. } => EventTopic::Rating,
        }
    }

    /// The queue this event concerns.
    #[must_use]
    pub fn queue_id(&self) -> QueueId {
        match self {
            Self::QueueUpdated { queue, .. } => queue.id,
            Self::QueueArchived { queue_id } | Self::RatingsApplied { queue_id, .. } => *queue_id,
            Self::MatchRecorded(record) => record.queue_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Queue writes and archival.
    Queue,
    /// Match records.
    Match,
    /// Rating updates.
    Rating,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Queues to include. Empty means all queues.
    pub queue_ids: Vec<QueueId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            queue_ids: Vec::new(),
        }
    }

    /// Create a filter for events about one queue.
    #[must_use]
    pub fn queue(queue_id: QueueId) -> Self {
        Self {
            topics: Vec::new(),
            queue_ids: vec![queue_id],
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LeagueEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let queue_match = self.queue_ids.is_empty() || self.queue_ids.contains(&event.queue_id());

        topic_match && queue_match
    }
}

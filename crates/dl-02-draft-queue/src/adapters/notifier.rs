//! Change notification adapters.
//!
//! Implements `ChangeNotifier` by publishing onto the shared event bus.

use crate::ports::outbound::ChangeNotifier;
use async_trait::async_trait;
use shared_bus::{EventPublisher, InMemoryEventBus, LeagueEvent};
use shared_types::{Match, MatchId, Queue, QueueId, RatingChange, Versioned};
use std::sync::Arc;
use tracing::debug;

/// Publishes every change as a `LeagueEvent`.
pub struct EventBusNotifier {
    event_bus: Arc<InMemoryEventBus>,
}

impl EventBusNotifier {
    pub fn new(event_bus: Arc<InMemoryEventBus>) -> Self {
        Self { event_bus }
    }

    async fn publish(&self, event: LeagueEvent) {
        let topic = event.topic();
        let receivers = self.event_bus.publish(event).await;
        if receivers == 0 {
            // No open clients; nothing to deliver.
            debug!(?topic, "No subscribers for league event");
        }
    }
}

#[async_trait]
impl ChangeNotifier for EventBusNotifier {
    async fn queue_changed(&self, queue: &Versioned<Queue>) {
        self.publish(LeagueEvent::QueueUpdated {
            queue: queue.value.clone(),
            version: queue.version,
        })
        .await;
    }

    async fn queue_archived(&self, queue_id: QueueId) {
        self.publish(LeagueEvent::QueueArchived { queue_id }).await;
    }

    async fn match_recorded(&self, record: &Match) {
        self.publish(LeagueEvent::MatchRecorded(record.clone()))
            .await;
    }

    async fn ratings_applied(&self, queue_id: QueueId, match_id: MatchId, changes: &[RatingChange]) {
        self.publish(LeagueEvent::RatingsApplied {
            queue_id,
            match_id,
            changes: changes.to_vec(),
        })
        .await;
    }
}

//! # Event Log Handler
//!
//! Subscribes to the event bus and writes every `LeagueEvent` to the log.
//! This is the runtime's stand-in for a lobby or draft screen that would
//! redraw on each change.

use shared_bus::{EventFilter, InMemoryEventBus, LeagueEvent, Subscription};
use tracing::{debug, info};

/// Logs league events until the bus closes.
pub struct EventLogHandler {
    subscription: Subscription,
}

impl EventLogHandler {
    pub fn new(event_bus: &InMemoryEventBus) -> Self {
        Self {
            subscription: event_bus.subscribe(EventFilter::all()),
        }
    }

    /// Run until the bus is dropped. Returns the number of events logged.
    pub async fn run(mut self) -> u64 {
        let mut logged = 0;
        while let Some(event) = self.subscription.recv().await {
            log_event(&event);
            logged += 1;
        }
        debug!(logged, "Event bus closed, event log handler stopping");
        logged
    }
}

fn log_event(event: &LeagueEvent) {
    match event {
        LeagueEvent::QueueUpdated { queue, version } => info!(
            queue_id = %queue.id,
            name = %queue.name,
            status = %queue.status,
            players = queue.players.len(),
            %version,
            "[event] Queue updated"
        ),
        LeagueEvent::QueueArchived { queue_id } => {
            info!(%queue_id, "[event] Queue archived")
        }
        LeagueEvent::MatchRecorded(record) => info!(
            match_id = %record.id,
            queue_id = %record.queue_id,
            winner = %record.winning_team,
            "[event] Match recorded"
        ),
        LeagueEvent::RatingsApplied {
            queue_id,
            match_id,
            changes,
        } => info!(
            %queue_id,
            %match_id,
            players = changes.len(),
            "[event] Ratings applied"
        ),
    }
}

//! # League Container
//!
//! Holds the event bus, the in-memory adapters and the draft queue service
//! built on top of them.
//!
//! ```text
//! InMemoryEventBus ──→ EventBusNotifier ─┐
//! InMemoryQueueStore ────────────────────┤
//! InMemoryPlayerRegistry ────────────────┼──→ DraftQueueService
//! InMemoryMatchStore ────────────────────┤
//! InMemoryActiveQueueIndex ──────────────┤
//! SystemTimeSource ──────────────────────┘
//! ```

use std::sync::Arc;

use dl_02_draft_queue::{
    DraftQueueService, DraftResult, EventBusNotifier, InMemoryActiveQueueIndex,
    InMemoryMatchStore, InMemoryPlayerRegistry, InMemoryQueueStore, SystemTimeSource,
};
use shared_bus::InMemoryEventBus;
use tracing::{info, warn};

use crate::container::config::LeagueConfig;

/// Draft queue service over the in-memory adapters.
pub type ConcreteDraftQueueService = DraftQueueService<
    InMemoryQueueStore,
    InMemoryPlayerRegistry,
    InMemoryMatchStore,
    InMemoryActiveQueueIndex,
    EventBusNotifier,
    SystemTimeSource,
>;

/// Central container holding the league's shared state.
pub struct LeagueContainer {
    pub config: LeagueConfig,
    /// Change notifications for every successful write.
    pub event_bus: Arc<InMemoryEventBus>,
    pub queues: Arc<InMemoryQueueStore>,
    pub registry: Arc<InMemoryPlayerRegistry>,
    pub matches: Arc<InMemoryMatchStore>,
    pub active: Arc<InMemoryActiveQueueIndex>,
    pub draft_queue: Arc<ConcreteDraftQueueService>,
}

impl LeagueContainer {
    /// Wire adapters and service from `config`.
    pub fn new(config: LeagueConfig) -> DraftResult<Self> {
        let event_bus = Arc::new(InMemoryEventBus::with_capacity(config.bus.capacity));
        let queues = Arc::new(InMemoryQueueStore::new());
        let registry = Arc::new(InMemoryPlayerRegistry::new());
        let matches = Arc::new(InMemoryMatchStore::new());
        let active = Arc::new(InMemoryActiveQueueIndex::new());

        let draft_queue = Arc::new(DraftQueueService::new(
            config.draft.clone(),
            Arc::clone(&queues),
            Arc::clone(&registry),
            Arc::clone(&matches),
            Arc::clone(&active),
            Arc::new(EventBusNotifier::new(Arc::clone(&event_bus))),
            Arc::new(SystemTimeSource),
        )?);

        if !config.rating_is_standard() {
            warn!(
                k_factor = config.draft.rating.k_factor,
                default_rating = config.draft.rating.default_rating,
                "Rating parameters differ from the league standard (K 32, start 1000)"
            );
        }
        info!(
            k_factor = config.draft.rating.k_factor,
            default_rating = config.draft.rating.default_rating,
            bus_capacity = config.bus.capacity,
            "League container initialized"
        );

        Ok(Self {
            config,
            event_bus,
            queues,
            registry,
            matches,
            active,
            draft_queue,
        })
    }
}

//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of every outbound port, plus the event-bus
//! change notifier.

mod active_index;
mod match_store;
mod notifier;
mod queue_store;
mod registry;

pub use active_index::InMemoryActiveQueueIndex;
pub use match_store::InMemoryMatchStore;
pub use notifier::EventBusNotifier;
pub use queue_store::InMemoryQueueStore;
pub use registry::InMemoryPlayerRegistry;

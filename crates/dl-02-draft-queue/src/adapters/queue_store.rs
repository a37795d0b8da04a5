//! In-memory queue store.

use crate::error::{DraftError, DraftResult};
use crate::ports::outbound::QueueStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Queue, QueueId, QueueStatus, Version, Versioned};
use std::collections::HashMap;
use tracing::trace;

/// Queue store backed by a `HashMap`.
///
/// Each write checks and bumps the version under one write lock, which is
/// what makes `put` a compare-and-swap.
#[derive(Default)]
pub struct InMemoryQueueStore {
    queues: RwLock<HashMap<QueueId, Versioned<Queue>>>,
}

impl InMemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queues.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.read().is_empty()
    }
}

#[async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn insert(&self, queue: Queue) -> DraftResult<Versioned<Queue>> {
        let mut queues = self.queues.write();
        if queues.contains_key(&queue.id) {
            return Err(DraftError::Storage {
                reason: format!("queue {} already stored", queue.id),
            });
        }
        let stored = Versioned::new(queue, Version::INITIAL);
        queues.insert(stored.value.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, queue_id: QueueId) -> DraftResult<Versioned<Queue>> {
        self.queues
            .read()
            .get(&queue_id)
            .cloned()
            .ok_or_else(|| DraftError::queue_not_found(queue_id))
    }

    async fn put(&self, queue: Queue, expected: Version) -> DraftResult<Versioned<Queue>> {
        let mut queues = self.queues.write();
        let current = queues
            .get_mut(&queue.id)
            .ok_or_else(|| DraftError::queue_not_found(queue.id))?;

        if current.version != expected {
            trace!(queue_id = %queue.id, %expected, actual = %current.version, "Rejected stale put");
            return Err(DraftError::stale_version(queue.id, expected, current.version));
        }

        *current = Versioned::new(queue, expected.next());
        Ok(current.clone())
    }

    async fn list(&self, statuses: &[QueueStatus]) -> DraftResult<Vec<Versioned<Queue>>> {
        let mut listed: Vec<Versioned<Queue>> = self
            .queues
            .read()
            .values()
            .filter(|q| statuses.is_empty() || statuses.contains(&q.value.status))
            .cloned()
            .collect();
        listed.sort_by(|a, b| {
            a.value
                .name
                .cmp(&b.value.name)
                .then_with(|| a.value.id.cmp(&b.value.id))
        });
        Ok(listed)
    }

    async fn remove(&self, queue_id: QueueId, expected: Version) -> DraftResult<()> {
        let mut queues = self.queues.write();
        let current = queues
            .get(&queue_id)
            .ok_or_else(|| DraftError::queue_not_found(queue_id))?;
        if current.version != expected {
            return Err(DraftError::stale_version(queue_id, expected, current.version));
        }
        queues.remove(&queue_id);
        Ok(())
    }
}

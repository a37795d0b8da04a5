//! In-memory active-queue index.

use crate::error::DraftResult;
use crate::ports::outbound::{ActiveQueueIndex, ClaimOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{PlayerId, QueueId};
use std::collections::HashMap;

/// Maps each player to the single active queue they are bound to.
#[derive(Default)]
pub struct InMemoryActiveQueueIndex {
    claims: Mutex<HashMap<PlayerId, QueueId>>,
}

impl InMemoryActiveQueueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claimed(&self) -> usize {
        self.claims.lock().len()
    }
}

#[async_trait]
impl ActiveQueueIndex for InMemoryActiveQueueIndex {
    async fn claim(&self, player_id: &PlayerId, queue_id: QueueId) -> DraftResult<ClaimOutcome> {
        let mut claims = self.claims.lock();
        Ok(match claims.get(player_id) {
            Some(held) if *held == queue_id => ClaimOutcome::AlreadyHeld,
            Some(held) => ClaimOutcome::Conflict(*held),
            None => {
                claims.insert(player_id.clone(), queue_id);
                ClaimOutcome::Acquired
            }
        })
    }

    async fn release(&self, player_id: &PlayerId, queue_id: QueueId) -> DraftResult<bool> {
        let mut claims = self.claims.lock();
        if claims.get(player_id) == Some(&queue_id) {
            claims.remove(player_id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn active_queue(&self, player_id: &PlayerId) -> DraftResult<Option<QueueId>> {
        Ok(self.claims.lock().get(player_id).copied())
    }
}

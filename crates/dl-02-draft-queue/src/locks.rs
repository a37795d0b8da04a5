//! Per-player guards for commands that touch more than one record.

use crate::error::{DraftError, DraftResult};
use parking_lot::Mutex;
use shared_types::PlayerId;
use std::collections::HashSet;

/// Set of players held by in-flight commands.
///
/// Acquisition never waits: if any requested player is already held the
/// whole request fails with `Conflict`.
#[derive(Default)]
pub struct PlayerLocks {
    held: Mutex<HashSet<PlayerId>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every player in `players` until the guard drops.
    pub fn try_acquire(&self, players: &[PlayerId]) -> DraftResult<PlayerGuard<'_>> {
        let mut held = self.held.lock();
        if let Some(busy) = players.iter().find(|p| held.contains(*p)) {
            return Err(DraftError::player_busy(busy));
        }
        let players: Vec<PlayerId> = players.to_vec();
        held.extend(players.iter().cloned());
        Ok(PlayerGuard {
            locks: self,
            players,
        })
    }

    pub fn held_count(&self) -> usize {
        self.held.lock().len()
    }
}

/// Releases its players on drop.
pub struct PlayerGuard<'a> {
    locks: &'a PlayerLocks,
    players: Vec<PlayerId>,
}

impl Drop for PlayerGuard<'_> {
    fn drop(&mut self) {
        let mut held = self.locks.held.lock();
        for player in &self.players {
            held.remove(player);
        }
    }
}

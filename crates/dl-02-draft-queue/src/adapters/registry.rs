//! In-memory player registry.

use crate::error::{DraftError, DraftResult};
use crate::ports::outbound::PlayerRegistry;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{PlayerId, PlayerProfile, Rating};
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryPlayerRegistry {
    profiles: RwLock<HashMap<PlayerId, PlayerProfile>>,
}

impl InMemoryPlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with `profiles`.
    pub fn with_profiles(profiles: impl IntoIterator<Item = PlayerProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| (p.player_id.clone(), p))
            .collect();
        Self {
            profiles: RwLock::new(profiles),
        }
    }
}

#[async_trait]
impl PlayerRegistry for InMemoryPlayerRegistry {
    async fn create_profile(&self, profile: PlayerProfile) -> DraftResult<PlayerProfile> {
        let mut profiles = self.profiles.write();
        if profiles.contains_key(&profile.player_id) {
            return Err(DraftError::precondition(format!(
                "player {} already has a profile",
                profile.player_id
            )));
        }
        profiles.insert(profile.player_id.clone(), profile.clone());
        Ok(profile)
    }

    async fn get_profile(&self, player_id: &PlayerId) -> DraftResult<PlayerProfile> {
        self.profiles
            .read()
            .get(player_id)
            .cloned()
            .ok_or_else(|| DraftError::player_not_found(player_id))
    }

    async fn get_rating(&self, player_id: &PlayerId) -> DraftResult<Rating> {
        self.profiles
            .read()
            .get(player_id)
            .map(|p| p.rating)
            .ok_or_else(|| DraftError::player_not_found(player_id))
    }

    async fn compare_and_set_rating(
        &self,
        player_id: &PlayerId,
        expected: Rating,
        new: Rating,
    ) -> DraftResult<()> {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .get_mut(player_id)
            .ok_or_else(|| DraftError::player_not_found(player_id))?;
        if profile.rating != expected {
            return Err(DraftError::Conflict {
                resource: format!("rating of {player_id}"),
                expected: expected.to_string(),
                actual: profile.rating.to_string(),
            });
        }
        profile.rating = new;
        Ok(())
    }

    async fn list_profiles(&self) -> DraftResult<Vec<PlayerProfile>> {
        let mut profiles: Vec<PlayerProfile> = self.profiles.read().values().cloned().collect();
        profiles.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        Ok(profiles)
    }
}

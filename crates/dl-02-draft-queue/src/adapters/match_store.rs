//! In-memory match store.

use crate::error::{DraftError, DraftResult};
use crate::ports::outbound::{MatchInsert, MatchStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Match, MatchId, PlayerId, QueueId};
use std::collections::HashMap;

#[derive(Default)]
struct MatchTable {
    records: Vec<Match>,
    by_queue: HashMap<QueueId, usize>,
}

/// Append-only match records keyed by queue.
#[derive(Default)]
pub struct InMemoryMatchStore {
    table: RwLock<MatchTable>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.table.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn insert_if_absent(&self, record: Match) -> DraftResult<MatchInsert> {
        let mut table = self.table.write();
        if let Some(&index) = table.by_queue.get(&record.queue_id) {
            return Ok(MatchInsert::Existing(table.records[index].clone()));
        }
        let index = table.records.len();
        table.by_queue.insert(record.queue_id, index);
        table.records.push(record.clone());
        Ok(MatchInsert::Inserted(record))
    }

    async fn find_by_queue(&self, queue_id: QueueId) -> DraftResult<Option<Match>> {
        let table = self.table.read();
        Ok(table
            .by_queue
            .get(&queue_id)
            .map(|&index| table.records[index].clone()))
    }

    async fn get(&self, match_id: MatchId) -> DraftResult<Match> {
        self.table
            .read()
            .records
            .iter()
            .find(|m| m.id == match_id)
            .cloned()
            .ok_or_else(|| DraftError::NotFound {
                entity: "match",
                id: match_id.to_string(),
            })
    }

    async fn list_for_player(&self, player_id: &PlayerId) -> DraftResult<Vec<Match>> {
        Ok(self
            .table
            .read()
            .records
            .iter()
            .filter(|m| m.includes(player_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{MatchStatus, TeamSide};

    fn record(queue_id: QueueId, team_a: &[&str], team_b: &[&str]) -> Match {
        Match {
            id: MatchId::new(),
            queue_id,
            name: "m".to_string(),
            team_a: team_a.iter().map(|p| PlayerId::from(*p)).collect(),
            team_b: team_b.iter().map(|p| PlayerId::from(*p)).collect(),
            status: MatchStatus::Completed,
            winning_team: TeamSide::A,
            rating_changes: Vec::new(),
            recorded_at_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_one_match_per_queue() {
        let store = InMemoryMatchStore::new();
        let queue_id = QueueId::new();
        let first = record(queue_id, &["a"], &["b"]);

        let inserted = store.insert_if_absent(first.clone()).await.unwrap();
        assert_eq!(inserted, MatchInsert::Inserted(first.clone()));

        let again = store
            .insert_if_absent(record(queue_id, &["x"], &["y"]))
            .await
            .unwrap();
        assert_eq!(again, MatchInsert::Existing(first.clone()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_queue(queue_id).await.unwrap(), Some(first.clone()));
        assert_eq!(store.get(first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_list_for_player() {
        let store = InMemoryMatchStore::new();
        store
            .insert_if_absent(record(QueueId::new(), &["a", "b"], &["c"]))
            .await
            .unwrap();
        store
            .insert_if_absent(record(QueueId::new(), &["d"], &["a"]))
            .await
            .unwrap();
        store
            .insert_if_absent(record(QueueId::new(), &["d"], &["e"]))
            .await
            .unwrap();

        assert_eq!(
            store
                .list_for_player(&PlayerId::from("a"))
                .await
                .unwrap()
                .len(),
            2
        );
        assert!(store
            .list_for_player(&PlayerId::from("zz"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown() {
        let store = InMemoryMatchStore::new();
        assert!(matches!(
            store.get(MatchId::new()).await,
            Err(DraftError::NotFound { .. })
        ));
    }
}

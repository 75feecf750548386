//! Draw record storage interface and in-memory implementation
//!
//! A save fully replaces whatever was stored under the same key: the old
//! header and all of its participation rows go, the new ones come in.
//! Re-running a save with the same split converges to the same state.

use crate::balancer::SquadSplit;
use crate::draw::record::{DrawKey, DrawRecord};
use crate::error::Result;
use crate::types::PlayerId;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Trait for draw record persistence
#[async_trait]
pub trait DrawRecordStore: Send + Sync {
    /// Get the draw stored for a key
    async fn find(&self, key: &DrawKey) -> Result<Option<DrawRecord>>;

    /// Replace any draw under `key` with the given split
    async fn save(&self, key: &DrawKey, split: &SquadSplit, actor_id: &str) -> Result<DrawRecord>;

    /// Remove the draw and its participation rows; returns whether one existed
    async fn delete(&self, key: &DrawKey) -> Result<bool>;

    /// Participation rows stored for a key
    async fn participants(&self, key: &DrawKey) -> Result<BTreeSet<PlayerId>>;

    /// All draws of a group, oldest first
    async fn list_for_group(&self, group_id: &str) -> Result<Vec<DrawRecord>>;

    /// Keys of every draw a player took part in, oldest first
    async fn participation_history(&self, player_id: &str) -> Result<Vec<DrawKey>>;
}

#[derive(Debug, Default)]
struct StoreState {
    records: BTreeMap<DrawKey, DrawRecord>,
    participation: BTreeSet<(DrawKey, PlayerId)>,
}

impl StoreState {
    fn remove(&mut self, key: &DrawKey) -> bool {
        self.participation.retain(|(row_key, _)| row_key != key);
        self.records.remove(key).is_some()
    }
}

/// In-memory draw storage
///
/// Delete and insert run under one write lock, so readers never observe a
/// half-replaced draw.
#[derive(Debug, Default)]
pub struct InMemoryDrawRecordStore {
    state: RwLock<StoreState>,
}

impl InMemoryDrawRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored draw headers
    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Number of stored participation rows across all draws
    pub async fn participation_row_count(&self) -> usize {
        self.state.read().await.participation.len()
    }
}

#[async_trait]
impl DrawRecordStore for InMemoryDrawRecordStore {
    async fn find(&self, key: &DrawKey) -> Result<Option<DrawRecord>> {
        Ok(self.state.read().await.records.get(key).cloned())
    }

    async fn save(&self, key: &DrawKey, split: &SquadSplit, actor_id: &str) -> Result<DrawRecord> {
        let record = DrawRecord::new(key.clone(), split.clone(), actor_id);

        let mut state = self.state.write().await;
        if state.remove(key) {
            debug!("Replaced existing draw {}", key);
        }

        for player_id in record.participants() {
            state
                .participation
                .insert((key.clone(), player_id.clone()));
        }
        state.records.insert(key.clone(), record.clone());

        info!(
            "Saved draw {} with {} participants",
            key,
            record.participants().len()
        );
        Ok(record)
    }

    async fn delete(&self, key: &DrawKey) -> Result<bool> {
        Ok(self.state.write().await.remove(key))
    }

    async fn participants(&self, key: &DrawKey) -> Result<BTreeSet<PlayerId>> {
        let state = self.state.read().await;
        Ok(state
            .participation
            .iter()
            .filter(|(row_key, _)| row_key == key)
            .map(|(_, player_id)| player_id.clone())
            .collect())
    }

    async fn list_for_group(&self, group_id: &str) -> Result<Vec<DrawRecord>> {
        let state = self.state.read().await;
        Ok(state
            .records
            .values()
            .filter(|record| record.key.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn participation_history(&self, player_id: &str) -> Result<Vec<DrawKey>> {
        let state = self.state.read().await;
        let mut keys: Vec<DrawKey> = state
            .participation
            .iter()
            .filter(|(_, row_player)| row_player == player_id)
            .map(|(key, _)| key.clone())
            .collect();

        keys.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.group_id.cmp(&b.group_id)));
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, Role, Squad};
    use chrono::NaiveDate;

    fn split(first: &[&str], second: &[&str]) -> SquadSplit {
        let squad = |label: &str, ids: &[&str]| Squad {
            label: label.to_string(),
            members: ids
                .iter()
                .map(|id| Player::new(*id, Role::Midfielder, 3))
                .collect(),
            average_rating: 60.0,
        };
        SquadSplit::new(squad("Squad 1", first), squad("Squad 2", second))
    }

    fn key(group: &str, day: u32) -> DrawKey {
        DrawKey::new(group, NaiveDate::from_ymd_opt(2024, 5, day).unwrap())
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = InMemoryDrawRecordStore::new();
        let key = key("g1", 4);

        assert!(store.find(&key).await.unwrap().is_none());

        let saved = store
            .save(&key, &split(&["a", "b"], &["c", "d"]), "admin")
            .await
            .unwrap();
        let found = store.find(&key).await.unwrap().unwrap();

        assert_eq!(found, saved);
        assert_eq!(found.created_by, "admin");
        assert_eq!(store.participants(&key).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_repeated_save_is_idempotent() {
        let store = InMemoryDrawRecordStore::new();
        let key = key("g1", 4);
        let split = split(&["a", "b"], &["c", "d"]);

        let first = store.save(&key, &split, "admin").await.unwrap();
        let second = store.save(&key, &split, "admin").await.unwrap();

        assert!(first.same_draw(&second));
        assert_eq!(store.record_count().await, 1);
        assert_eq!(store.participation_row_count().await, 4);
    }

    #[tokio::test]
    async fn test_save_replaces_instead_of_merging() {
        let store = InMemoryDrawRecordStore::new();
        let key = key("g1", 4);

        store
            .save(&key, &split(&["a", "b"], &["c", "d"]), "admin")
            .await
            .unwrap();
        let replaced = store
            .save(&key, &split(&["a", "e"], &["c", "f"]), "coach")
            .await
            .unwrap();

        let rows = store.participants(&key).await.unwrap();
        let expected: BTreeSet<PlayerId> =
            ["a", "c", "e", "f"].iter().map(|s| s.to_string()).collect();

        assert_eq!(rows, expected);
        assert_eq!(replaced.participants(), &expected);
        assert_eq!(store.find(&key).await.unwrap().unwrap().created_by, "coach");
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryDrawRecordStore::new();
        let key = key("g1", 4);

        assert!(!store.delete(&key).await.unwrap());

        store
            .save(&key, &split(&["a", "b"], &["c", "d"]), "admin")
            .await
            .unwrap();
        assert!(store.delete(&key).await.unwrap());
        assert!(store.find(&key).await.unwrap().is_none());
        assert_eq!(store.participation_row_count().await, 0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryDrawRecordStore::new();

        store
            .save(&key("g1", 4), &split(&["a", "b"], &["c", "d"]), "admin")
            .await
            .unwrap();
        store
            .save(&key("g1", 11), &split(&["a", "x"], &["y", "z"]), "admin")
            .await
            .unwrap();
        store
            .save(&key("g2", 4), &split(&["a", "q"], &["r", "s"]), "admin")
            .await
            .unwrap();

        assert_eq!(store.list_for_group("g1").await.unwrap().len(), 2);
        assert_eq!(store.list_for_group("g2").await.unwrap().len(), 1);

        let history = store.participation_history("a").await.unwrap();
        assert_eq!(history, vec![key("g1", 4), key("g2", 4), key("g1", 11)]);
        assert_eq!(
            store.participation_history("x").await.unwrap(),
            vec![key("g1", 11)]
        );
    }
}

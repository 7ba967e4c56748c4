use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::MoodStore;
use crate::error::ApiError;
use crate::models::MoodEntry;

/// Process-local store used for `STORE_BACKEND=memory` and in tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryMoodStore {
    entries: RwLock<HashMap<Uuid, MoodEntry>>,
}

impl InMemoryMoodStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl MoodStore for InMemoryMoodStore {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<MoodEntry>, ApiError> {
        let entries = self.entries.read().await;

        let mut moods: Vec<MoodEntry> = entries
            .values()
            .filter(|entry| entry.owner_id == owner_id)
            .cloned()
            .collect();
        moods.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(moods)
    }

    async fn insert(&self, entry: MoodEntry) -> Result<MoodEntry, ApiError> {
        entry.validate().map_err(ApiError::Validation)?;

        let mut entries = self.entries.write().await;
        entries.insert(entry.id, entry.clone());

        info!("Created mood entry with id: {}", entry.id);
        Ok(entry)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MoodEntry>, ApiError> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn update(&self, entry: &MoodEntry) -> Result<MoodEntry, ApiError> {
        entry.validate().map_err(ApiError::Validation)?;

        let mut entries = self.entries.write().await;
        let stored = entries
            .get_mut(&entry.id)
            .ok_or_else(|| ApiError::not_found("Mood"))?;

        stored.score = entry.score;
        stored.note = entry.note.clone();
        stored.tags = entry.tags.clone();

        info!("Updated mood entry with id: {}", entry.id);
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.entries.write().await.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn close(&self) {
        info!("Dropping {} in-memory mood entries", self.len().await);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn entry_for(owner: &str, score: i32, days_ago: i64) -> MoodEntry {
        MoodEntry::new(
            owner.to_string(),
            score,
            None,
            Vec::new(),
            Some(Utc::now() - Duration::days(days_ago)),
        )
    }

    #[tokio::test]
    async fn test_list_filters_by_owner_and_orders_newest_first() {
        let store = InMemoryMoodStore::new();
        store.insert(entry_for("u1", 3, 5)).await.unwrap();
        store.insert(entry_for("u2", 8, 0)).await.unwrap();
        store.insert(entry_for("u1", 6, 1)).await.unwrap();
        store.insert(entry_for("u1", 9, 3)).await.unwrap();

        let moods = store.list_by_owner("u1").await.unwrap();

        assert_eq!(moods.len(), 3);
        assert!(moods.iter().all(|m| m.owner_id == "u1"));
        let scores: Vec<i32> = moods.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![6, 9, 3]);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_entry() {
        let store = InMemoryMoodStore::new();
        let mut entry = entry_for("u1", 5, 0);
        entry.score = 0;

        let result = store.insert(entry).await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_keeps_identity_fields() {
        let store = InMemoryMoodStore::new();
        let created = store.insert(entry_for("u1", 5, 2)).await.unwrap();

        let mut changed = created.clone();
        changed.score = 2;
        changed.tags = vec!["tired".to_string()];
        changed.owner_id = "someone-else".to_string();
        changed.date = Utc::now();

        let updated = store.update(&changed).await.unwrap();

        assert_eq!(updated.score, 2);
        assert_eq!(updated.tags, vec!["tired".to_string()]);
        assert_eq!(updated.owner_id, "u1");
        assert_eq!(updated.date, created.date);
    }

    #[tokio::test]
    async fn test_update_missing_entry_is_not_found() {
        let store = InMemoryMoodStore::new();

        let result = store.update(&entry_for("u1", 5, 0)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_entry_existed() {
        let store = InMemoryMoodStore::new();
        let created = store.insert(entry_for("u1", 7, 0)).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
    }
}

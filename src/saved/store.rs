//! Saved search persistence

use crate::error::Result;
use crate::models::EntityType;
use crate::search::FilterRequest;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted search, owned by the identity that created it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,

    /// Free-text query to re-run
    pub query: String,

    /// Entity domains to search; empty means all
    pub entity_types: Vec<EntityType>,

    /// Filters to re-apply
    pub filters: FilterRequest,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Consumed external interface: durable saved-search storage
#[async_trait]
pub trait SavedSearchStore: Send + Sync {
    /// Persist a new saved search
    async fn insert(&self, saved: &SavedSearch) -> Result<()>;

    /// Fetch by id
    async fn get(&self, id: &Uuid) -> Result<Option<SavedSearch>>;

    /// Replace an existing saved search
    async fn update(&self, saved: &SavedSearch) -> Result<()>;

    /// Delete by id; returns whether anything was deleted
    async fn delete(&self, id: &Uuid) -> Result<bool>;

    /// All saved searches for one owner, newest first
    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<SavedSearch>>;
}

/// In-memory saved-search store (for MVP and testing)
#[derive(Default)]
pub struct InMemorySavedSearchStore {
    searches: DashMap<Uuid, SavedSearch>,
}

impl InMemorySavedSearchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedSearchStore for InMemorySavedSearchStore {
    async fn insert(&self, saved: &SavedSearch) -> Result<()> {
        self.searches.insert(saved.id, saved.clone());
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<SavedSearch>> {
        Ok(self.searches.get(id).map(|s| s.clone()))
    }

    async fn update(&self, saved: &SavedSearch) -> Result<()> {
        self.searches.insert(saved.id, saved.clone());
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        Ok(self.searches.remove(id).is_some())
    }

    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<SavedSearch>> {
        let mut owned: Vec<SavedSearch> = self
            .searches
            .iter()
            .filter(|entry| entry.owner_id == *owner_id)
            .map(|entry| entry.clone())
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(owner_id: Uuid, name: &str) -> SavedSearch {
        let now = Utc::now();
        SavedSearch {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            query: "logo".to_string(),
            entity_types: Vec::new(),
            filters: FilterRequest::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_owner_and_ordered() {
        let store = InMemorySavedSearchStore::new();
        let owner = Uuid::new_v4();

        let mut older = saved(owner, "older");
        older.created_at = Utc::now() - chrono::Duration::days(1);
        store.insert(&older).await.unwrap();
        store.insert(&saved(owner, "newer")).await.unwrap();
        store.insert(&saved(Uuid::new_v4(), "foreign")).await.unwrap();

        let listed = store.list_by_owner(&owner).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "newer");
        assert_eq!(listed[1].name, "older");
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let store = InMemorySavedSearchStore::new();
        let entry = saved(Uuid::new_v4(), "one");
        store.insert(&entry).await.unwrap();

        assert!(store.delete(&entry.id).await.unwrap());
        assert!(!store.delete(&entry.id).await.unwrap());
        assert!(store.get(&entry.id).await.unwrap().is_none());
    }
}

//! In-memory entity index (for MVP and testing)

use crate::error::Result;
use crate::index::{CountField, EntityIndex, EntityIndexWriter, FieldValueCount, IndexStats, LookupCriteria};
use crate::models::{EntityType, SearchableEntity};
use crate::search::VisibilityScope;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Concurrent map-backed index satisfying the [`EntityIndex`] contract
#[derive(Clone, Default)]
pub struct InMemoryIndex {
    entities: Arc<DashMap<Uuid, SearchableEntity>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn visible_matching(
        &self,
        scope: &VisibilityScope,
        criteria: &LookupCriteria,
    ) -> Vec<SearchableEntity> {
        let now = Utc::now();
        self.entities
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|entity| scope.allows(entity, now) && criteria.matches(entity))
            .collect()
    }
}

#[async_trait]
impl EntityIndex for InMemoryIndex {
    async fn lookup(
        &self,
        scope: &VisibilityScope,
        criteria: &LookupCriteria,
    ) -> Result<Vec<SearchableEntity>> {
        let mut matched = self.visible_matching(scope, criteria);
        // Deterministic base order
        matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        tracing::debug!(candidates = matched.len(), "index lookup");
        Ok(matched)
    }

    async fn prefix_lookup(
        &self,
        scope: &VisibilityScope,
        prefix: &str,
        entity_types: &[EntityType],
        limit: usize,
    ) -> Result<Vec<SearchableEntity>> {
        let now = Utc::now();
        let prefix = prefix.to_lowercase();

        let mut matched: Vec<SearchableEntity> = self
            .entities
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|entity| {
                if !entity_types.is_empty() && !entity_types.contains(&entity.entity_type) {
                    return false;
                }
                if !scope.allows(entity, now) {
                    return false;
                }
                let title = entity.title.to_lowercase();
                title.starts_with(&prefix)
                    || title.split_whitespace().any(|word| word.starts_with(&prefix))
            })
            .collect();

        matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn count_by_field(
        &self,
        scope: &VisibilityScope,
        criteria: &LookupCriteria,
        field: CountField,
    ) -> Result<Vec<FieldValueCount>> {
        let matched = self.visible_matching(scope, criteria);
        let mut counts: HashMap<String, u64> = HashMap::new();

        for entity in &matched {
            match field {
                CountField::EntityType => {
                    *counts.entry(entity.entity_type.to_string()).or_default() += 1;
                }
                CountField::Status => {
                    *counts.entry(entity.status.to_string()).or_default() += 1;
                }
                CountField::AssetType => {
                    if let Some(asset_type) = entity.asset_type {
                        *counts.entry(asset_type.to_string()).or_default() += 1;
                    }
                }
                CountField::Tag => {
                    for tag in &entity.tags {
                        *counts.entry(tag.to_lowercase()).or_default() += 1;
                    }
                }
            }
        }

        let mut out: Vec<FieldValueCount> = counts
            .into_iter()
            .map(|(value, count)| FieldValueCount { value, count })
            .collect();
        out.sort_by(|a, b| b.count.cmp(&a.count).then(a.value.cmp(&b.value)));
        Ok(out)
    }
}

#[async_trait]
impl EntityIndexWriter for InMemoryIndex {
    async fn upsert(&self, entity: &SearchableEntity) -> Result<()> {
        self.entities.insert(entity.id, entity.clone());
        tracing::debug!(entity_id = %entity.id, entity_type = %entity.entity_type, "entity indexed");
        Ok(())
    }

    async fn remove(&self, id: &Uuid) -> Result<()> {
        self.entities.remove(id);
        tracing::debug!(entity_id = %id, "entity removed from index");
        Ok(())
    }

    async fn stats(&self) -> Result<IndexStats> {
        let mut by_type: HashMap<String, u64> = HashMap::new();
        let mut last_updated = None;

        for entry in self.entities.iter() {
            *by_type.entry(entry.entity_type.to_string()).or_default() += 1;
            if last_updated.map_or(true, |t| entry.updated_at > t) {
                last_updated = Some(entry.updated_at);
            }
        }

        let mut by_entity_type: Vec<FieldValueCount> = by_type
            .into_iter()
            .map(|(value, count)| FieldValueCount { value, count })
            .collect();
        by_entity_type.sort_by(|a, b| b.count.cmp(&a.count).then(a.value.cmp(&b.value)));

        Ok(IndexStats {
            total_entities: self.entities.len(),
            by_entity_type,
            last_updated_at: last_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityStatus, EntityType};

    fn entity(title: &str, entity_type: EntityType, tags: &[&str]) -> SearchableEntity {
        let mut e = SearchableEntity::new(
            entity_type,
            title.to_string(),
            Uuid::new_v4(),
            EntityStatus::Published,
        );
        e.tags = tags.iter().map(|t| t.to_string()).collect();
        e
    }

    async fn seeded() -> InMemoryIndex {
        let index = InMemoryIndex::new();
        index
            .upsert(&entity("Brand logo pack", EntityType::Asset, &["logo", "brand"]))
            .await
            .unwrap();
        index
            .upsert(&entity("Summer campaign", EntityType::Project, &["summer"]))
            .await
            .unwrap();
        index
            .upsert(&entity("Logo refresh project", EntityType::Project, &["logo"]))
            .await
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_lookup_matches_tokens() {
        let index = seeded().await;
        let criteria = LookupCriteria {
            tokens: vec!["logo".to_string()],
            ..Default::default()
        };

        let results = index
            .lookup(&VisibilityScope::Unrestricted, &criteria)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_respects_entity_type_filter() {
        let index = seeded().await;
        let criteria = LookupCriteria {
            tokens: vec!["logo".to_string()],
            entity_types: vec![EntityType::Asset],
            ..Default::default()
        };

        let results = index
            .lookup(&VisibilityScope::Unrestricted, &criteria)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Brand logo pack");
    }

    #[tokio::test]
    async fn test_lookup_respects_scope() {
        let index = seeded().await;
        let results = index
            .lookup(&VisibilityScope::Nothing, &LookupCriteria::default())
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_prefix_lookup() {
        let index = seeded().await;
        let results = index
            .prefix_lookup(&VisibilityScope::Unrestricted, "lo", &[], 10)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);

        let capped = index
            .prefix_lookup(&VisibilityScope::Unrestricted, "lo", &[], 1)
            .await
            .unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_count_by_field() {
        let index = seeded().await;
        let counts = index
            .count_by_field(
                &VisibilityScope::Unrestricted,
                &LookupCriteria::default(),
                CountField::EntityType,
            )
            .await
            .unwrap();

        let project = counts.iter().find(|c| c.value == "project").unwrap();
        assert_eq!(project.count, 2);
        let asset = counts.iter().find(|c| c.value == "asset").unwrap();
        assert_eq!(asset.count, 1);
    }

    #[tokio::test]
    async fn test_tag_counts_are_per_value() {
        let index = seeded().await;
        let counts = index
            .count_by_field(
                &VisibilityScope::Unrestricted,
                &LookupCriteria::default(),
                CountField::Tag,
            )
            .await
            .unwrap();

        let logo = counts.iter().find(|c| c.value == "logo").unwrap();
        assert_eq!(logo.count, 2);
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_remove_deletes() {
        let index = InMemoryIndex::new();
        let mut e = entity("Draft asset", EntityType::Asset, &[]);
        index.upsert(&e).await.unwrap();

        e.title = "Renamed asset".to_string();
        index.upsert(&e).await.unwrap();

        let stats = index.stats().await.unwrap();
        assert_eq!(stats.total_entities, 1);

        index.remove(&e.id).await.unwrap();
        let stats = index.stats().await.unwrap();
        assert_eq!(stats.total_entities, 0);
    }
}

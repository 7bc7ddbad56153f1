//! Prefix-based title suggestions

use crate::analytics::PopularityProvider;
use crate::error::Result;
use crate::index::EntityIndex;
use crate::models::{EntityStatus, EntityType};
use crate::search::config::SearchConfig;
use crate::search::permission::VisibilityScope;
use crate::search::query::SuggestQuery;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// How many candidates to pull per requested suggestion, so click-count
/// ranking has something to reorder
const FETCH_FACTOR: usize = 5;

/// One autocomplete suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Uuid,
    pub title: String,
    pub entity_type: EntityType,
    pub status: EntityStatus,

    /// Occurrences of the prefix across the entity's title and tags
    pub match_count: u32,
}

/// Suggests entity titles for a validated prefix, ranked by click popularity
pub struct AutocompleteEngine {
    index: Arc<dyn EntityIndex>,
    popularity: Arc<PopularityProvider>,
    config: SearchConfig,
}

impl AutocompleteEngine {
    pub fn new(
        index: Arc<dyn EntityIndex>,
        popularity: Arc<PopularityProvider>,
        config: SearchConfig,
    ) -> Self {
        Self {
            index,
            popularity,
            config,
        }
    }

    /// Suggestions visible to the scope, most-clicked first with
    /// updated_at desc then id asc breaking ties
    pub async fn suggest(
        &self,
        scope: &VisibilityScope,
        query: &SuggestQuery,
    ) -> Result<Vec<Suggestion>> {
        if scope.matches_nothing() {
            return Ok(Vec::new());
        }

        let limit = query.limit as usize;
        let fetch = limit.saturating_mul(FETCH_FACTOR).max(self.config.suggest_max_limit as usize);
        let mut candidates = self
            .index
            .prefix_lookup(scope, &query.prefix, &[], fetch)
            .await?;

        let clicks = self.popularity.click_counts().await;
        candidates.sort_by(|a, b| {
            let clicks_a = clicks.get(&a.id).copied().unwrap_or(0);
            let clicks_b = clicks.get(&b.id).copied().unwrap_or(0);
            clicks_b
                .cmp(&clicks_a)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        candidates.truncate(limit);

        Ok(candidates
            .into_iter()
            .map(|entity| {
                let match_count = count_occurrences(&entity.title, &query.prefix)
                    + entity
                        .tags
                        .iter()
                        .map(|tag| count_occurrences(tag, &query.prefix))
                        .sum::<u32>();
                Suggestion {
                    id: entity.id,
                    title: entity.title,
                    entity_type: entity.entity_type,
                    status: entity.status,
                    match_count,
                }
            })
            .collect())
    }
}

fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    haystack.to_lowercase().matches(needle).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsConfig, AnalyticsStore, ClickEvent, InMemoryAnalyticsStore};
    use crate::index::{EntityIndexWriter, InMemoryIndex};
    use crate::models::SearchableEntity;

    fn entity(title: &str) -> SearchableEntity {
        SearchableEntity::new(
            EntityType::Asset,
            title.to_string(),
            Uuid::new_v4(),
            EntityStatus::Published,
        )
    }

    async fn engine_with(
        entities: Vec<SearchableEntity>,
        clicked: Option<Uuid>,
    ) -> AutocompleteEngine {
        let index = Arc::new(InMemoryIndex::new());
        for e in &entities {
            index.upsert(e).await.unwrap();
        }
        let store = Arc::new(InMemoryAnalyticsStore::new());
        if let Some(id) = clicked {
            for _ in 0..3 {
                store
                    .append_click_event(&ClickEvent::new(
                        Uuid::new_v4(),
                        id,
                        1,
                        EntityType::Asset,
                    ))
                    .await
                    .unwrap();
            }
        }
        let analytics_config = AnalyticsConfig {
            popularity_refresh_secs: 0,
            ..AnalyticsConfig::default()
        };
        let popularity = Arc::new(PopularityProvider::new(store, &analytics_config));
        AutocompleteEngine::new(index, popularity, SearchConfig::default())
    }

    #[tokio::test]
    async fn test_clicked_entity_ranks_first() {
        let a = entity("logo pack alpha");
        let b = entity("logo pack beta");
        let clicked = b.id;
        let engine = engine_with(vec![a, b], Some(clicked)).await;

        let suggestions = engine
            .suggest(
                &VisibilityScope::Unrestricted,
                &SuggestQuery {
                    prefix: "logo".to_string(),
                    limit: 10,
                },
            )
            .await
            .unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].id, clicked);
    }

    #[tokio::test]
    async fn test_limit_is_honored() {
        let entities: Vec<_> = (0..8).map(|i| entity(&format!("brand kit {i}"))).collect();
        let engine = engine_with(entities, None).await;

        let suggestions = engine
            .suggest(
                &VisibilityScope::Unrestricted,
                &SuggestQuery {
                    prefix: "brand".to_string(),
                    limit: 3,
                },
            )
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_match_count_spans_title_and_tags() {
        let mut e = entity("logo collection");
        e.tags = vec!["logo".to_string(), "logotype".to_string()];
        let engine = engine_with(vec![e], None).await;

        let suggestions = engine
            .suggest(
                &VisibilityScope::Unrestricted,
                &SuggestQuery {
                    prefix: "logo".to_string(),
                    limit: 10,
                },
            )
            .await
            .unwrap();
        assert_eq!(suggestions[0].match_count, 3);
    }

    #[tokio::test]
    async fn test_empty_scope_short_circuits() {
        let engine = engine_with(vec![entity("logo")], None).await;
        let suggestions = engine
            .suggest(
                &VisibilityScope::Nothing,
                &SuggestQuery {
                    prefix: "logo".to_string(),
                    limit: 10,
                },
            )
            .await
            .unwrap();
        assert!(suggestions.is_empty());
    }
}

//! Search pipeline orchestration and response assembly

use crate::analytics::{
    AnalyticsStore, AnalyticsTracker, ClickEvent, PopularityProvider, SearchEvent,
};
use crate::config::Config;
use crate::error::Result;
use crate::index::EntityIndex;
use crate::models::{EntityStatus, EntityType, Identity};
use crate::ratelimit::{RateLimitAction, RateLimiter};
use crate::search::autocomplete::{AutocompleteEngine, Suggestion};
use crate::search::config::SearchConfig;
use crate::search::facets::{FacetAggregator, SearchFacets};
use crate::search::permission::{PermissionResolver, ProfileDirectory};
use crate::search::query::{SearchRequest, SortField, SortOrder, SuggestRequest};
use crate::search::scoring::{
    build_highlights, sort_by_relevance, RelevanceScorer, ScoreBreakdown, ScoredEntity,
};
use crate::search::validator::{validate_search, validate_suggest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// One search result as returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub entity_type: EntityType,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub status: EntityStatus,
    pub relevance_score: f64,
    pub score_breakdown: ScoreBreakdown,

    /// Field snippets with matched words wrapped in `<em>` markers
    pub highlights: HashMap<String, String>,
    pub metadata: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = ((total + limit as u64 - 1) / limit as u64) as u32;
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

/// Complete search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub pagination: Pagination,
    pub facets: SearchFacets,

    /// The query text as the caller sent it
    pub query: String,
    pub execution_time_ms: u64,
}

/// A result click reported by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickRequest {
    /// Search event the click belongs to
    pub event_id: Uuid,

    /// Clicked entity
    pub result_id: Uuid,

    /// 1-based position on the result page
    pub position: u32,

    /// Entity domain of the clicked result
    pub entity_type: String,
}

/// Click acknowledgement; always successful from the caller's view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickAck {
    pub success: bool,
}

/// Orchestrates the full search pipeline: rate limiting, validation, scope
/// resolution, candidate lookup, scoring, facets, and response assembly.
pub struct SearchService {
    index: Arc<dyn EntityIndex>,
    resolver: PermissionResolver,
    scorer: RelevanceScorer,
    facets: FacetAggregator,
    autocomplete: AutocompleteEngine,
    popularity: Arc<PopularityProvider>,
    tracker: AnalyticsTracker,
    limiter: Arc<RateLimiter>,
    config: SearchConfig,
}

impl SearchService {
    /// Wire up the pipeline. Spawns the analytics writer task, so this must
    /// be called within a tokio runtime.
    pub fn new(
        index: Arc<dyn EntityIndex>,
        profiles: Arc<dyn ProfileDirectory>,
        analytics: Arc<dyn AnalyticsStore>,
        config: &Config,
    ) -> Self {
        let popularity = Arc::new(PopularityProvider::new(
            analytics.clone(),
            &config.analytics,
        ));
        Self {
            resolver: PermissionResolver::new(profiles),
            scorer: RelevanceScorer::new(config.scoring.clone()),
            facets: FacetAggregator::new(index.clone()),
            autocomplete: AutocompleteEngine::new(
                index.clone(),
                popularity.clone(),
                config.search.clone(),
            ),
            tracker: AnalyticsTracker::spawn(analytics, config.analytics.queue_capacity),
            limiter: Arc::new(RateLimiter::new(config.rate_limit.clone())),
            config: config.search.clone(),
            popularity,
            index,
        }
    }

    /// Rate limiter shared with collaborators that gate their own actions
    pub fn limiter(&self) -> Arc<RateLimiter> {
        self.limiter.clone()
    }

    /// Execute a search for the given caller
    pub async fn search(
        &self,
        identity: &Identity,
        request: &SearchRequest,
    ) -> Result<SearchResponse> {
        let started = Instant::now();
        self.limiter.check(identity.id, RateLimitAction::Search)?;

        let query = validate_search(request, &self.config)?;
        let scope = self.resolver.scope_for(identity).await?;
        let criteria = query.criteria();
        let now = Utc::now();

        let candidates = self.index.lookup(&scope, &criteria).await?;
        let (clicks, facets) = futures::join!(
            self.popularity.click_counts(),
            self.facets.aggregate(&scope, &criteria, &candidates),
        );
        let facets = facets?;

        let mut scored = self.scorer.score_candidates(&query, &candidates, &clicks, now);
        sort_scored(&mut scored, query.sort_by, query.sort_order);

        let total = scored.len() as u64;
        let offset = (query.page as u64 - 1).saturating_mul(query.limit as u64) as usize;
        let results: Vec<SearchHit> = scored
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .map(|s| self.to_hit(s, &query))
            .collect();

        let execution_time_ms = started.elapsed().as_millis() as u64;
        self.tracker.record_search(SearchEvent::new(
            identity.id,
            &query.original_text,
            total as usize,
            execution_time_ms,
        ));

        tracing::debug!(
            identity_id = %identity.id,
            total,
            execution_time_ms,
            "search executed"
        );

        Ok(SearchResponse {
            results,
            pagination: Pagination::new(query.page, query.limit, total),
            facets,
            query: query.original_text,
            execution_time_ms,
        })
    }

    /// Autocomplete suggestions for the given caller
    pub async fn suggest(
        &self,
        identity: &Identity,
        request: &SuggestRequest,
    ) -> Result<Vec<Suggestion>> {
        self.limiter.check(identity.id, RateLimitAction::Suggest)?;
        let query = validate_suggest(request, &self.config)?;
        let scope = self.resolver.scope_for(identity).await?;
        self.autocomplete.suggest(&scope, &query).await
    }

    /// Record a result click. Always acknowledges; malformed events are
    /// logged and dropped rather than surfaced.
    pub fn record_click(&self, identity: &Identity, request: &ClickRequest) -> ClickAck {
        match EntityType::from_str(&request.entity_type) {
            Ok(entity_type) => {
                self.tracker.record_click(ClickEvent::new(
                    request.event_id,
                    request.result_id,
                    request.position,
                    entity_type,
                ));
            }
            Err(_) => {
                tracing::warn!(
                    identity_id = %identity.id,
                    entity_type = %request.entity_type,
                    "dropping click with unknown entity type"
                );
            }
        }
        ClickAck { success: true }
    }

    fn to_hit(&self, scored: ScoredEntity, query: &crate::search::query::SearchQuery) -> SearchHit {
        let highlights = build_highlights(
            &scored.entity,
            query,
            self.config.highlight_window_words,
        );
        let entity = scored.entity;
        SearchHit {
            id: entity.id,
            entity_type: entity.entity_type,
            title: entity.title,
            description: entity.description,
            tags: entity.tags,
            status: entity.status,
            relevance_score: scored.breakdown.final_score,
            score_breakdown: scored.breakdown,
            highlights,
            metadata: entity.metadata,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Scores are computed for every result regardless of sort, so callers can
/// display them under any ordering
fn sort_scored(scored: &mut [ScoredEntity], sort_by: SortField, sort_order: SortOrder) {
    if sort_by == SortField::Relevance {
        sort_by_relevance(scored);
        return;
    }

    let field_cmp = |a: &ScoredEntity, b: &ScoredEntity| -> Ordering {
        match sort_by {
            SortField::CreatedAt => a.entity.created_at.cmp(&b.entity.created_at),
            SortField::UpdatedAt => a.entity.updated_at.cmp(&b.entity.updated_at),
            SortField::Title => a
                .entity
                .title
                .to_lowercase()
                .cmp(&b.entity.title.to_lowercase()),
            SortField::Relevance => Ordering::Equal,
        }
    };

    scored.sort_by(|a, b| {
        let primary = match sort_order {
            SortOrder::Asc => field_cmp(a, b),
            SortOrder::Desc => field_cmp(b, a),
        };
        primary
            .then_with(|| b.entity.updated_at.cmp(&a.entity.updated_at))
            .then_with(|| a.entity.id.cmp(&b.entity.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchableEntity;

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(1, 20, 45);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(!p.has_previous_page);

        let p = Pagination::new(3, 20, 45);
        assert!(!p.has_next_page);
        assert!(p.has_previous_page);

        let p = Pagination::new(1, 20, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_previous_page);
    }

    fn scored(title: &str) -> ScoredEntity {
        let entity = SearchableEntity::new(
            EntityType::Asset,
            title.to_string(),
            Uuid::new_v4(),
            EntityStatus::Published,
        );
        ScoredEntity {
            entity,
            breakdown: ScoreBreakdown {
                textual: 0.0,
                recency: 0.0,
                popularity: 0.0,
                quality: 0.0,
                final_score: 0.0,
            },
        }
    }

    #[test]
    fn test_title_sort_ascending() {
        let mut items = vec![scored("zebra"), scored("Apple"), scored("mango")];
        sort_scored(&mut items, SortField::Title, SortOrder::Asc);
        let titles: Vec<&str> = items.iter().map(|s| s.entity.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "mango", "zebra"]);
    }

    #[test]
    fn test_created_at_sort_descending() {
        let mut older = scored("older");
        older.entity.created_at = Utc::now() - chrono::Duration::days(10);
        let newer = scored("newer");
        let mut items = vec![older, newer];
        sort_scored(&mut items, SortField::CreatedAt, SortOrder::Desc);
        assert_eq!(items[0].entity.title, "newer");
    }
}

//! Saved search lifecycle and re-execution

use crate::error::{AppError, Result};
use crate::models::{EntityType, Identity};
use crate::ratelimit::{RateLimitAction, RateLimiter};
use crate::saved::store::{SavedSearch, SavedSearchStore};
use crate::search::{FilterRequest, SearchRequest, SearchResponse, SearchService};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Request to persist a new saved search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateSavedSearch {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 200))]
    pub query: String,

    /// Entity domains to search; empty means all
    #[serde(default)]
    pub entity_types: Vec<String>,

    #[serde(default)]
    pub filters: FilterRequest,
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields, default)]
pub struct UpdateSavedSearch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub query: Option<String>,

    pub entity_types: Option<Vec<String>>,

    pub filters: Option<FilterRequest>,
}

/// Owner-scoped saved search management.
///
/// Every read resolves by id then checks ownership; a saved search that does
/// not exist and one owned by someone else produce the same `NotFound`, so
/// callers cannot probe for other identities' saved searches.
pub struct SavedSearchManager {
    store: Arc<dyn SavedSearchStore>,
    service: Arc<SearchService>,
    limiter: Arc<RateLimiter>,
}

impl SavedSearchManager {
    pub fn new(store: Arc<dyn SavedSearchStore>, service: Arc<SearchService>) -> Self {
        let limiter = service.limiter();
        Self {
            store,
            service,
            limiter,
        }
    }

    /// Persist a new saved search for the caller
    pub async fn create(
        &self,
        caller: &Identity,
        request: &CreateSavedSearch,
    ) -> Result<SavedSearch> {
        self.limiter
            .check(caller.id, RateLimitAction::SavedSearchWrite)?;
        request.validate()?;
        let entity_types = parse_entity_types(&request.entity_types)?;

        let now = Utc::now();
        let saved = SavedSearch {
            id: Uuid::new_v4(),
            owner_id: caller.id,
            name: request.name.trim().to_string(),
            query: request.query.trim().to_string(),
            entity_types,
            filters: request.filters.clone(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&saved).await?;

        tracing::info!(saved_search_id = %saved.id, owner_id = %caller.id, "saved search created");
        Ok(saved)
    }

    /// All of the caller's saved searches, newest first
    pub async fn list(&self, caller: &Identity) -> Result<Vec<SavedSearch>> {
        self.store.list_by_owner(&caller.id).await
    }

    /// Apply a partial update to one of the caller's saved searches
    pub async fn update(
        &self,
        caller: &Identity,
        id: &Uuid,
        request: &UpdateSavedSearch,
    ) -> Result<SavedSearch> {
        self.limiter
            .check(caller.id, RateLimitAction::SavedSearchWrite)?;
        request.validate()?;
        let mut saved = self.owned(caller, id).await?;

        if let Some(name) = &request.name {
            saved.name = name.trim().to_string();
        }
        if let Some(query) = &request.query {
            saved.query = query.trim().to_string();
        }
        if let Some(entity_types) = &request.entity_types {
            saved.entity_types = parse_entity_types(entity_types)?;
        }
        if let Some(filters) = &request.filters {
            saved.filters = filters.clone();
        }
        saved.updated_at = Utc::now();

        self.store.update(&saved).await?;
        Ok(saved)
    }

    /// Delete one of the caller's saved searches
    pub async fn delete(&self, caller: &Identity, id: &Uuid) -> Result<()> {
        self.limiter
            .check(caller.id, RateLimitAction::SavedSearchWrite)?;
        let saved = self.owned(caller, id).await?;
        self.store.delete(&saved.id).await?;

        tracing::info!(saved_search_id = %id, owner_id = %caller.id, "saved search deleted");
        Ok(())
    }

    /// Re-run a saved search against the live index under the caller's
    /// current permissions
    pub async fn execute(&self, caller: &Identity, id: &Uuid) -> Result<SearchResponse> {
        let saved = self.owned(caller, id).await?;

        let mut request = SearchRequest::new(saved.query.clone());
        request.entity_types = saved
            .entity_types
            .iter()
            .map(|t| t.to_string())
            .collect();
        request.filters = saved.filters.clone();

        self.service.search(caller, &request).await
    }

    async fn owned(&self, caller: &Identity, id: &Uuid) -> Result<SavedSearch> {
        match self.store.get(id).await? {
            Some(saved) if saved.owner_id == caller.id => Ok(saved),
            _ => Err(AppError::NotFound(format!("saved search {id}"))),
        }
    }
}

fn parse_entity_types(raw: &[String]) -> Result<Vec<EntityType>> {
    raw.iter()
        .map(|t| {
            EntityType::from_str(t)
                .map_err(|_| AppError::Validation(format!("unknown entity type: {t}")))
        })
        .collect()
}

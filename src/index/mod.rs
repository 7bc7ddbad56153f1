//! Indexed store adapter.
//!
//! The search core consumes a queryable entity index but does not define its
//! storage engine. [`EntityIndex`] is the contract: filtered lookup, prefix
//! lookup, and count-by-field aggregation, all evaluated under the caller's
//! [`VisibilityScope`] so unauthorized entities never leave the adapter.

mod memory;

pub use memory::InMemoryIndex;

use crate::error::Result;
use crate::models::{AssetType, EntityStatus, EntityType, SearchableEntity};
use crate::search::VisibilityScope;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Candidate retrieval criteria, already validated and normalized
#[derive(Debug, Clone, Default)]
pub struct LookupCriteria {
    /// Lowercased match tokens; an entity matches when any token occurs in
    /// its title, description, or tags. Empty means match all.
    pub tokens: Vec<String>,

    /// Entity domains to include; empty means all
    pub entity_types: Vec<EntityType>,

    /// Statuses to include; empty means all
    pub statuses: Vec<EntityStatus>,

    /// Asset types to include; empty means all
    pub asset_types: Vec<AssetType>,

    /// Restrict to one owner
    pub owner_id: Option<Uuid>,

    /// Entities must carry every listed tag (lowercased)
    pub tags: Vec<String>,

    /// Created on or after
    pub created_after: Option<DateTime<Utc>>,

    /// Created on or before
    pub created_before: Option<DateTime<Utc>>,
}

impl LookupCriteria {
    /// Whether an entity satisfies the filters and text match
    pub fn matches(&self, entity: &SearchableEntity) -> bool {
        if !self.entity_types.is_empty() && !self.entity_types.contains(&entity.entity_type) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&entity.status) {
            return false;
        }
        if !self.asset_types.is_empty() {
            match entity.asset_type {
                Some(at) if self.asset_types.contains(&at) => {}
                _ => return false,
            }
        }
        if let Some(owner) = self.owner_id {
            if entity.owner_id != owner {
                return false;
            }
        }
        if !self.tags.is_empty() {
            let entity_tags: Vec<String> =
                entity.tags.iter().map(|t| t.to_lowercase()).collect();
            if !self.tags.iter().all(|t| entity_tags.contains(t)) {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if entity.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if entity.created_at > before {
                return false;
            }
        }
        self.matches_text(entity)
    }

    fn matches_text(&self, entity: &SearchableEntity) -> bool {
        if self.tokens.is_empty() {
            return true;
        }
        let title = entity.title.to_lowercase();
        let description = entity
            .description
            .as_deref()
            .map(|d| d.to_lowercase())
            .unwrap_or_default();
        self.tokens.iter().any(|token| {
            title.contains(token)
                || description.contains(token)
                || entity
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(token))
        })
    }
}

/// Field to aggregate counts over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    EntityType,
    Status,
    AssetType,
    Tag,
}

/// One value and how many matching entities carry it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldValueCount {
    pub value: String,
    pub count: u64,
}

/// Index size and freshness statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_entities: usize,
    pub by_entity_type: Vec<FieldValueCount>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// Contract the entity index must satisfy.
///
/// Every method receives the caller's visibility scope so authorization is
/// evaluated inside candidate retrieval, not after it.
#[async_trait]
pub trait EntityIndex: Send + Sync {
    /// Retrieve all entities visible to the scope and matching the criteria,
    /// in a deterministic base order (updated_at desc, then id asc)
    async fn lookup(
        &self,
        scope: &VisibilityScope,
        criteria: &LookupCriteria,
    ) -> Result<Vec<SearchableEntity>>;

    /// Retrieve up to `limit` visible entities whose title matches the
    /// lowercased prefix, cheapest-first ordering left to the engine
    async fn prefix_lookup(
        &self,
        scope: &VisibilityScope,
        prefix: &str,
        entity_types: &[EntityType],
        limit: usize,
    ) -> Result<Vec<SearchableEntity>>;

    /// Count visible, matching entities grouped by a field value.
    /// Multi-valued fields (tags) count each value independently.
    async fn count_by_field(
        &self,
        scope: &VisibilityScope,
        criteria: &LookupCriteria,
        field: CountField,
    ) -> Result<Vec<FieldValueCount>>;
}

/// Write access for the owning domains to keep projections current
#[async_trait]
pub trait EntityIndexWriter: Send + Sync {
    /// Insert or replace an entity projection
    async fn upsert(&self, entity: &SearchableEntity) -> Result<()>;

    /// Remove an entity projection
    async fn remove(&self, id: &Uuid) -> Result<()>;

    /// Index statistics
    async fn stats(&self) -> Result<IndexStats>;
}

#![allow(dead_code)]

use chrono::{Duration, Utc};
use marketplace_search::analytics::InMemoryAnalyticsStore;
use marketplace_search::index::{EntityIndexWriter, InMemoryIndex};
use marketplace_search::models::{
    AssetType, EntityStatus, EntityType, Identity, OwnershipRecord, Role, SearchableEntity,
};
use marketplace_search::search::{InMemoryProfileDirectory, SearchService};
use marketplace_search::Config;
use std::sync::Arc;
use uuid::Uuid;

/// Fully wired service over in-memory stores, plus handles to seed them
pub struct TestHarness {
    pub service: Arc<SearchService>,
    pub index: Arc<InMemoryIndex>,
    pub profiles: Arc<InMemoryProfileDirectory>,
    pub analytics: Arc<InMemoryAnalyticsStore>,
    pub config: Config,
}

/// Build a harness with popularity caching disabled so clicks are visible
/// to the next search immediately
pub fn harness() -> TestHarness {
    let mut config = Config::default();
    config.analytics.popularity_refresh_secs = 0;
    harness_with(config)
}

pub fn harness_with(config: Config) -> TestHarness {
    let index = Arc::new(InMemoryIndex::new());
    let profiles = Arc::new(InMemoryProfileDirectory::new());
    let analytics = Arc::new(InMemoryAnalyticsStore::new());
    let service = Arc::new(SearchService::new(
        index.clone(),
        profiles.clone(),
        analytics.clone(),
        &config,
    ));
    TestHarness {
        service,
        index,
        profiles,
        analytics,
        config,
    }
}

pub fn admin() -> Identity {
    Identity::new(Uuid::new_v4(), Role::Admin)
}

pub fn viewer() -> Identity {
    Identity::new(Uuid::new_v4(), Role::Viewer)
}

pub fn creator() -> Identity {
    Identity::new(Uuid::new_v4(), Role::Creator)
}

pub fn brand() -> Identity {
    Identity::new(Uuid::new_v4(), Role::Brand)
}

/// Published asset with the given title and tags
pub fn asset(title: &str, tags: &[&str]) -> SearchableEntity {
    let mut entity = SearchableEntity::new(
        EntityType::Asset,
        title.to_string(),
        Uuid::new_v4(),
        EntityStatus::Published,
    );
    entity.asset_type = Some(AssetType::Image);
    entity.tags = tags.iter().map(|t| t.to_string()).collect();
    entity
}

pub fn entity_of(
    entity_type: EntityType,
    title: &str,
    status: EntityStatus,
) -> SearchableEntity {
    SearchableEntity::new(entity_type, title.to_string(), Uuid::new_v4(), status)
}

/// Give a creator identity an active ownership record over an entity
pub fn grant(profiles: &InMemoryProfileDirectory, identity: &Identity, entity_id: Uuid) {
    profiles.add_record(identity.id, OwnershipRecord::new(entity_id, identity.id));
}

/// Backdate an entity so recency scoring and date buckets have spread
pub fn age_days(entity: &mut SearchableEntity, days: i64) {
    entity.created_at = Utc::now() - Duration::days(days);
    entity.updated_at = entity.created_at;
}

pub async fn seed(index: &InMemoryIndex, entities: &[SearchableEntity]) {
    for entity in entities {
        index.upsert(entity).await.unwrap();
    }
}

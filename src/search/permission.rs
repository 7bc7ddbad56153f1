//! Role-based visibility rules.
//!
//! The resolver turns `(identity, role)` into a [`VisibilityScope`] predicate
//! that the index applies during candidate retrieval, before scoring and
//! before facet counting. A missing profile is not an error: the scope simply
//! matches nothing and the caller gets an empty result set.

use crate::error::Result;
use crate::models::{Identity, OwnershipRecord, Role, SearchableEntity};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Row-level visibility predicate for one caller
#[derive(Debug, Clone)]
pub enum VisibilityScope {
    /// Admin and viewer roles see everything
    Unrestricted,

    /// Creators see entities covered by an active ownership record
    Member { entity_ids: HashSet<Uuid> },

    /// Brands see what they own, plus active unexpired licenses
    Brand { brand_id: Uuid },

    /// Role without the matching profile; matches nothing
    Nothing,
}

impl VisibilityScope {
    /// Whether the caller may see this entity
    pub fn allows(&self, entity: &SearchableEntity, now: DateTime<Utc>) -> bool {
        match self {
            VisibilityScope::Unrestricted => true,
            VisibilityScope::Nothing => false,
            VisibilityScope::Member { entity_ids } => entity_ids.contains(&entity.id),
            VisibilityScope::Brand { brand_id } => {
                entity.owner_id == *brand_id || entity.is_active_license(now)
            }
        }
    }

    /// Whether the scope can never match any entity
    pub fn matches_nothing(&self) -> bool {
        match self {
            VisibilityScope::Nothing => true,
            VisibilityScope::Member { entity_ids } => entity_ids.is_empty(),
            _ => false,
        }
    }
}

/// Consumed external interface: profile and ownership data for callers
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Ownership/participation records for a creator identity.
    /// Returns `None` when the identity has no creator profile at all.
    async fn creator_records(&self, identity_id: Uuid) -> Result<Option<Vec<OwnershipRecord>>>;

    /// Brand profile id for a brand identity.
    /// Returns `None` when the identity has no brand profile.
    async fn brand_profile(&self, identity_id: Uuid) -> Result<Option<Uuid>>;
}

/// Builds visibility scopes from the caller's current identity.
///
/// Scopes are resolved fresh per request, never cached, so role or ownership
/// changes take effect on the next call.
pub struct PermissionResolver {
    profiles: Arc<dyn ProfileDirectory>,
}

impl PermissionResolver {
    pub fn new(profiles: Arc<dyn ProfileDirectory>) -> Self {
        Self { profiles }
    }

    /// Resolve the visibility scope for a caller
    pub async fn scope_for(&self, identity: &Identity) -> Result<VisibilityScope> {
        let now = Utc::now();
        let scope = match identity.role {
            Role::Admin | Role::Viewer => VisibilityScope::Unrestricted,
            Role::Creator => match self.profiles.creator_records(identity.id).await? {
                Some(records) => VisibilityScope::Member {
                    entity_ids: records
                        .iter()
                        .filter(|r| r.is_active(now))
                        .map(|r| r.entity_id)
                        .collect(),
                },
                None => VisibilityScope::Nothing,
            },
            Role::Brand => match self.profiles.brand_profile(identity.id).await? {
                Some(brand_id) => VisibilityScope::Brand { brand_id },
                None => VisibilityScope::Nothing,
            },
        };

        if scope.matches_nothing() {
            tracing::debug!(
                identity_id = %identity.id,
                role = %identity.role,
                "visibility scope matches nothing"
            );
        }
        Ok(scope)
    }
}

/// In-memory profile directory (for MVP and testing)
#[derive(Default)]
pub struct InMemoryProfileDirectory {
    records: DashMap<Uuid, Vec<OwnershipRecord>>,
    brands: DashMap<Uuid, Uuid>,
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a creator profile, initially without records
    pub fn add_creator(&self, identity_id: Uuid) {
        self.records.entry(identity_id).or_default();
    }

    /// Attach an ownership record to a creator profile
    pub fn add_record(&self, identity_id: Uuid, record: OwnershipRecord) {
        self.records.entry(identity_id).or_default().push(record);
    }

    /// Register a brand profile for an identity
    pub fn set_brand(&self, identity_id: Uuid, brand_id: Uuid) {
        self.brands.insert(identity_id, brand_id);
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    async fn creator_records(&self, identity_id: Uuid) -> Result<Option<Vec<OwnershipRecord>>> {
        Ok(self.records.get(&identity_id).map(|r| r.clone()))
    }

    async fn brand_profile(&self, identity_id: Uuid) -> Result<Option<Uuid>> {
        Ok(self.brands.get(&identity_id).map(|b| *b))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// A searchable projection of a marketplace entity.
///
/// Search never creates or deletes entities; the owning domains push
/// projections into the index and this struct is what the pipeline ranks.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchableEntity {
    /// Immutable identity
    pub id: Uuid,

    /// Which domain the entity belongs to
    pub entity_type: EntityType,

    /// Human-readable title
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    /// Detailed description
    pub description: Option<String>,

    /// Free-form tags (multi-valued)
    pub tags: Vec<String>,

    /// Lifecycle status
    pub status: EntityStatus,

    /// Asset media type (assets only)
    pub asset_type: Option<AssetType>,

    /// Owning identity
    pub owner_id: Uuid,

    /// Expiry (licenses only)
    pub expires_at: Option<DateTime<Utc>>,

    /// Opaque attributes carried through to search hits
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl SearchableEntity {
    /// Create a new projection with fresh timestamps
    pub fn new(
        entity_type: EntityType,
        title: String,
        owner_id: Uuid,
        status: EntityStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            entity_type,
            title,
            description: None,
            tags: Vec::new(),
            status,
            asset_type: None,
            owner_id,
            expires_at: None,
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a license entity is currently active and unexpired
    pub fn is_active_license(&self, now: DateTime<Utc>) -> bool {
        self.entity_type == EntityType::License
            && self.status == EntityStatus::Active
            && self.expires_at.map_or(true, |e| e > now)
    }
}

/// Supported entity domains
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntityType {
    Asset,
    Creator,
    Project,
    License,
}

impl EntityType {
    /// Every supported type, in stable order
    pub fn all() -> Vec<EntityType> {
        vec![
            EntityType::Asset,
            EntityType::Creator,
            EntityType::Project,
            EntityType::License,
        ]
    }
}

/// Entity lifecycle status, shared across domains
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EntityStatus {
    Draft,
    Processing,
    PendingReview,
    Approved,
    Published,
    Active,
    Expired,
    Rejected,
    Archived,
}

/// Asset media type
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AssetType {
    Image,
    Video,
    Audio,
    Document,
    Font,
}

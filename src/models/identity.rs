use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// An authenticated caller, as resolved by the session layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Identity id
    pub id: Uuid,

    /// Role granted by the credential
    pub role: Role,
}

impl Identity {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// Whether this identity bypasses row-level visibility rules
    pub fn is_unrestricted(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Viewer)
    }
}

/// Caller roles recognized by the visibility rules
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Creator,
    Brand,
    Admin,
    Viewer,
}

/// An ownership or participation record tying a member to an entity.
///
/// A record is active while it has no end date, or an end date in the future.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// Entity the record grants visibility into
    pub entity_id: Uuid,

    /// Member holding the record
    pub member_id: Uuid,

    /// When participation started
    pub started_at: DateTime<Utc>,

    /// When participation ended, if it has
    pub ended_at: Option<DateTime<Utc>>,
}

impl OwnershipRecord {
    pub fn new(entity_id: Uuid, member_id: Uuid) -> Self {
        Self {
            entity_id,
            member_id,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Whether the record grants visibility at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.ended_at.map_or(true, |end| end > now)
    }
}

//! Append-only analytics event types

use crate::models::EntityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One executed search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEvent {
    /// Event id, referenced by click events
    pub id: Uuid,

    /// Caller identity
    pub actor_id: Uuid,

    /// Query text as submitted
    pub query: String,

    /// When the search ran
    pub timestamp: DateTime<Utc>,

    /// Matches before pagination
    pub result_count: usize,

    /// Wall time from validation to assembly
    pub execution_time_ms: u64,
}

impl SearchEvent {
    pub fn new(actor_id: Uuid, query: &str, result_count: usize, execution_time_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id,
            query: query.to_string(),
            timestamp: Utc::now(),
            result_count,
            execution_time_ms,
        }
    }
}

/// One result selection within a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Originating search event
    pub event_id: Uuid,

    /// Selected entity
    pub result_id: Uuid,

    /// Zero-based position in the result list
    pub position: u32,

    /// Entity domain of the selection
    pub entity_type: EntityType,

    /// When the result was selected
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn new(event_id: Uuid, result_id: Uuid, position: u32, entity_type: EntityType) -> Self {
        Self {
            event_id,
            result_id,
            position,
            entity_type,
            clicked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_event_construction() {
        let actor = Uuid::new_v4();
        let event = SearchEvent::new(actor, "brand logo", 12, 34);

        assert_eq!(event.actor_id, actor);
        assert_eq!(event.query, "brand logo");
        assert_eq!(event.result_count, 12);
        assert_eq!(event.execution_time_ms, 34);
    }

    #[test]
    fn test_click_event_serialization() {
        let click = ClickEvent::new(Uuid::new_v4(), Uuid::new_v4(), 3, EntityType::Asset);
        let json = serde_json::to_value(&click).unwrap();
        assert_eq!(json["position"], 3);
        assert_eq!(json["entity_type"], "asset");
    }
}

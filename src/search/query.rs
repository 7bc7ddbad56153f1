//! Search request and validated query types

use crate::models::{AssetType, EntityStatus, EntityType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// Sort order for search results
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Field to sort by
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortField {
    #[default]
    Relevance,
    CreatedAt,
    UpdatedAt,
    Title,
}

/// Raw filter shape as received from the transport layer.
///
/// Keys are a closed set; unknown keys are rejected at deserialization so the
/// validator can exhaustively check what remains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FilterRequest {
    /// Filter by lifecycle statuses
    pub statuses: Vec<String>,

    /// Filter by asset media types
    pub asset_types: Vec<String>,

    /// Filter by owning identity
    pub owner_id: Option<Uuid>,

    /// Entities must carry every requested tag
    pub tags: Vec<String>,

    /// Created on or after
    pub date_from: Option<DateTime<Utc>>,

    /// Created on or before
    pub date_to: Option<DateTime<Utc>>,
}

/// Raw search request as received from the transport layer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SearchRequest {
    /// Free-text query
    #[validate(length(min = 2, max = 200))]
    pub query: String,

    /// Entity domains to search; empty means all
    #[serde(default)]
    pub entity_types: Vec<String>,

    /// Filters to apply
    #[serde(default)]
    pub filters: FilterRequest,

    /// 1-based page number
    #[serde(default)]
    pub page: Option<u32>,

    /// Page size
    #[serde(default)]
    pub limit: Option<u32>,

    /// Sort field
    #[serde(default)]
    pub sort_by: Option<String>,

    /// Sort direction
    #[serde(default)]
    pub sort_order: Option<String>,
}

impl SearchRequest {
    /// Create a new search request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            entity_types: Vec::new(),
            filters: FilterRequest::default(),
            page: None,
            limit: None,
            sort_by: None,
            sort_order: None,
        }
    }

    /// Restrict to an entity domain
    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_types.push(entity_type.to_string());
        self
    }

    /// Filter by status
    pub fn with_statuses(mut self, statuses: Vec<impl Into<String>>) -> Self {
        self.filters.statuses = statuses.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Filter by asset type
    pub fn with_asset_types(mut self, types: Vec<impl Into<String>>) -> Self {
        self.filters.asset_types = types.into_iter().map(|t| t.into()).collect();
        self
    }

    /// Filter by owner
    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.filters.owner_id = Some(owner_id);
        self
    }

    /// Filter by tags
    pub fn with_tags(mut self, tags: Vec<impl Into<String>>) -> Self {
        self.filters.tags = tags.into_iter().map(|t| t.into()).collect();
        self
    }

    /// Filter by creation date range
    pub fn with_date_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.filters.date_from = from;
        self.filters.date_to = to;
        self
    }

    /// Set page (1-based)
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set sorting
    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field.to_string());
        self.sort_order = Some(order.to_string());
        self
    }
}

/// Typed filters after validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilter {
    pub statuses: Vec<EntityStatus>,
    pub asset_types: Vec<AssetType>,
    pub owner_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// A validated, normalized search query.
///
/// `original_text` is preserved for highlight rendering and analytics; `text`
/// and `tokens` are the trimmed, lowercased forms used for matching.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub original_text: String,
    pub text: String,
    pub tokens: Vec<String>,
    pub entity_types: Vec<EntityType>,
    pub filter: SearchFilter,
    pub page: u32,
    pub limit: u32,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl SearchQuery {
    /// Candidate retrieval criteria for the index adapter
    pub fn criteria(&self) -> crate::index::LookupCriteria {
        crate::index::LookupCriteria {
            tokens: self.tokens.clone(),
            entity_types: self.entity_types.clone(),
            statuses: self.filter.statuses.clone(),
            asset_types: self.filter.asset_types.clone(),
            owner_id: self.filter.owner_id,
            tags: self.filter.tags.clone(),
            created_after: self.filter.date_from,
            created_before: self.filter.date_to,
        }
    }
}

/// Raw autocomplete request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SuggestRequest {
    /// Prefix text
    #[validate(length(min = 2, max = 100))]
    pub query: String,

    /// Maximum suggestions
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SuggestRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A validated, normalized autocomplete query
#[derive(Debug, Clone)]
pub struct SuggestQuery {
    pub prefix: String,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = SearchRequest::new("brand logo")
            .with_entity_type(EntityType::Asset)
            .with_statuses(vec!["APPROVED", "PUBLISHED"])
            .with_page(2)
            .with_limit(50);

        assert_eq!(request.query, "brand logo");
        assert_eq!(request.entity_types, vec!["asset"]);
        assert_eq!(request.filters.statuses.len(), 2);
        assert_eq!(request.page, Some(2));
        assert_eq!(request.limit, Some(50));
    }

    #[test]
    fn test_unknown_filter_keys_rejected() {
        let raw = r#"{"query": "logo", "filters": {"statuses": [], "color": "red"}}"#;
        let parsed: Result<SearchRequest, _> = serde_json::from_str(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_sort_parsing() {
        use std::str::FromStr;
        assert_eq!(SortField::from_str("updated_at").unwrap(), SortField::UpdatedAt);
        assert_eq!(SortField::from_str("RELEVANCE").unwrap(), SortField::Relevance);
        assert_eq!(SortOrder::from_str("asc").unwrap(), SortOrder::Asc);
        assert!(SortField::from_str("price").is_err());
    }
}

//! Query validation and normalization.
//!
//! Pure functions: raw transport-shaped requests in, typed normalized queries
//! out. Rejections are [`SearchError`] values that map to `VALIDATION_ERROR`.

use crate::models::{AssetType, EntityStatus, EntityType};
use crate::search::config::SearchConfig;
use crate::search::error::SearchError;
use crate::search::query::{
    SearchFilter, SearchQuery, SearchRequest, SortField, SortOrder, SuggestQuery, SuggestRequest,
};
use std::str::FromStr;

/// Query text bounds (characters, after trimming)
pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_QUERY_CHARS: usize = 200;

/// Prefix text bounds for autocomplete
pub const MIN_PREFIX_CHARS: usize = 2;
pub const MAX_PREFIX_CHARS: usize = 100;

/// Validate and normalize a search request
pub fn validate_search(
    request: &SearchRequest,
    config: &SearchConfig,
) -> Result<SearchQuery, SearchError> {
    let original_text = request.query.trim().to_string();
    let chars = original_text.chars().count();
    if chars < MIN_QUERY_CHARS || chars > MAX_QUERY_CHARS {
        return Err(SearchError::InvalidQuery(format!(
            "query text must be {MIN_QUERY_CHARS}-{MAX_QUERY_CHARS} characters, got {chars}"
        )));
    }

    let entity_types = parse_entity_types(&request.entity_types)?;

    let mut statuses = Vec::with_capacity(request.filters.statuses.len());
    for raw in &request.filters.statuses {
        statuses.push(
            EntityStatus::from_str(raw).map_err(|_| SearchError::UnknownStatus(raw.clone()))?,
        );
    }

    let mut asset_types = Vec::with_capacity(request.filters.asset_types.len());
    for raw in &request.filters.asset_types {
        asset_types.push(
            AssetType::from_str(raw).map_err(|_| SearchError::UnknownAssetType(raw.clone()))?,
        );
    }

    if let (Some(from), Some(to)) = (request.filters.date_from, request.filters.date_to) {
        if from > to {
            return Err(SearchError::InvalidDateRange(format!(
                "date_from {from} is after date_to {to}"
            )));
        }
    }

    let page = request.page.unwrap_or(1);
    if page < 1 {
        return Err(SearchError::InvalidQuery("page must be >= 1".to_string()));
    }

    let limit = request.limit.unwrap_or(config.default_limit);
    if limit < 1 || limit > config.max_limit {
        return Err(SearchError::InvalidQuery(format!(
            "limit must be 1-{}, got {limit}",
            config.max_limit
        )));
    }

    let sort_by = match &request.sort_by {
        Some(raw) => SortField::from_str(raw).map_err(|_| SearchError::UnknownSort(raw.clone()))?,
        None => SortField::Relevance,
    };
    let sort_order = match &request.sort_order {
        Some(raw) => SortOrder::from_str(raw).map_err(|_| SearchError::UnknownSort(raw.clone()))?,
        None => SortOrder::Desc,
    };

    let text = original_text.to_lowercase();
    let tokens = text.split_whitespace().map(|t| t.to_string()).collect();

    Ok(SearchQuery {
        original_text,
        text,
        tokens,
        entity_types,
        filter: SearchFilter {
            statuses,
            asset_types,
            owner_id: request.filters.owner_id,
            tags: request.filters.tags.iter().map(|t| t.to_lowercase()).collect(),
            date_from: request.filters.date_from,
            date_to: request.filters.date_to,
        },
        page,
        limit,
        sort_by,
        sort_order,
    })
}

/// Validate and normalize an autocomplete request
pub fn validate_suggest(
    request: &SuggestRequest,
    config: &SearchConfig,
) -> Result<SuggestQuery, SearchError> {
    let prefix = request.query.trim().to_lowercase();
    let chars = prefix.chars().count();
    if chars < MIN_PREFIX_CHARS || chars > MAX_PREFIX_CHARS {
        return Err(SearchError::InvalidQuery(format!(
            "prefix must be {MIN_PREFIX_CHARS}-{MAX_PREFIX_CHARS} characters, got {chars}"
        )));
    }

    let limit = request.limit.unwrap_or(config.suggest_default_limit);
    if limit < 1 || limit > config.suggest_max_limit {
        return Err(SearchError::InvalidQuery(format!(
            "limit must be 1-{}, got {limit}",
            config.suggest_max_limit
        )));
    }

    Ok(SuggestQuery { prefix, limit })
}

fn parse_entity_types(raw: &[String]) -> Result<Vec<EntityType>, SearchError> {
    if raw.is_empty() {
        return Ok(EntityType::all());
    }
    raw.iter()
        .map(|value| {
            EntityType::from_str(value).map_err(|_| SearchError::UnknownEntityType(value.clone()))
        })
        .collect()
}

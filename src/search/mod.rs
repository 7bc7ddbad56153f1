//! Search pipeline: validation, permission filtering, scoring, facets,
//! autocomplete, and response assembly.
//!
//! [`SearchService`] is the entry point; everything else in this module is a
//! pipeline stage it composes. Permission filtering happens inside candidate
//! retrieval (see [`VisibilityScope`]), so later stages only ever see
//! entities the caller is allowed to see.

mod autocomplete;
mod config;
mod error;
mod facets;
mod permission;
mod query;
mod scoring;
mod service;
mod validator;

pub use autocomplete::{AutocompleteEngine, Suggestion};
pub use config::{SearchConfig, SearchConfigBuilder};
pub use error::SearchError;
pub use facets::{FacetAggregator, FacetCount, SearchFacets};
pub use permission::{
    InMemoryProfileDirectory, PermissionResolver, ProfileDirectory, VisibilityScope,
};
pub use query::{
    FilterRequest, SearchFilter, SearchQuery, SearchRequest, SortField, SortOrder, SuggestQuery,
    SuggestRequest,
};
pub use scoring::{
    build_highlights, quality_weight, sort_by_relevance, RelevanceScorer, ScoreBreakdown,
    ScoredEntity, ScoringConfig,
};
pub use service::{
    ClickAck, ClickRequest, Pagination, SearchHit, SearchResponse, SearchService,
};
pub use validator::{validate_search, validate_suggest};

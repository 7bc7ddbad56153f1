//! Search and ranking core for a multi-entity creative marketplace.
//!
//! This crate implements the search pipeline shared by assets, creators,
//! projects, and licenses:
//!
//! - **Query validation**: bounds-checked, normalized queries with typed filters
//! - **Permission filtering**: role-based visibility applied before ranking
//! - **Relevance scoring**: textual, recency, popularity, and quality signals
//! - **Faceted search**: counts by entity type, status, asset type, tags, age
//! - **Autocomplete**: permission-scoped prefix suggestions
//! - **Saved searches**: owner-scoped persisted queries, re-run live
//! - **Click analytics**: fire-and-forget event log feeding popularity
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   SearchService                      │
//! │   search()   suggest()   record_click()              │
//! ├─────────────────────────────────────────────────────┤
//! │ Validator → PermissionResolver → EntityIndex lookup  │
//! │           → RelevanceScorer ∥ FacetAggregator        │
//! │           → response assembly                        │
//! └─────────────────────────────────────────────────────┘
//!             │                           │
//!             ▼                           ▼
//!    ┌──────────────────┐       ┌───────────────────┐
//!    │   EntityIndex     │       │ AnalyticsTracker   │
//!    │ (trait + in-mem)  │       │ (bounded queue)    │
//!    └──────────────────┘       └───────────────────┘
//! ```
//!
//! Transport framing, credential issuance, and durable storage engines are
//! external collaborators; this crate consumes them through the
//! [`index::EntityIndex`], [`search::ProfileDirectory`],
//! [`analytics::AnalyticsStore`], and [`saved::SavedSearchStore`] traits.

pub mod analytics;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod ratelimit;
pub mod saved;
pub mod search;

pub use config::Config;
pub use error::{AppError, Result};

/// Initialize tracing for binaries and tests.
///
/// Respects `RUST_LOG`; falls back to `marketplace_search=info`.
pub fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketplace_search=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

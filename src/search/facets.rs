//! Facet aggregation.
//!
//! Counts run over the permission-filtered, query-matched candidate set
//! before pagination is applied, so they always agree with
//! `pagination.total`. Field counts are pushed down into the index adapter;
//! date buckets are derived from the candidate set directly.

use crate::error::Result;
use crate::index::{CountField, EntityIndex, FieldValueCount, LookupCriteria};
use crate::models::SearchableEntity;
use crate::search::VisibilityScope;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One facet value and its count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

impl From<FieldValueCount> for FacetCount {
    fn from(fc: FieldValueCount) -> Self {
        Self {
            value: fc.value,
            count: fc.count,
        }
    }
}

/// Facet counts keyed by field name
pub type SearchFacets = HashMap<String, Vec<FacetCount>>;

/// Computes facet counts for search responses
pub struct FacetAggregator {
    index: Arc<dyn EntityIndex>,
}

impl FacetAggregator {
    pub fn new(index: Arc<dyn EntityIndex>) -> Self {
        Self { index }
    }

    /// Aggregate all configured facet fields.
    ///
    /// `candidates` is the same pre-pagination set scoring runs over; the
    /// field counts are pushed into the index with the same scope and
    /// criteria so the two views cannot diverge.
    pub async fn aggregate(
        &self,
        scope: &VisibilityScope,
        criteria: &LookupCriteria,
        candidates: &[SearchableEntity],
    ) -> Result<SearchFacets> {
        let (entity_types, statuses, asset_types, tags) = futures::try_join!(
            self.index.count_by_field(scope, criteria, CountField::EntityType),
            self.index.count_by_field(scope, criteria, CountField::Status),
            self.index.count_by_field(scope, criteria, CountField::AssetType),
            self.index.count_by_field(scope, criteria, CountField::Tag),
        )?;

        let mut facets = SearchFacets::new();
        facets.insert("entity_types".to_string(), to_facets(entity_types));
        facets.insert("statuses".to_string(), to_facets(statuses));
        facets.insert("asset_types".to_string(), to_facets(asset_types));
        facets.insert("tags".to_string(), to_facets(tags));
        facets.insert(
            "created".to_string(),
            date_buckets(candidates, Utc::now()),
        );

        Ok(facets)
    }
}

fn to_facets(counts: Vec<FieldValueCount>) -> Vec<FacetCount> {
    counts.into_iter().map(FacetCount::from).collect()
}

/// Disjoint age buckets over `created_at`: each candidate lands in exactly
/// one bucket, so the counts sum to the candidate total.
fn date_buckets(candidates: &[SearchableEntity], now: DateTime<Utc>) -> Vec<FacetCount> {
    let d7 = now - Duration::days(7);
    let d30 = now - Duration::days(30);
    let d90 = now - Duration::days(90);

    let mut last_7 = 0;
    let mut last_30 = 0;
    let mut last_90 = 0;
    let mut older = 0;

    for entity in candidates {
        if entity.created_at >= d7 {
            last_7 += 1;
        } else if entity.created_at >= d30 {
            last_30 += 1;
        } else if entity.created_at >= d90 {
            last_90 += 1;
        } else {
            older += 1;
        }
    }

    vec![
        FacetCount { value: "last_7_days".to_string(), count: last_7 },
        FacetCount { value: "last_30_days".to_string(), count: last_30 },
        FacetCount { value: "last_90_days".to_string(), count: last_90 },
        FacetCount { value: "older".to_string(), count: older },
    ]
}

//! Click-count aggregation for the popularity scoring component.

use crate::analytics::store::AnalyticsStore;
use crate::analytics::AnalyticsConfig;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Serves per-entity click counts over a trailing window.
///
/// Counts are re-aggregated from the analytics log at most once per refresh
/// interval; between refreshes every caller shares the same snapshot. A
/// failed log read degrades to an empty map so the search path keeps working
/// with popularity scores of zero.
pub struct PopularityProvider {
    store: Arc<dyn AnalyticsStore>,
    window: Duration,
    refresh: Duration,
    cache: RwLock<Option<(DateTime<Utc>, Arc<HashMap<Uuid, u64>>)>>,
}

impl PopularityProvider {
    pub fn new(store: Arc<dyn AnalyticsStore>, config: &AnalyticsConfig) -> Self {
        Self {
            store,
            window: Duration::days(config.popularity_window_days as i64),
            refresh: Duration::seconds(config.popularity_refresh_secs as i64),
            cache: RwLock::new(None),
        }
    }

    /// Click counts per entity over the trailing window.
    pub async fn click_counts(&self) -> Arc<HashMap<Uuid, u64>> {
        let now = Utc::now();
        if let Some((refreshed_at, counts)) = self.cache.read().as_ref() {
            if now - *refreshed_at < self.refresh {
                return Arc::clone(counts);
            }
        }

        let counts = Arc::new(self.aggregate(now).await);
        *self.cache.write() = Some((now, Arc::clone(&counts)));
        counts
    }

    async fn aggregate(&self, now: DateTime<Utc>) -> HashMap<Uuid, u64> {
        let since = now - self.window;
        match self.store.click_events_since(since).await {
            Ok(clicks) => {
                let mut counts: HashMap<Uuid, u64> = HashMap::new();
                for click in clicks {
                    *counts.entry(click.result_id).or_insert(0) += 1;
                }
                counts
            }
            Err(e) => {
                tracing::warn!(error = %e, "click aggregation failed, using empty counts");
                HashMap::new()
            }
        }
    }
}

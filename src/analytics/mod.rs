//! Search and click analytics.
//!
//! Events are append-only: the request path only ever enqueues, a background
//! task owns the writes, and the popularity signal is re-aggregated from the
//! log rather than mutated in place. Failures on the write path are logged
//! and swallowed; they never surface to the caller.

mod events;
mod popularity;
mod reports;
mod store;
mod tracker;

pub use events::{ClickEvent, SearchEvent};
pub use popularity::PopularityProvider;
pub use reports::{AnalyticsReporter, QueryCount, QueryReport, Report};
pub use store::{AnalyticsStore, InMemoryAnalyticsStore};
pub use tracker::AnalyticsTracker;

use serde::{Deserialize, Serialize};

/// Analytics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Bounded queue capacity for the tracker; events beyond it are dropped
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Trailing window of clicks feeding the popularity score, in days
    #[serde(default = "default_popularity_window_days")]
    pub popularity_window_days: u32,

    /// How long a popularity snapshot is served before re-aggregating, in
    /// seconds; zero re-aggregates on every search
    #[serde(default = "default_popularity_refresh_secs")]
    pub popularity_refresh_secs: u64,
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_popularity_window_days() -> u32 {
    30
}

fn default_popularity_refresh_secs() -> u64 {
    30
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            popularity_window_days: default_popularity_window_days(),
            popularity_refresh_secs: default_popularity_refresh_secs(),
        }
    }
}

//! Analytics event log storage

use crate::analytics::events::{ClickEvent, SearchEvent};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Consumed external interface: durable, append-only event log
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Append a search event
    async fn append_search_event(&self, event: &SearchEvent) -> Result<()>;

    /// Append a click event
    async fn append_click_event(&self, event: &ClickEvent) -> Result<()>;

    /// Search events recorded at or after `since`
    async fn search_events_since(&self, since: DateTime<Utc>) -> Result<Vec<SearchEvent>>;

    /// Click events recorded at or after `since`
    async fn click_events_since(&self, since: DateTime<Utc>) -> Result<Vec<ClickEvent>>;
}

/// In-memory event log (for MVP and testing)
#[derive(Default)]
pub struct InMemoryAnalyticsStore {
    searches: RwLock<Vec<SearchEvent>>,
    clicks: RwLock<Vec<ClickEvent>>,
}

impl InMemoryAnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalyticsStore for InMemoryAnalyticsStore {
    async fn append_search_event(&self, event: &SearchEvent) -> Result<()> {
        self.searches.write().await.push(event.clone());
        Ok(())
    }

    async fn append_click_event(&self, event: &ClickEvent) -> Result<()> {
        self.clicks.write().await.push(event.clone());
        Ok(())
    }

    async fn search_events_since(&self, since: DateTime<Utc>) -> Result<Vec<SearchEvent>> {
        Ok(self
            .searches
            .read()
            .await
            .iter()
            .filter(|e| e.timestamp >= since)
            .cloned()
            .collect())
    }

    async fn click_events_since(&self, since: DateTime<Utc>) -> Result<Vec<ClickEvent>> {
        Ok(self
            .clicks
            .read()
            .await
            .iter()
            .filter(|e| e.clicked_at >= since)
            .cloned()
            .collect())
    }
}

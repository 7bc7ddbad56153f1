//! Fire-and-forget event recording.
//!
//! The request path only ever calls `try_send` on a bounded channel: a full
//! queue drops the event with a warning, a failed store write is logged by
//! the background task, and neither can delay or fail the caller-visible
//! response.

use crate::analytics::events::{ClickEvent, SearchEvent};
use crate::analytics::store::AnalyticsStore;
use std::sync::Arc;
use tokio::sync::mpsc;

enum TrackerMessage {
    Search(SearchEvent),
    Click(ClickEvent),
}

/// Asynchronous recorder for search and click events
#[derive(Clone)]
pub struct AnalyticsTracker {
    tx: mpsc::Sender<TrackerMessage>,
}

impl AnalyticsTracker {
    /// Spawn the background writer task and return its handle.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(store: Arc<dyn AnalyticsStore>, queue_capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel(queue_capacity);

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let result = match message {
                    TrackerMessage::Search(event) => store.append_search_event(&event).await,
                    TrackerMessage::Click(event) => store.append_click_event(&event).await,
                };
                if let Err(e) = result {
                    tracing::warn!(error = %e, "analytics write failed");
                }
            }
        });

        Self { tx }
    }

    /// Record a search; drops the event if the queue is full
    pub fn record_search(&self, event: SearchEvent) {
        if self.tx.try_send(TrackerMessage::Search(event)).is_err() {
            tracing::warn!("analytics queue full, dropping search event");
        }
    }

    /// Record a click; drops the event if the queue is full
    pub fn record_click(&self, event: ClickEvent) {
        if self.tx.try_send(TrackerMessage::Click(event)).is_err() {
            tracing::warn!("analytics queue full, dropping click event");
        }
    }
}

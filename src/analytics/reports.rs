//! Admin-facing analytics reports

use crate::analytics::store::AnalyticsStore;
use crate::error::{AppError, Result};
use crate::models::{Identity, Role};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// How often a query string was searched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCount {
    pub query: String,
    pub count: u64,
}

/// Aggregated search behavior over a reporting window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReport {
    pub total_searches: u64,
    pub avg_execution_time_ms: f64,
    pub top_queries: Vec<QueryCount>,
    pub zero_result_queries: Vec<QueryCount>,
    pub click_through_rate: f64,
}

/// Generated report envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub summary: String,
    pub data: serde_json::Value,
}

/// Builds reports from the raw event log. Admin-only.
pub struct AnalyticsReporter {
    store: Arc<dyn AnalyticsStore>,
}

impl AnalyticsReporter {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self { store }
    }

    /// Query behavior over the trailing `window_days`
    pub async fn query_report(&self, caller: &Identity, window_days: u32) -> Result<Report> {
        self.require_admin(caller)?;

        let since = Utc::now() - Duration::days(window_days as i64);
        let searches = self.store.search_events_since(since).await?;
        let clicks = self.store.click_events_since(since).await?;

        let total_searches = searches.len() as u64;
        let avg_execution_time_ms = if searches.is_empty() {
            0.0
        } else {
            searches.iter().map(|e| e.execution_time_ms as f64).sum::<f64>()
                / searches.len() as f64
        };

        let mut by_query: HashMap<&str, u64> = HashMap::new();
        let mut zero_results: HashMap<&str, u64> = HashMap::new();
        for event in &searches {
            *by_query.entry(event.query.as_str()).or_insert(0) += 1;
            if event.result_count == 0 {
                *zero_results.entry(event.query.as_str()).or_insert(0) += 1;
            }
        }

        let searches_with_click: u64 = searches
            .iter()
            .filter(|s| clicks.iter().any(|c| c.event_id == s.id))
            .count() as u64;
        let click_through_rate = if total_searches == 0 {
            0.0
        } else {
            searches_with_click as f64 / total_searches as f64
        };

        let report = QueryReport {
            total_searches,
            avg_execution_time_ms,
            top_queries: ranked(by_query, 10),
            zero_result_queries: ranked(zero_results, 10),
            click_through_rate,
        };

        tracing::info!(
            total_searches = report.total_searches,
            window_days,
            "generated query report"
        );

        Ok(Report {
            title: format!("Query report, last {} days", window_days),
            generated_at: Utc::now(),
            summary: format!(
                "{} searches, {:.0}% with a click",
                report.total_searches,
                report.click_through_rate * 100.0
            ),
            data: serde_json::to_value(&report)?,
        })
    }

    fn require_admin(&self, caller: &Identity) -> Result<()> {
        if caller.role != Role::Admin {
            return Err(AppError::Authorization(
                "analytics reports require the admin role".to_string(),
            ));
        }
        Ok(())
    }
}

fn ranked(counts: HashMap<&str, u64>, limit: usize) -> Vec<QueryCount> {
    let mut ranked: Vec<QueryCount> = counts
        .into_iter()
        .map(|(query, count)| QueryCount {
            query: query.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
    ranked.truncate(limit);
    ranked
}

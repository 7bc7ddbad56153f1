//! Per-identity sliding-window rate limiting.
//!
//! Each (identity, action) pair keeps a window of recent call timestamps.
//! Exceeding the window yields [`AppError::RateLimited`] carrying the time at
//! which the oldest call leaves the window; callers must not retry before it.

use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Rate-limited action classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitAction {
    Search,
    Suggest,
    SavedSearchWrite,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Sliding window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Searches allowed per window
    #[serde(default = "default_searches")]
    pub searches_per_minute: u32,

    /// Autocomplete calls allowed per window
    #[serde(default = "default_suggestions")]
    pub suggestions_per_minute: u32,

    /// Saved-search create/update/delete calls allowed per window
    #[serde(default = "default_saved_writes")]
    pub saved_search_writes_per_minute: u32,
}

fn default_window_secs() -> u64 {
    60
}

fn default_searches() -> u32 {
    60
}

fn default_suggestions() -> u32 {
    120
}

fn default_saved_writes() -> u32 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            searches_per_minute: default_searches(),
            suggestions_per_minute: default_suggestions(),
            saved_search_writes_per_minute: default_saved_writes(),
        }
    }
}

impl RateLimitConfig {
    fn limit_for(&self, action: RateLimitAction) -> u32 {
        match action {
            RateLimitAction::Search => self.searches_per_minute,
            RateLimitAction::Suggest => self.suggestions_per_minute,
            RateLimitAction::SavedSearchWrite => self.saved_search_writes_per_minute,
        }
    }
}

/// Sliding-window limiter keyed by (identity, action)
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<(Uuid, RateLimitAction), VecDeque<DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    /// Record one call for the identity, or reject it with the reset time
    pub fn check(&self, identity_id: Uuid, action: RateLimitAction) -> Result<()> {
        let limit = self.config.limit_for(action);
        let window = Duration::seconds(self.config.window_secs as i64);
        let now = Utc::now();

        let mut entry = self.windows.entry((identity_id, action)).or_default();

        // Drop timestamps that have left the window
        while let Some(front) = entry.front() {
            if *front + window <= now {
                entry.pop_front();
            } else {
                break;
            }
        }

        if entry.len() >= limit as usize {
            let reset_at = entry.front().copied().map_or(now, |f| f + window);
            tracing::debug!(
                identity_id = %identity_id,
                action = ?action,
                %reset_at,
                "rate limit exceeded"
            );
            return Err(AppError::RateLimited { reset_at });
        }

        entry.push_back(now);
        Ok(())
    }

    /// Calls remaining in the current window
    pub fn remaining(&self, identity_id: Uuid, action: RateLimitAction) -> u32 {
        let limit = self.config.limit_for(action);
        let window = Duration::seconds(self.config.window_secs as i64);
        let now = Utc::now();

        match self.windows.get(&(identity_id, action)) {
            Some(entry) => {
                let active = entry.iter().filter(|t| **t + window > now).count() as u32;
                limit.saturating_sub(active)
            }
            None => limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(RateLimitConfig {
            searches_per_minute: 3,
            ..Default::default()
        });
        let id = Uuid::new_v4();

        for _ in 0..3 {
            limiter.check(id, RateLimitAction::Search).unwrap();
        }
        let err = limiter.check(id, RateLimitAction::Search).unwrap_err();
        match err {
            AppError::RateLimited { reset_at } => assert!(reset_at > Utc::now()),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_actions_tracked_independently() {
        let limiter = RateLimiter::new(RateLimitConfig {
            saved_search_writes_per_minute: 1,
            ..Default::default()
        });
        let id = Uuid::new_v4();

        limiter.check(id, RateLimitAction::SavedSearchWrite).unwrap();
        assert!(limiter.check(id, RateLimitAction::SavedSearchWrite).is_err());
        // Searches are a separate window
        limiter.check(id, RateLimitAction::Search).unwrap();
    }

    #[test]
    fn test_identities_tracked_independently() {
        let limiter = RateLimiter::new(RateLimitConfig {
            searches_per_minute: 1,
            ..Default::default()
        });

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        limiter.check(a, RateLimitAction::Search).unwrap();
        assert!(limiter.check(a, RateLimitAction::Search).is_err());
        limiter.check(b, RateLimitAction::Search).unwrap();
    }

    #[test]
    fn test_remaining() {
        let limiter = RateLimiter::new(RateLimitConfig {
            suggestions_per_minute: 5,
            ..Default::default()
        });
        let id = Uuid::new_v4();

        assert_eq!(limiter.remaining(id, RateLimitAction::Suggest), 5);
        limiter.check(id, RateLimitAction::Suggest).unwrap();
        limiter.check(id, RateLimitAction::Suggest).unwrap();
        assert_eq!(limiter.remaining(id, RateLimitAction::Suggest), 3);
    }
}

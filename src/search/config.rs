//! Search pipeline configuration

use serde::{Deserialize, Serialize};

/// Search service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size applied when the request omits one
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Hard cap on requested page size
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Suggestion count applied when the request omits one
    #[serde(default = "default_suggest_limit")]
    pub suggest_default_limit: u32,

    /// Hard cap on requested suggestion count
    #[serde(default = "default_suggest_max_limit")]
    pub suggest_max_limit: u32,

    /// Words of context kept around the first match in a highlight snippet
    #[serde(default = "default_highlight_window")]
    pub highlight_window_words: usize,
}

fn default_limit() -> u32 {
    20
}

fn default_max_limit() -> u32 {
    100
}

fn default_suggest_limit() -> u32 {
    10
}

fn default_suggest_max_limit() -> u32 {
    20
}

fn default_highlight_window() -> usize {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            suggest_default_limit: default_suggest_limit(),
            suggest_max_limit: default_suggest_max_limit(),
            highlight_window_words: default_highlight_window(),
        }
    }
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn default_limit(mut self, limit: u32) -> Self {
        self.config.default_limit = limit;
        self
    }

    pub fn max_limit(mut self, limit: u32) -> Self {
        self.config.max_limit = limit;
        self
    }

    pub fn suggest_default_limit(mut self, limit: u32) -> Self {
        self.config.suggest_default_limit = limit;
        self
    }

    pub fn suggest_max_limit(mut self, limit: u32) -> Self {
        self.config.suggest_max_limit = limit;
        self
    }

    pub fn highlight_window_words(mut self, words: usize) -> Self {
        self.config.highlight_window_words = words;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.max_limit, 100);
        assert_eq!(config.suggest_default_limit, 10);
        assert_eq!(config.suggest_max_limit, 20);
    }

    #[test]
    fn test_builder() {
        let config = SearchConfigBuilder::new()
            .default_limit(10)
            .max_limit(50)
            .build();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, 50);
        assert_eq!(config.suggest_default_limit, 10);
    }
}

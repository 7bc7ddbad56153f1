//! Composite relevance scoring.
//!
//! Each candidate gets four normalized (0-1) components:
//!
//! - **textual**: field-weighted match strength, title > description > tags,
//!   with an exact phrase match in the title scoring highest
//! - **recency**: exponential decay of `now - updated_at` with a configurable
//!   half-life
//! - **popularity**: trailing-window click count, min-max normalized across
//!   the current candidate set (not globally)
//! - **quality**: fixed status lookup table
//!
//! The final score is the weighted sum of the components, normalized by the
//! weight total so it stays in [0,1] for any positive weight configuration.

use crate::models::{EntityStatus, SearchableEntity};
use crate::search::query::SearchQuery;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// Status quality boosts. Published and approved material outranks drafts,
/// in-flight processing, and rejected entities.
static QUALITY_WEIGHTS: Lazy<HashMap<EntityStatus, f64>> = Lazy::new(|| {
    HashMap::from([
        (EntityStatus::Published, 1.0),
        (EntityStatus::Active, 0.9),
        (EntityStatus::Approved, 0.9),
        (EntityStatus::PendingReview, 0.5),
        (EntityStatus::Draft, 0.3),
        (EntityStatus::Processing, 0.3),
        (EntityStatus::Expired, 0.2),
        (EntityStatus::Archived, 0.2),
        (EntityStatus::Rejected, 0.1),
    ])
});

/// Relevance scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the textual match component
    #[serde(default = "default_weight_textual")]
    pub weight_textual: f64,

    /// Weight of the recency component
    #[serde(default = "default_weight_recency")]
    pub weight_recency: f64,

    /// Weight of the popularity component
    #[serde(default = "default_weight_popularity")]
    pub weight_popularity: f64,

    /// Weight of the status quality component
    #[serde(default = "default_weight_quality")]
    pub weight_quality: f64,

    /// Recency half-life in days
    #[serde(default = "default_half_life_days")]
    pub half_life_days: f64,
}

fn default_weight_textual() -> f64 {
    0.5
}

fn default_weight_recency() -> f64 {
    0.2
}

fn default_weight_popularity() -> f64 {
    0.15
}

fn default_weight_quality() -> f64 {
    0.15
}

fn default_half_life_days() -> f64 {
    30.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weight_textual: default_weight_textual(),
            weight_recency: default_weight_recency(),
            weight_popularity: default_weight_popularity(),
            weight_quality: default_weight_quality(),
            half_life_days: default_half_life_days(),
        }
    }
}

impl ScoringConfig {
    fn weight_total(&self) -> f64 {
        let total =
            self.weight_textual + self.weight_recency + self.weight_popularity + self.weight_quality;
        if total > 0.0 {
            total
        } else {
            1.0
        }
    }
}

/// Per-component score decomposition for one result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub textual: f64,
    pub recency: f64,
    pub popularity: f64,
    pub quality: f64,
    #[serde(rename = "final")]
    pub final_score: f64,
}

/// A candidate with its score attached
#[derive(Debug, Clone)]
pub struct ScoredEntity {
    pub entity: SearchableEntity,
    pub breakdown: ScoreBreakdown,
}

/// Computes composite scores over a permission-filtered candidate set
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    config: ScoringConfig,
}

impl RelevanceScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score every candidate. Popularity normalization happens across this
    /// candidate set, so outlier entities elsewhere cannot skew the batch.
    pub fn score_candidates(
        &self,
        query: &SearchQuery,
        candidates: &[SearchableEntity],
        clicks: &HashMap<Uuid, u64>,
        now: DateTime<Utc>,
    ) -> Vec<ScoredEntity> {
        let counts: Vec<u64> = candidates
            .iter()
            .map(|e| clicks.get(&e.id).copied().unwrap_or(0))
            .collect();
        let min = counts.iter().min().copied().unwrap_or(0);
        let max = counts.iter().max().copied().unwrap_or(0);

        candidates
            .iter()
            .zip(counts)
            .map(|(entity, count)| {
                let textual = self.textual_score(query, entity);
                let recency = self.recency_score(entity, now);
                let popularity = if max > min {
                    (count - min) as f64 / (max - min) as f64
                } else {
                    0.0
                };
                let quality = quality_weight(entity.status);

                let final_score = (self.config.weight_textual * textual
                    + self.config.weight_recency * recency
                    + self.config.weight_popularity * popularity
                    + self.config.weight_quality * quality)
                    / self.config.weight_total();

                ScoredEntity {
                    entity: entity.clone(),
                    breakdown: ScoreBreakdown {
                        textual,
                        recency,
                        popularity,
                        quality,
                        final_score,
                    },
                }
            })
            .collect()
    }

    /// Field-weighted textual match strength
    fn textual_score(&self, query: &SearchQuery, entity: &SearchableEntity) -> f64 {
        let title = entity.title.to_lowercase();
        if !query.text.is_empty() && title.contains(&query.text) {
            return 1.0;
        }

        let description = entity
            .description
            .as_deref()
            .map(|d| d.to_lowercase())
            .unwrap_or_default();
        let tags: Vec<String> = entity.tags.iter().map(|t| t.to_lowercase()).collect();

        let title_overlap = token_overlap(&query.tokens, |t| title.contains(t));
        let description_overlap = token_overlap(&query.tokens, |t| description.contains(t));
        let tag_overlap = token_overlap(&query.tokens, |t| tags.iter().any(|tag| tag.contains(t)));

        (0.6 * title_overlap + 0.25 * description_overlap + 0.15 * tag_overlap).min(1.0)
    }

    /// Exponential decay of entity age
    fn recency_score(&self, entity: &SearchableEntity, now: DateTime<Utc>) -> f64 {
        let age_days = now
            .signed_duration_since(entity.updated_at)
            .num_seconds()
            .max(0) as f64
            / 86_400.0;
        (-std::f64::consts::LN_2 * age_days / self.config.half_life_days).exp()
    }
}

/// Fraction of query tokens matched by the predicate
fn token_overlap(tokens: &[String], matched: impl Fn(&str) -> bool) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let hits = tokens.iter().filter(|t| matched(t)).count();
    hits as f64 / tokens.len() as f64
}

/// Status quality boost in [0,1]
pub fn quality_weight(status: EntityStatus) -> f64 {
    QUALITY_WEIGHTS.get(&status).copied().unwrap_or(0.0)
}

/// Order scored candidates by final score descending, tie-broken by
/// `updated_at` descending then `id` ascending for deterministic pagination
pub fn sort_by_relevance(scored: &mut [ScoredEntity]) {
    scored.sort_by(|a, b| {
        b.breakdown
            .final_score
            .partial_cmp(&a.breakdown.final_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.entity.updated_at.cmp(&a.entity.updated_at))
            .then_with(|| a.entity.id.cmp(&b.entity.id))
    });
}

/// Highlight snippets for the fields a query matched.
///
/// Matched words are wrapped in `<em>` markers; long descriptions are
/// windowed around the first match with ellipses.
pub fn build_highlights(
    entity: &SearchableEntity,
    query: &SearchQuery,
    window_words: usize,
) -> HashMap<String, String> {
    let mut highlights = HashMap::new();

    if let Some(snippet) = highlight_field(&entity.title, &query.tokens, usize::MAX) {
        highlights.insert("title".to_string(), snippet);
    }
    if let Some(description) = &entity.description {
        if let Some(snippet) = highlight_field(description, &query.tokens, window_words) {
            highlights.insert("description".to_string(), snippet);
        }
    }
    if !entity.tags.is_empty() {
        let joined = entity.tags.join(" ");
        if let Some(snippet) = highlight_field(&joined, &query.tokens, usize::MAX) {
            highlights.insert("tags".to_string(), snippet);
        }
    }

    highlights
}

fn highlight_field(original: &str, tokens: &[String], window_words: usize) -> Option<String> {
    let words: Vec<&str> = original.split_whitespace().collect();
    let is_match =
        |word: &str| -> bool { tokens.iter().any(|t| word.to_lowercase().contains(t.as_str())) };

    let first = words.iter().position(|w| is_match(w))?;

    let (start, end) = if window_words == usize::MAX {
        (0, words.len())
    } else {
        (
            first.saturating_sub(window_words),
            (first + window_words + 1).min(words.len()),
        )
    };

    let mut out = Vec::with_capacity(end - start);
    for word in &words[start..end] {
        if is_match(word) {
            out.push(format!("<em>{word}</em>"));
        } else {
            out.push((*word).to_string());
        }
    }

    let mut snippet = out.join(" ");
    if start > 0 {
        snippet = format!("… {snippet}");
    }
    if end < words.len() {
        snippet = format!("{snippet} …");
    }
    Some(snippet)
}

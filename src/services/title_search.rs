use regex::Regex;
use std::{
    collections::HashSet,
    sync::{Arc, LazyLock},
};

use crate::{
    db::Catalog,
    models::{MatchResult, RowId},
    services::{
        fuzzy,
        normalizer::{normalize_text, TitleNormalizer},
    },
};

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("valid keyword split regex"));

const STOPWORDS: [&str; 3] = ["the", "and", "of"];
const MIN_KEYWORD_CHARS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 3;
pub const DEFAULT_SUGGESTION_CUTOFF: f64 = 0.5;

/// Significant lowercase words of a query: at least three characters and not a stopword
pub fn extract_keywords(query: &str) -> Vec<String> {
    NON_WORD
        .split(&query.to_lowercase())
        .filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS && !STOPWORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Free-text search over the catalog.
///
/// Stages, each in catalog order:
/// 1. exact: title equals the query ignoring case, or normalized forms are equal
/// 2. keyword: title contains every keyword of the query
/// 3. suggestions: only when stages 1 and 2 found nothing, fuzzy-match the
///    normalized query against normalized titles and re-run stages 1 and 2
///    with the best suggestion
///
/// Rows are de-duplicated across stages, keeping their first position.
/// Catalog titles are normalized once up front; the shared memo only sees queries.
pub struct TitleMatcher {
    catalog: Arc<Catalog>,
    normalizer: Arc<TitleNormalizer>,
    /// Normalized title per catalog row, indexed like the catalog
    normalized_titles: Vec<String>,
    suggestion_cutoff: f64,
}

impl TitleMatcher {
    pub fn new(catalog: Arc<Catalog>, normalizer: Arc<TitleNormalizer>) -> Self {
        let normalized_titles = catalog
            .iter()
            .map(|(_, movie)| normalize_text(&movie.title))
            .collect();

        Self {
            catalog,
            normalizer,
            normalized_titles,
            suggestion_cutoff: DEFAULT_SUGGESTION_CUTOFF,
        }
    }

    pub fn with_suggestion_cutoff(mut self, cutoff: f64) -> Self {
        self.suggestion_cutoff = cutoff;
        self
    }

    pub fn search(&self, query: &str) -> MatchResult {
        let original_query = query.trim();
        if original_query.is_empty() {
            return MatchResult::empty(original_query);
        }

        let mut rows = self.direct_matches(original_query);
        let mut suggestions = Vec::new();

        if rows.is_empty() {
            let normalized_query = self.normalizer.normalize(original_query);
            suggestions = self.suggest(&normalized_query);

            if let Some(best) = suggestions.first() {
                for row in self.direct_matches(best) {
                    if !rows.contains(&row) {
                        rows.push(row);
                    }
                }
            }
        }

        tracing::debug!(
            query = %original_query,
            matches = rows.len(),
            suggestions = suggestions.len(),
            "Title search completed"
        );

        MatchResult {
            rows: rows
                .into_iter()
                .filter_map(|row| self.catalog.get(row).cloned())
                .collect(),
            suggestions,
            original_query: original_query.to_string(),
        }
    }

    /// Exact matches followed by keyword matches, without duplicates
    fn direct_matches(&self, query: &str) -> Vec<RowId> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for row in self
            .exact_matches(query)
            .into_iter()
            .chain(self.keyword_matches(query))
        {
            if seen.insert(row) {
                rows.push(row);
            }
        }

        rows
    }

    fn exact_matches(&self, query: &str) -> Vec<RowId> {
        let lowered_query = query.to_lowercase();
        let normalized_query = self.normalizer.normalize(query);

        self.catalog
            .iter()
            .zip(&self.normalized_titles)
            .filter(|((_, movie), normalized_title)| {
                movie.title.to_lowercase() == lowered_query
                    || (!normalized_query.is_empty() && **normalized_title == normalized_query)
            })
            .map(|((row, _), _)| row)
            .collect()
    }

    fn keyword_matches(&self, query: &str) -> Vec<RowId> {
        let keywords = extract_keywords(query);
        if keywords.is_empty() {
            return Vec::new();
        }

        self.catalog
            .iter()
            .filter(|(_, movie)| {
                let title = movie.title.to_lowercase();
                keywords.iter().all(|keyword| title.contains(keyword.as_str()))
            })
            .map(|(row, _)| row)
            .collect()
    }

    fn suggest(&self, normalized_query: &str) -> Vec<String> {
        fuzzy::close_matches(
            normalized_query,
            self.normalized_titles.iter().map(String::as_str),
            MAX_SUGGESTIONS,
            self.suggestion_cutoff,
        )
        .into_iter()
        .map(|close| close.candidate)
        .collect()
    }
}

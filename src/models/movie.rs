use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Stable position of a movie in the catalog.
///
/// The similarity matrix is addressed by the same positions, so a `RowId` is
/// only meaningful for the catalog it was obtained from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub usize);

impl RowId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// A single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    /// TMDB movie id
    pub id: i64,
    pub title: String,
    /// Release date as stored in the catalog (usually `YYYY-MM-DD`)
    pub release_date: String,
}

impl MovieRecord {
    pub fn new(id: i64, title: impl Into<String>, release_date: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            release_date: release_date.into(),
        }
    }
}

/// Outcome of a free-text catalog search
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchResult {
    /// Matched rows, de-duplicated, exact matches first
    pub rows: Vec<MovieRecord>,
    /// Up to three "did you mean" normalized titles
    pub suggestions: Vec<String>,
    pub original_query: String,
}

impl MatchResult {
    pub fn empty(original_query: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            suggestions: Vec::new(),
            original_query: original_query.into(),
        }
    }

    pub fn is_corrected(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

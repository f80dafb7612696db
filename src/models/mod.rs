use serde::Serialize;

pub mod movie;

pub use movie::{MatchResult, MovieRecord, RowId};

/// Movie as rendered in listings (home page, search results, recommendations)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieCard {
    pub id: i64,
    pub title: String,
    /// Absolute poster URL; `None` when the metadata gateway has none
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl MovieCard {
    pub fn with_poster(movie: &MovieRecord, poster: Option<String>) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster,
            release_date: Some(movie.release_date.clone()),
        }
    }

    /// Autocomplete entries carry no release date
    pub fn compact(movie: &MovieRecord, poster: Option<String>) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster,
            release_date: None,
        }
    }
}

/// Response for `GET /`
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub latest_movies: Vec<MovieCard>,
}

/// Response for `GET /movie/:id`
#[derive(Debug, Serialize)]
pub struct MovieDetailResponse {
    /// Raw metadata payload, passed through unmodified
    pub movie: Option<serde_json::Value>,
    pub recommendations: Vec<MovieCard>,
}

/// Response for `GET /search`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<MovieCard>,
    pub suggestions: Vec<String>,
    pub is_corrected: bool,
    pub has_results: bool,
}

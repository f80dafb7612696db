/// Movie metadata providers
///
/// The catalog only stores ids, titles and release dates. Everything shown on
/// a detail page (overview, poster, runtime, ...) comes from an external
/// metadata API behind this trait.
use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the raw detail payload for a movie id.
    ///
    /// The payload is passed through to clients unmodified; callers only
    /// inspect its `poster_path` field.
    async fn fetch_details(&self, movie_id: i64) -> AppResult<serde_json::Value>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// TMDB (The Movie Database) metadata provider
///
/// API Flow:
/// 1. Details: /3/movie/{id}?api_key=...&language=... → full movie payload,
///    including an optional `poster_path` relative to the image host
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const DETAILS_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    /// Creates a TMDB provider whose requests give up after `timeout`
    pub fn new(
        cache: Option<Cache>,
        api_key: String,
        api_url: String,
        language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            cache,
        })
    }

    fn details_url(&self, movie_id: i64) -> String {
        format!("{}/3/movie/{}", self.api_url, movie_id)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_details(&self, movie_id: i64) -> AppResult<serde_json::Value> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let response = self
                    .http_client
                    .get(self.details_url(movie_id))
                    .query(&[
                        ("api_key", self.api_key.as_str()),
                        ("language", self.language.as_str()),
                    ])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::ExternalApi(format!(
                        "TMDB API returned status {}: {}",
                        status, body
                    )));
                }

                let details: serde_json::Value = response.json().await?;
                if !details.is_object() {
                    return Err(AppError::ExternalApi(format!(
                        "Unexpected TMDB payload for movie {}",
                        movie_id
                    )));
                }

                tracing::debug!(movie_id, provider = "tmdb", "Movie details fetched");

                Ok(details)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider(api_url: &str) -> TmdbProvider {
        TmdbProvider::new(
            None,
            "test_key".to_string(),
            api_url.to_string(),
            "en-US".to_string(),
            Duration::from_millis(500),
        )
        .unwrap()
    }

    #[test]
    fn test_details_url() {
        let provider = create_test_provider("https://api.themoviedb.org");
        assert_eq!(
            provider.details_url(27205),
            "https://api.themoviedb.org/3/movie/27205"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let provider = create_test_provider("http://tmdb.test/");
        assert_eq!(provider.details_url(1), "http://tmdb.test/3/movie/1");
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(create_test_provider("http://tmdb.test").name(), "tmdb");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        // nothing listens on port 1
        let provider = create_test_provider("http://127.0.0.1:1");
        let result = provider.fetch_details(27205).await;
        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }
}

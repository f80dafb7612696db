use std::sync::Arc;

use crate::services::providers::MetadataProvider;

/// Resolves display poster URLs through a metadata provider.
///
/// Lookups never fail: any provider error or missing `poster_path` becomes `None`.
#[derive(Clone)]
pub struct PosterService {
    provider: Arc<dyn MetadataProvider>,
    image_base_url: String,
}

impl PosterService {
    pub fn new(provider: Arc<dyn MetadataProvider>, image_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            image_base_url: image_base_url.into(),
        }
    }

    /// Absolute poster URL for a detail payload, if it names a poster
    pub fn poster_from_details(&self, details: &serde_json::Value) -> Option<String> {
        details
            .get("poster_path")
            .and_then(serde_json::Value::as_str)
            .filter(|path| !path.trim().is_empty())
            .map(|path| format!("{}{}", self.image_base_url, path))
    }

    /// Raw detail payload, or `None` when the provider fails
    pub async fn details(&self, movie_id: i64) -> Option<serde_json::Value> {
        match self.provider.fetch_details(movie_id).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    movie_id,
                    provider = self.provider.name(),
                    "Metadata lookup failed"
                );
                None
            }
        }
    }

    pub async fn poster_url(&self, movie_id: i64) -> Option<String> {
        self.details(movie_id)
            .await
            .and_then(|details| self.poster_from_details(&details))
    }

    /// Poster URLs for several movies, fetched in parallel, in input order
    pub async fn posters_for(&self, movie_ids: &[i64]) -> Vec<Option<String>> {
        let tasks: Vec<_> = movie_ids
            .iter()
            .map(|&movie_id| {
                let service = self.clone();
                tokio::spawn(async move { service.poster_url(movie_id).await })
            })
            .collect();

        let mut posters = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(poster) => posters.push(poster),
                Err(e) => {
                    tracing::error!(error = %e, "Poster task join error");
                    posters.push(None);
                }
            }
        }

        let missing = posters.iter().filter(|poster| poster.is_none()).count();
        if missing > 0 {
            tracing::debug!(
                requested = movie_ids.len(),
                missing,
                "Some posters unavailable"
            );
        }

        posters
    }
}

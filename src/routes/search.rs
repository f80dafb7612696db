use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    middleware::RequestId,
    models::{MatchResult, MovieCard, SearchResponse},
    routes::AppState,
};

const AUTOCOMPLETE_LIMIT: usize = 5;
const AUTOCOMPLETE_MIN_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Handler for full search with spelling suggestions.
///
/// A blank query redirects home. Matching runs on the blocking pool; if it
/// panics the client gets an empty result instead of an error.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Redirect::to("/").into_response();
    }

    let matcher = Arc::clone(&state.matcher);
    let pipeline_query = query.clone();
    search_with(&state, request_id, query, move || matcher.search(&pipeline_query)).await
}

/// Runs `pipeline` on the blocking pool and renders its result with posters
async fn search_with<F>(
    state: &AppState,
    request_id: RequestId,
    query: String,
    pipeline: F,
) -> Response
where
    F: FnOnce() -> MatchResult + Send + 'static,
{
    let result = match tokio::task::spawn_blocking(pipeline).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                query = %query,
                error = %e,
                "Search pipeline failed"
            );
            MatchResult::empty(query.as_str())
        }
    };

    let ids: Vec<i64> = result.rows.iter().map(|movie| movie.id).collect();
    let posters = state.posters.posters_for(&ids).await;

    let results: Vec<MovieCard> = result
        .rows
        .iter()
        .zip(posters)
        .map(|(movie, poster)| MovieCard::with_poster(movie, poster))
        .collect();

    tracing::info!(
        request_id = %request_id,
        query = %query,
        results = results.len(),
        suggestions = result.suggestions.len(),
        "Search completed"
    );

    Json(SearchResponse {
        query: result.original_query.clone(),
        has_results: !results.is_empty(),
        is_corrected: result.is_corrected(),
        suggestions: result.suggestions,
        results,
    })
    .into_response()
}

/// Handler for search-box autocomplete: up to five titles containing the query
pub async fn search_suggestions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<MovieCard>> {
    let query = params.q.to_lowercase();
    if query.chars().count() < AUTOCOMPLETE_MIN_CHARS {
        return Json(Vec::new());
    }

    let matches = state.catalog.autocomplete(&query, AUTOCOMPLETE_LIMIT);
    let ids: Vec<i64> = matches.iter().map(|movie| movie.id).collect();
    let posters = state.posters.posters_for(&ids).await;

    Json(
        matches
            .iter()
            .zip(posters)
            .map(|(movie, poster)| MovieCard::compact(movie, poster))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{Catalog, SimilarityIndex},
        models::MovieRecord,
        services::{providers::MockMetadataProvider, PosterService, TitleNormalizer},
    };
    use axum::http::StatusCode;
    use serde_json::Value;

    fn state() -> AppState {
        let catalog = Arc::new(Catalog::from_records(vec![MovieRecord::new(
            1,
            "Inception",
            "2010-07-15",
        )]));
        let similarity =
            Arc::new(SimilarityIndex::from_matrix(vec![vec![1.0]], catalog.len()).unwrap());
        let posters = PosterService::new(Arc::new(MockMetadataProvider::new()), "https://img");

        AppState::new(
            catalog,
            similarity,
            Arc::new(TitleNormalizer::new(10)),
            posters,
            0.5,
        )
    }

    #[tokio::test]
    async fn test_failed_pipeline_answers_with_empty_result() {
        let state = state();
        let response = search_with(&state, RequestId::new(), "Inception".to_string(), || {
            panic!("matcher failure")
        })
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["query"], "Inception");
        assert_eq!(body["results"], serde_json::json!([]));
        assert_eq!(body["suggestions"], serde_json::json!([]));
        assert_eq!(body["is_corrected"], false);
        assert_eq!(body["has_results"], false);
    }
}

use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::{Catalog, SimilarityIndex},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{PosterService, Recommender, TitleMatcher, TitleNormalizer},
};

pub mod home;
pub mod movies;
pub mod search;

/// Shared, read-only state behind every handler
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub matcher: Arc<TitleMatcher>,
    pub recommender: Recommender,
    pub posters: PosterService,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        similarity: Arc<SimilarityIndex>,
        normalizer: Arc<TitleNormalizer>,
        posters: PosterService,
        suggestion_cutoff: f64,
    ) -> Self {
        let matcher = TitleMatcher::new(Arc::clone(&catalog), normalizer)
            .with_suggestion_cutoff(suggestion_cutoff);
        let recommender = Recommender::new(Arc::clone(&catalog), similarity);

        Self {
            catalog,
            matcher: Arc::new(matcher),
            recommender,
            posters,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(home::home))
        .route("/movie/:id", get(movies::movie_detail))
        .route("/search", get(search::search))
        .route("/search_suggestions", get(search::search_suggestions))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // outermost, so the trace span already sees the request id
        .layer(middleware::from_fn(request_id_middleware))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

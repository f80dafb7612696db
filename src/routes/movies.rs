use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{MovieCard, MovieDetailResponse},
    routes::AppState,
};

/// Handler for a movie's detail page: raw metadata plus similar movies
pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<MovieDetailResponse>> {
    let row = state
        .catalog
        .find_by_id(movie_id)
        .ok_or_else(|| AppError::NotFound(format!("Movie {} is not in the catalog", movie_id)))?;

    let similar = state.recommender.recommend_for_row(row)?;
    let ids: Vec<i64> = similar.iter().map(|movie| movie.id).collect();

    let (movie, posters) = tokio::join!(
        state.posters.details(movie_id),
        state.posters.posters_for(&ids)
    );

    tracing::info!(
        request_id = %request_id,
        movie_id,
        has_details = movie.is_some(),
        recommendations = similar.len(),
        "Movie detail served"
    );

    let recommendations = similar
        .iter()
        .zip(posters)
        .map(|(movie, poster)| MovieCard::with_poster(movie, poster))
        .collect();

    Ok(Json(MovieDetailResponse {
        movie,
        recommendations,
    }))
}

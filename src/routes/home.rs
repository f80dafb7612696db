use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    models::{HomeResponse, MovieCard},
    routes::AppState,
};

const LATEST_COUNT: usize = 10;

/// Handler for the home page: the most recent releases with posters
pub async fn home(State(state): State<Arc<AppState>>) -> Json<HomeResponse> {
    let latest = state.catalog.latest(LATEST_COUNT);
    let ids: Vec<i64> = latest.iter().map(|movie| movie.id).collect();
    let posters = state.posters.posters_for(&ids).await;

    let latest_movies = latest
        .iter()
        .zip(posters)
        .map(|(movie, poster)| MovieCard::with_poster(movie, poster))
        .collect();

    Json(HomeResponse { latest_movies })
}

use std::sync::Arc;

use movie_recommender::{
    config::Config,
    db::{create_redis_client, Cache, Catalog, SimilarityIndex},
    routes::{create_router, AppState},
    services::{providers::TmdbProvider, PosterService, TitleNormalizer},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Similarity rows are aligned with catalog rows, so the catalog loads first
    let catalog = Arc::new(Catalog::load_csv(&config.catalog_path)?);
    let similarity = Arc::new(SimilarityIndex::load(&config.similarity_path, catalog.len())?);

    let (cache, cache_writer) = match &config.redis_url {
        Some(redis_url) => {
            let client = create_redis_client(redis_url)?;
            let (cache, handle) = Cache::new(client).await;
            tracing::info!("Metadata cache enabled");
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    let provider = TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
        config.gateway_timeout(),
    )?;
    let posters = PosterService::new(Arc::new(provider), config.tmdb_image_base_url.clone());

    let state = Arc::new(AppState::new(
        catalog,
        similarity,
        Arc::new(TitleNormalizer::new(config.normalizer_cache_size)),
        posters,
        config.suggestion_cutoff,
    ));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        let processed = handle.shutdown().await;
        tracing::info!(processed, "Cache writer flushed");
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

use std::sync::Arc;

use crate::{
    db::{Catalog, SimilarityIndex},
    error::{AppError, AppResult},
    models::{MovieRecord, RowId},
};

pub const RECOMMENDATION_COUNT: usize = 5;

/// Content-based "similar movies" from the precomputed similarity matrix
pub struct Recommender {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityIndex>,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, similarity: Arc<SimilarityIndex>) -> Self {
        Self {
            catalog,
            similarity,
        }
    }

    /// Recommendations for the movie with exactly this title.
    ///
    /// Fails with `NotFound` for an unknown title and `AmbiguousTitle` when
    /// several movies share it.
    pub fn recommend(&self, title: &str) -> AppResult<Vec<MovieRecord>> {
        let row = self.catalog.find_by_title(title)?;
        self.recommend_for_row(row)
    }

    pub fn recommend_by_id(&self, movie_id: i64) -> AppResult<Vec<MovieRecord>> {
        let row = self
            .catalog
            .find_by_id(movie_id)
            .ok_or_else(|| AppError::NotFound(format!("Movie {} is not in the catalog", movie_id)))?;
        self.recommend_for_row(row)
    }

    /// The most similar other rows, best first.
    ///
    /// Equal scores keep catalog order and the movie itself is never returned.
    pub fn recommend_for_row(&self, row: RowId) -> AppResult<Vec<MovieRecord>> {
        let scores = self.similarity.scores(row).ok_or_else(|| {
            AppError::NotFound(format!("No similarity scores for {}", row))
        })?;

        let mut ranked: Vec<(RowId, f32)> = scores
            .iter()
            .enumerate()
            .map(|(position, score)| {
                // NaN must not outrank real scores
                let score = if score.is_nan() { f32::NEG_INFINITY } else { *score };
                (RowId(position), score)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(ranked
            .into_iter()
            .filter(|(candidate, _)| *candidate != row)
            .take(RECOMMENDATION_COUNT)
            .filter_map(|(candidate, _)| self.catalog.get(candidate).cloned())
            .collect())
    }
}

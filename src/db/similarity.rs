use std::{fs::File, io::BufReader, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::RowId,
};

/// Precomputed pairwise similarity scores between catalog rows.
///
/// Row `i` holds the scores of catalog row `i` against every row, so the
/// matrix is always `N x N` for a catalog of `N` movies.
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    rows: Vec<Vec<f32>>,
}

impl SimilarityIndex {
    /// Wraps a matrix after checking it lines up with a catalog of `catalog_len` rows
    pub fn from_matrix(rows: Vec<Vec<f32>>, catalog_len: usize) -> AppResult<Self> {
        if rows.len() != catalog_len {
            return Err(AppError::DataLoad(format!(
                "similarity matrix has {} rows but the catalog has {} movies",
                rows.len(),
                catalog_len
            )));
        }

        if let Some((row, scores)) = rows
            .iter()
            .enumerate()
            .find(|(_, scores)| scores.len() != catalog_len)
        {
            return Err(AppError::DataLoad(format!(
                "similarity row {} has {} columns, expected {}",
                row,
                scores.len(),
                catalog_len
            )));
        }

        Ok(Self { rows })
    }

    /// Loads the matrix from disk: `.json` files via serde_json, anything else as bincode
    pub fn load(path: impl AsRef<Path>, catalog_len: usize) -> AppResult<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let rows: Vec<Vec<f32>> = if is_json {
            serde_json::from_reader(reader).map_err(|e| {
                AppError::DataLoad(format!("similarity matrix JSON: {}", e))
            })?
        } else {
            bincode::deserialize_from(reader).map_err(|e| {
                AppError::DataLoad(format!("similarity matrix bincode: {}", e))
            })?
        };

        let index = Self::from_matrix(rows, catalog_len)?;

        tracing::info!(
            path = %path.display(),
            dimension = index.len(),
            "Loaded similarity matrix"
        );

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Scores of `row` against every catalog row, indexed by position
    pub fn scores(&self, row: RowId) -> Option<&[f32]> {
        self.rows.get(row.index()).map(Vec::as_slice)
    }
}

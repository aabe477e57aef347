//! The encoded catalog: movies and their genre vectors, row-aligned.

use crate::error::{RecommendError, Result};
use data_loader::{Movie, MovieId};
use std::collections::HashMap;

/// Multi-hot genre encoding of one movie, one component per vocabulary label
pub type FeatureVector = Vec<f32>;

/// Movies and feature vectors stored side by side.
///
/// `vectors()[i]` is the encoding of `items()[i]`, and every vector has
/// `dimension()` components. The index is built once and is read-only
/// afterwards, so it can be shared freely behind an `Arc`.
#[derive(Debug)]
pub struct CatalogIndex {
    items: Vec<Movie>,
    vectors: Vec<FeatureVector>,
    /// movieId -> row position
    rows: HashMap<MovieId, usize>,
    dimension: usize,
}

impl CatalogIndex {
    /// Assemble an index from already-encoded parts.
    ///
    /// Fails on duplicate movie ids. Callers guarantee the length invariants.
    pub(crate) fn from_parts(
        items: Vec<Movie>,
        vectors: Vec<FeatureVector>,
        dimension: usize,
    ) -> Result<Self> {
        debug_assert_eq!(items.len(), vectors.len());
        debug_assert!(vectors.iter().all(|v| v.len() == dimension));

        let mut rows = HashMap::with_capacity(items.len());
        for (row, movie) in items.iter().enumerate() {
            if rows.insert(movie.id, row).is_some() {
                return Err(RecommendError::DuplicateItem { id: movie.id });
            }
        }

        Ok(Self {
            items,
            vectors,
            rows,
            dimension,
        })
    }

    /// Number of movies (N)
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Width of every feature vector (D)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Movies in catalog order
    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    /// Feature vectors, parallel to `items()`
    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    /// Movie stored at a row
    pub fn get(&self, row: usize) -> Option<&Movie> {
        self.items.get(row)
    }

    /// Feature vector stored at a row
    pub fn vector(&self, row: usize) -> Option<&[f32]> {
        self.vectors.get(row).map(|v| v.as_slice())
    }

    /// Row position of a movie id
    pub fn row_of(&self, id: MovieId) -> Option<usize> {
        self.rows.get(&id).copied()
    }

    /// Look a movie up by id
    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.row_of(id).and_then(|row| self.items.get(row))
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.rows.contains_key(&id)
    }
}

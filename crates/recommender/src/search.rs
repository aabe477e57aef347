//! Neighbor search engine.
//!
//! Brute-force k-nearest-neighbour scan over the catalog's genre vectors.
//! Catalogs here are a few tens of thousands of rows with a few dozen
//! dimensions, so an exhaustive scan is fast and exact.
//!
//! ## Algorithm
//! 1. `build` precomputes the L2 norm of every catalog vector
//! 2. `query` computes the distance from the query to every row in parallel
//! 3. Rows are stably sorted by distance (ties keep catalog order)
//! 4. The first `k` rows are returned

use crate::error::{RecommendError, Result};
use crate::index::CatalogIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Distance function used to rank catalog rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// `1 - cos(query, row)`; compares genre proportions and ignores magnitude
    #[default]
    Cosine,
    /// Straight-line distance between vectors
    Euclidean,
}

impl Metric {
    fn distance(self, query: &[f32], query_norm: f32, row: &[f32], row_norm: f32) -> f32 {
        match self {
            Metric::Cosine => {
                if row_norm == 0.0 {
                    // Nothing to point in any direction; treat as orthogonal
                    return 1.0;
                }
                let similarity = dot(query, row) / (query_norm * row_norm);
                1.0 - similarity.clamp(-1.0, 1.0)
            }
            Metric::Euclidean => query
                .iter()
                .zip(row)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f32>()
                .sqrt(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Cosine => write!(f, "cosine"),
            Metric::Euclidean => write!(f, "euclidean"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cosine" => Ok(Metric::Cosine),
            "euclidean" => Ok(Metric::Euclidean),
            other => Err(format!(
                "unknown metric '{}' (expected 'cosine' or 'euclidean')",
                other
            )),
        }
    }
}

/// One query hit: the catalog row and its distance from the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f32,
}

/// A ready-to-query search structure over a [`CatalogIndex`].
///
/// Built once; `query` takes `&self`, so one instance can serve any number
/// of concurrent readers.
#[derive(Debug, Clone)]
pub struct NeighborSearch {
    index: Arc<CatalogIndex>,
    metric: Metric,
    /// L2 norm of each catalog vector, parallel to the index rows
    norms: Vec<f32>,
}

impl NeighborSearch {
    /// Prepare the index for querying under the given metric
    #[instrument(skip(index), fields(rows = index.len(), dimension = index.dimension()))]
    pub fn build(index: Arc<CatalogIndex>, metric: Metric) -> Self {
        let norms: Vec<f32> = index.vectors().par_iter().map(|v| l2_norm(v)).collect();
        debug!("Built {} search over {} rows", metric, norms.len());

        Self {
            index,
            metric,
            norms,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    /// The `min(k, N)` rows closest to `query`, nearest first
    ///
    /// # Errors
    /// * `InvalidK` if `k == 0`
    /// * `DimensionMismatch` if the query width differs from the index
    /// * `NonFiniteQuery` if any query component is NaN or infinite
    /// * `ZeroQuery` if the query is all zeros under the cosine metric
    #[instrument(skip(self, query), fields(metric = %self.metric))]
    pub fn query(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 {
            return Err(RecommendError::InvalidK { k });
        }
        if query.len() != self.index.dimension() {
            return Err(RecommendError::DimensionMismatch {
                expected: self.index.dimension(),
                found: query.len(),
            });
        }

        let query_norm = l2_norm(query);
        if !query_norm.is_finite() {
            return Err(RecommendError::NonFiniteQuery);
        }
        if self.metric == Metric::Cosine && query_norm == 0.0 {
            return Err(RecommendError::ZeroQuery);
        }

        let mut neighbors: Vec<Neighbor> = self
            .index
            .vectors()
            .par_iter()
            .zip(self.norms.par_iter())
            .enumerate()
            .map(|(row, (vector, &norm))| Neighbor {
                row,
                distance: self.metric.distance(query, query_norm, vector, norm),
            })
            .collect();

        // `sort_by` is stable, so equal distances stay in catalog order
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);

        debug!("Found {} neighbors", neighbors.len());
        Ok(neighbors)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use data_loader::Movie;

    fn build(movies: Vec<Movie>, metric: Metric) -> NeighborSearch {
        let (_, index) = encode(movies).unwrap();
        NeighborSearch::build(Arc::new(index), metric)
    }

    fn scenario() -> NeighborSearch {
        build(
            vec![
                Movie::new(1, "A", ["Comedy"]),
                Movie::new(2, "B", ["Drama"]),
                Movie::new(3, "C", ["Comedy", "Drama"]),
            ],
            Metric::Cosine,
        )
    }

    #[test]
    fn test_cosine_ranking() {
        let search = scenario();
        let neighbors = search.query(&[1.0, 0.0], 3).unwrap();

        let rows: Vec<usize> = neighbors.iter().map(|n| n.row).collect();
        assert_eq!(rows, vec![0, 2, 1]);
        assert_eq!(neighbors[0].distance, 0.0);
        assert!((neighbors[1].distance - (1.0 - 1.0 / 2f32.sqrt())).abs() < 1e-6);
        assert!((neighbors[2].distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let search = scenario();
        let scaled = search.query(&[5.0, 5.0], 1).unwrap();
        let unit = search.query(&[0.5, 0.5], 1).unwrap();
        assert_eq!(scaled[0].row, 2);
        assert_eq!(unit[0].row, 2);
        assert!(scaled[0].distance.abs() < 1e-6);
    }

    #[test]
    fn test_k_larger_than_catalog() {
        let search = scenario();
        let neighbors = search.query(&[0.0, 1.0], 50).unwrap();
        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let search = build(
            vec![
                Movie::new(7, "First", ["Horror"]),
                Movie::new(3, "Second", ["Comedy"]),
                Movie::new(5, "Third", ["Horror"]),
                Movie::new(1, "Fourth", ["Horror"]),
            ],
            Metric::Cosine,
        );
        // Vocabulary: [Comedy, Horror]
        let neighbors = search.query(&[0.0, 1.0], 3).unwrap();
        let rows: Vec<usize> = neighbors.iter().map(|n| n.row).collect();
        assert_eq!(rows, vec![0, 2, 3]);
    }

    #[test]
    fn test_zero_query_fails_under_cosine() {
        let search = scenario();
        assert_eq!(
            search.query(&[0.0, 0.0], 2).unwrap_err(),
            RecommendError::ZeroQuery
        );
    }

    #[test]
    fn test_zero_query_allowed_under_euclidean() {
        let search = build(
            vec![
                Movie::new(1, "A", ["Comedy"]),
                Movie::new(2, "B", ["Comedy", "Drama"]),
            ],
            Metric::Euclidean,
        );
        let neighbors = search.query(&[0.0, 0.0], 2).unwrap();
        assert_eq!(neighbors[0].row, 0);
        assert!((neighbors[0].distance - 1.0).abs() < 1e-6);
        assert!((neighbors[1].distance - 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_query_is_rejected() {
        let search = scenario();
        assert_eq!(
            search.query(&[f32::NAN, 0.0], 3).unwrap_err(),
            RecommendError::NonFiniteQuery
        );
        assert_eq!(
            search.query(&[f32::INFINITY, 1.0], 3).unwrap_err(),
            RecommendError::NonFiniteQuery
        );

        let euclidean = build(vec![Movie::new(1, "A", ["Comedy"])], Metric::Euclidean);
        assert_eq!(
            euclidean.query(&[f32::NAN], 1).unwrap_err(),
            RecommendError::NonFiniteQuery
        );
    }

    #[test]
    fn test_invalid_k_and_dimension() {
        let search = scenario();
        assert_eq!(
            search.query(&[1.0, 0.0], 0).unwrap_err(),
            RecommendError::InvalidK { k: 0 }
        );
        assert_eq!(
            search.query(&[1.0, 0.0, 0.0], 2).unwrap_err(),
            RecommendError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("cosine".parse::<Metric>(), Ok(Metric::Cosine));
        assert_eq!(" Euclidean ".parse::<Metric>(), Ok(Metric::Euclidean));
        assert!("manhattan".parse::<Metric>().is_err());
        assert_eq!(Metric::default().to_string(), "cosine");
    }
}

//! Recommender - selection-based genre recommendations
//!
//! Turns a user's selected movies into a single query vector and asks the
//! neighbour search for the closest catalog rows.
//!
//! ## Algorithm
//! 1. Resolve every selected id to its catalog row (unknown ids fail)
//! 2. Average the selected rows' feature vectors
//! 3. Scale the average so its components sum to 1
//! 4. Query the k nearest rows and map them back to movies
//!
//! Selected movies are not removed from the results unless
//! `exclude_selected` is configured: a selected movie is usually its own
//! nearest neighbour and will appear near the top.

use crate::config::RecommenderConfig;
use crate::encoder::{GenreVocabulary, encode};
use crate::error::{RecommendError, Result};
use crate::index::{CatalogIndex, FeatureVector};
use crate::search::{Neighbor, NeighborSearch};
use data_loader::{Movie, MovieId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One recommended movie, nearest first in a result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub year: Option<u16>,
    pub genres: Vec<String>,
    /// Distance from the query vector under the configured metric
    pub distance: f32,
}

impl Recommendation {
    fn from_neighbor(movie: &Movie, neighbor: Neighbor) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            year: movie.year,
            genres: movie.genres.iter().cloned().collect(),
            distance: neighbor.distance,
        }
    }
}

/// Everything needed to answer recommendation requests, built once.
///
/// Read-only after `build`; share it by reference or wrap it in an `Arc`.
#[derive(Debug, Clone)]
pub struct Recommender {
    vocabulary: GenreVocabulary,
    index: Arc<CatalogIndex>,
    search: NeighborSearch,
    config: RecommenderConfig,
}

impl Recommender {
    /// Encode the catalog and build the search structure
    ///
    /// Nothing is returned until every stage has succeeded.
    #[instrument(skip(movies), fields(items = movies.len()))]
    pub fn build(movies: Vec<Movie>, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;

        let (vocabulary, index) = encode(movies)?;
        let index = Arc::new(index);
        let search = NeighborSearch::build(Arc::clone(&index), config.metric);

        info!(
            "Recommender ready: {} movies, {} genres, metric {}",
            index.len(),
            vocabulary.len(),
            config.metric
        );

        Ok(Self {
            vocabulary,
            index,
            search,
            config,
        })
    }

    pub fn vocabulary(&self) -> &GenreVocabulary {
        &self.vocabulary
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn search(&self) -> &NeighborSearch {
        &self.search
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Normalized average genre vector of the selection
    ///
    /// Repeated ids count once.
    ///
    /// # Errors
    /// * `EmptySelection` if `selection` is empty
    /// * `UnknownItem` for the first id missing from the catalog
    /// * `DegenerateQuery` if the averaged vector sums to zero
    pub fn query_vector(&self, selection: &[MovieId]) -> Result<FeatureVector> {
        if selection.is_empty() {
            return Err(RecommendError::EmptySelection);
        }

        let mut seen = HashSet::with_capacity(selection.len());
        let mut rows = Vec::with_capacity(selection.len());
        for &id in selection {
            let row = self
                .index
                .row_of(id)
                .ok_or(RecommendError::UnknownItem { id })?;
            if seen.insert(row) {
                rows.push(row);
            }
        }

        let mut query = vec![0.0f32; self.index.dimension()];
        for &row in &rows {
            let vector = &self.index.vectors()[row];
            for (sum, value) in query.iter_mut().zip(vector) {
                *sum += value;
            }
        }
        let count = rows.len() as f32;
        query.iter_mut().for_each(|x| *x /= count);

        let total: f32 = query.iter().sum();
        if total == 0.0 || !total.is_finite() {
            return Err(RecommendError::DegenerateQuery);
        }
        query.iter_mut().for_each(|x| *x /= total);

        Ok(query)
    }

    /// The `k` catalog movies closest to the selection's taste, nearest first
    ///
    /// At most `min(k, N)` results. Selected movies are included unless the
    /// recommender was built with `exclude_selected`.
    #[instrument(skip(self, selection), fields(selected = selection.len()))]
    pub fn recommend(&self, selection: &[MovieId], k: usize) -> Result<Vec<Recommendation>> {
        if k == 0 {
            return Err(RecommendError::InvalidK { k });
        }

        let query = self.query_vector(selection)?;

        let recommendations: Vec<Recommendation> = if self.config.exclude_selected {
            let selected: HashSet<MovieId> = selection.iter().copied().collect();
            // Over-fetch so that k results survive the filter
            self.search
                .query(&query, k.saturating_add(selected.len()))?
                .into_iter()
                .filter_map(|neighbor| self.resolve(neighbor))
                .filter(|rec| !selected.contains(&rec.movie_id))
                .take(k)
                .collect()
        } else {
            self.search
                .query(&query, k)?
                .into_iter()
                .filter_map(|neighbor| self.resolve(neighbor))
                .collect()
        };

        debug!("Returning {} recommendations", recommendations.len());
        Ok(recommendations)
    }

    /// `recommend` with the configured default `k`
    pub fn recommend_default(&self, selection: &[MovieId]) -> Result<Vec<Recommendation>> {
        self.recommend(selection, self.config.k)
    }

    fn resolve(&self, neighbor: Neighbor) -> Option<Recommendation> {
        self.index
            .get(neighbor.row)
            .map(|movie| Recommendation::from_neighbor(movie, neighbor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Metric;
    use std::collections::BTreeSet;

    fn scenario() -> Recommender {
        Recommender::build(
            vec![
                Movie::new(1, "A", ["Comedy"]),
                Movie::new(2, "B", ["Drama"]),
                Movie::new(3, "C", ["Comedy", "Drama"]),
            ],
            RecommenderConfig::default(),
        )
        .unwrap()
    }

    fn ids(recommendations: &[Recommendation]) -> Vec<MovieId> {
        recommendations.iter().map(|r| r.movie_id).collect()
    }

    #[test]
    fn test_query_vector_single_selection() {
        let recommender = scenario();
        assert_eq!(recommender.query_vector(&[1]).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_query_vector_is_l1_normalized_mean() {
        let recommender = scenario();
        // mean of [1,0] and [1,1] = [1, 0.5]; normalized = [2/3, 1/3]
        let query = recommender.query_vector(&[1, 3]).unwrap();
        assert!((query[0] - 2.0 / 3.0).abs() < 1e-6);
        assert!((query[1] - 1.0 / 3.0).abs() < 1e-6);
        assert!((query.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_ids_count_once() {
        let recommender = scenario();
        assert_eq!(
            recommender.query_vector(&[1, 3, 1, 1]).unwrap(),
            recommender.query_vector(&[3, 1]).unwrap()
        );
    }

    #[test]
    fn test_recommend_scenario_order() {
        let recommender = scenario();
        let recommendations = recommender.recommend(&[1], 2).unwrap();

        assert_eq!(ids(&recommendations), vec![1, 3]);
        assert_eq!(recommendations[0].distance, 0.0);
        assert!(recommendations[1].distance > 0.0);

        let all = recommender.recommend(&[1], 3).unwrap();
        assert_eq!(ids(&all), vec![1, 3, 2]);
        assert!((all[2].distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_selection_errors() {
        let recommender = scenario();
        assert_eq!(
            recommender.recommend(&[], 10).unwrap_err(),
            RecommendError::EmptySelection
        );
        assert_eq!(
            recommender.recommend(&[1, 42], 10).unwrap_err(),
            RecommendError::UnknownItem { id: 42 }
        );
        assert_eq!(
            recommender.recommend(&[1], 0).unwrap_err(),
            RecommendError::InvalidK { k: 0 }
        );
    }

    #[test]
    fn test_exclude_selected() {
        let recommender = Recommender::build(
            vec![
                Movie::new(1, "A", ["Comedy"]),
                Movie::new(2, "B", ["Drama"]),
                Movie::new(3, "C", ["Comedy", "Drama"]),
                Movie::new(4, "D", ["Comedy"]),
            ],
            RecommenderConfig::default().with_exclude_selected(true),
        )
        .unwrap();

        let recommendations = recommender.recommend(&[1], 2).unwrap();
        assert_eq!(ids(&recommendations), vec![4, 3]);
    }

    #[test]
    fn test_exclude_selected_with_huge_k() {
        let recommender = Recommender::build(
            vec![
                Movie::new(1, "A", ["Comedy"]),
                Movie::new(2, "B", ["Drama"]),
                Movie::new(3, "C", ["Comedy", "Drama"]),
            ],
            RecommenderConfig::default().with_exclude_selected(true),
        )
        .unwrap();

        let recommendations = recommender.recommend(&[1, 2], usize::MAX).unwrap();
        assert_eq!(ids(&recommendations), vec![3]);
    }

    #[test]
    fn test_all_zero_selection_is_degenerate() {
        let items = vec![
            Movie::new(1, "A", ["Comedy"]),
            Movie {
                id: 2,
                title: "Blank".to_string(),
                year: None,
                genres: BTreeSet::new(),
            },
        ];
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 0.0]];
        let index = Arc::new(CatalogIndex::from_parts(items, vectors, 2).unwrap());
        let vocabulary = GenreVocabulary::from_labels(["Comedy", "Drama"]);
        let config = RecommenderConfig::default();
        let recommender = Recommender {
            vocabulary,
            search: NeighborSearch::build(Arc::clone(&index), config.metric),
            index,
            config,
        };

        assert_eq!(
            recommender.query_vector(&[2]).unwrap_err(),
            RecommendError::DegenerateQuery
        );
        assert_eq!(
            recommender.recommend(&[2], 1).unwrap_err(),
            RecommendError::DegenerateQuery
        );
        assert!(recommender.query_vector(&[1, 2]).is_ok());
    }

    #[test]
    fn test_recommend_default_uses_configured_k() {
        let movies: Vec<Movie> = (1..=30)
            .map(|id| Movie::new(id, format!("Movie {id}"), ["Comedy"]))
            .collect();
        let recommender = Recommender::build(movies, RecommenderConfig::default()).unwrap();

        assert_eq!(recommender.recommend_default(&[5]).unwrap().len(), 10);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let err = Recommender::build(
            vec![Movie::new(1, "A", ["Comedy"])],
            RecommenderConfig::default().with_k(0),
        )
        .unwrap_err();
        assert_eq!(err, RecommendError::InvalidK { k: 0 });
    }

    #[test]
    fn test_euclidean_metric() {
        let recommender = Recommender::build(
            vec![
                Movie::new(1, "A", ["Comedy"]),
                Movie::new(2, "B", ["Drama"]),
                Movie::new(3, "C", ["Comedy", "Drama"]),
            ],
            RecommenderConfig::default().with_metric(Metric::Euclidean),
        )
        .unwrap();

        // query [1,0]: A at 0, C at 1, B at sqrt(2)
        let recommendations = recommender.recommend(&[1], 3).unwrap();
        assert_eq!(ids(&recommendations), vec![1, 3, 2]);
    }
}

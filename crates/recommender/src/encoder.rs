//! Genre encoder.
//!
//! Turns each movie's genre labels into a fixed-width multi-hot vector over
//! the set of every label seen in the catalog.
//!
//! ## Algorithm
//! 1. Union all labels across the catalog; sort them lexicographically.
//!    The sorted list is the vocabulary and its length is the dimension D.
//! 2. For every movie, component `j` is 1.0 if the movie carries
//!    vocabulary label `j`, else 0.0.
//!
//! Sorting makes the vocabulary independent of row order, so the same
//! catalog always yields the same component meaning.

use crate::error::{RecommendError, Result};
use crate::index::{CatalogIndex, FeatureVector};
use data_loader::Movie;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};

/// Ordered set of every distinct genre label in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreVocabulary {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl GenreVocabulary {
    /// Collect the vocabulary from a catalog
    pub fn from_movies(movies: &[Movie]) -> Self {
        let labels: BTreeSet<&str> = movies
            .iter()
            .flat_map(|movie| movie.genres.iter().map(String::as_str))
            .collect();
        Self::from_labels(labels)
    }

    /// Build a vocabulary from arbitrary labels; order and duplicates in the input don't matter
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let positions = labels
            .iter()
            .enumerate()
            .map(|(position, label)| (label.clone(), position))
            .collect();
        Self { labels, positions }
    }

    /// Number of labels (the vector dimension D)
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in component order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Component index of a label
    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Multi-hot encoding of a label set. Unknown labels are ignored.
    pub fn encode(&self, genres: &BTreeSet<String>) -> FeatureVector {
        let mut vector = vec![0.0; self.labels.len()];
        for label in genres {
            if let Some(position) = self.position(label) {
                vector[position] = 1.0;
            }
        }
        vector
    }

    /// Non-zero components of a vector as (label, weight), strongest first
    ///
    /// Used to explain a query vector to the user.
    pub fn describe(&self, vector: &[f32]) -> Vec<(&str, f32)> {
        let mut weights: Vec<(&str, f32)> = self
            .labels
            .iter()
            .zip(vector)
            .filter(|(_, weight)| **weight != 0.0)
            .map(|(label, weight)| (label.as_str(), *weight))
            .collect();
        // Stable: equal weights keep vocabulary order
        weights.sort_by(|a, b| b.1.total_cmp(&a.1));
        weights
    }
}

/// Encode a catalog into its vocabulary and feature index
///
/// Every movie must carry at least one genre; the loader drops genre-less
/// rows before this point, and a violation here is reported as
/// [`RecommendError::MissingGenres`].
#[instrument(skip(movies), fields(items = movies.len()))]
pub fn encode(movies: Vec<Movie>) -> Result<(GenreVocabulary, CatalogIndex)> {
    if let Some(movie) = movies.iter().find(|movie| movie.genres.is_empty()) {
        return Err(RecommendError::MissingGenres { id: movie.id });
    }

    let vocabulary = GenreVocabulary::from_movies(&movies);

    // Rows are independent, so encode them in parallel; collect keeps row order
    let vectors: Vec<FeatureVector> = movies
        .par_iter()
        .map(|movie| vocabulary.encode(&movie.genres))
        .collect();

    let index = CatalogIndex::from_parts(movies, vectors, vocabulary.len())?;

    info!(
        "Encoded {} movies over {} genres",
        index.len(),
        vocabulary.len()
    );
    Ok((vocabulary, index))
}

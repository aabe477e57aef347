//! Error types for the recommender crate.
//!
//! All variants are recoverable: a caller such as an interactive menu is
//! expected to report the error and ask again. Nothing here is fatal and no
//! partial result is ever returned alongside an error.

use data_loader::MovieId;
use thiserror::Error;

/// Errors raised while building the index or answering a recommendation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// The selection contained no movies
    #[error("Selection is empty; select at least one movie first")]
    EmptySelection,

    /// A selected id does not exist in the catalog
    #[error("Unknown movie id: {id}")]
    UnknownItem { id: MovieId },

    /// The averaged selection vector sums to zero and cannot be normalized
    #[error("Query vector for the selection sums to zero")]
    DegenerateQuery,

    /// Requested neighbour count must be at least 1
    #[error("Invalid k: {k} (must be at least 1)")]
    InvalidK { k: usize },

    /// Cosine distance is undefined for an all-zero query
    #[error("Query vector is all zeros; cosine distance is undefined")]
    ZeroQuery,

    /// Query vector contains NaN or infinite components
    #[error("Query vector has non-finite components")]
    NonFiniteQuery,

    /// Query vector width differs from the genre vocabulary size
    #[error("Query has {found} components but the index has {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A catalog item reached the encoder without any genre label
    #[error("Movie {id} has no genres and cannot be encoded")]
    MissingGenres { id: MovieId },

    /// Two catalog items share an id
    #[error("Duplicate movie id {id} in catalog")]
    DuplicateItem { id: MovieId },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;

//! # Recommender Crate
//!
//! Genre-based nearest-neighbour movie recommendations.
//!
//! ## Components
//!
//! ### Genre Encoder
//! Builds the sorted genre vocabulary and a multi-hot vector per movie.
//!
//! ### Catalog Index
//! Movies and their vectors, row-aligned, with id lookups.
//!
//! ### Neighbor Search
//! Exact k-nearest-neighbour scan under cosine (default) or euclidean distance.
//!
//! ### Recommender
//! Averages the vectors of the user's selected movies into one normalized
//! query and returns the closest catalog movies.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::load_catalog;
//! use recommender::{Recommender, RecommenderConfig};
//! use std::path::Path;
//!
//! let movies = load_catalog(Path::new("data/movies.csv"))?;
//! let recommender = Recommender::build(movies, RecommenderConfig::default())?;
//!
//! for rec in recommender.recommend(&[1, 3114], 10)? {
//!     println!("{} ({:.3})", rec.title, rec.distance);
//! }
//! ```
//!
//! Everything is built up front and read-only afterwards; a `Recommender`
//! can be shared between threads without locking.

pub mod config;
pub mod encoder;
pub mod error;
pub mod index;
pub mod recommend;
pub mod search;

// Re-export commonly used types
pub use config::{DEFAULT_K, RecommenderConfig};
pub use encoder::{GenreVocabulary, encode};
pub use error::{RecommendError, Result};
pub use index::{CatalogIndex, FeatureVector};
pub use recommend::{Recommendation, Recommender};
pub use search::{Metric, Neighbor, NeighborSearch};

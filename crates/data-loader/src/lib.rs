//! # Data Loader Crate
//!
//! This crate loads a MovieLens-style movie catalog (`movies.csv`) into memory
//! and provides the simple lookups the interactive layer needs.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, MovieId)
//! - **parser**: Parse the catalog CSV and normalize genre labels
//! - **catalog**: Load + validate entry point
//! - **search**: Title/year search and random browse suggestions
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{load_catalog, search_movies, SearchQuery};
//! use std::path::Path;
//!
//! let movies = load_catalog(Path::new("data/movies.csv"))?;
//!
//! let query = SearchQuery::parse("toy story").unwrap();
//! for movie in search_movies(&movies, &query).iter().take(10) {
//!     println!("{}", movie);
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod catalog;
pub mod search;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{Movie, MovieId};
pub use catalog::load_catalog;
pub use search::{SearchQuery, sample_movies, search_movies};

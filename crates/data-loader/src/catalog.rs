//! Catalog loading entry point.
//!
//! Parses the catalog file, validates it, and hands back the movies in file
//! order. This is the only place the rest of the workspace touches the disk.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

/// Load and validate a movie catalog from a CSV file
///
/// Steps:
/// 1. Parse the file (rows without genres are dropped by the parser)
/// 2. Validate data integrity
#[instrument]
pub fn load_catalog(path: &Path) -> Result<Vec<Movie>> {
    info!("Loading movie catalog from {:?}", path);

    let movies = parser::parse_movies(path)?;
    validate(&movies)?;

    let genres: HashSet<&str> = movies
        .iter()
        .flat_map(|m| m.genres.iter().map(String::as_str))
        .collect();
    info!(
        "Loaded {} movies with {} distinct genres",
        movies.len(),
        genres.len()
    );

    Ok(movies)
}

/// Validate data integrity
///
/// Check that:
/// - movie ids are unique
/// - every movie carries at least one genre
/// - the catalog is not empty
pub fn validate(movies: &[Movie]) -> Result<()> {
    if movies.is_empty() {
        return Err(DataLoadError::ValidationError(
            "catalog contains no movies with genres".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(movies.len());
    for movie in movies {
        if !seen.insert(movie.id) {
            return Err(DataLoadError::DuplicateId { id: movie.id });
        }
        if movie.genres.is_empty() {
            return Err(DataLoadError::ValidationError(format!(
                "movie {} has no genres",
                movie.id
            )));
        }
    }
    Ok(())
}

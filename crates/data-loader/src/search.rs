//! Catalog lookups used by the interactive layer: title/year search and
//! random browse suggestions.

use crate::types::Movie;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;

/// What the user asked to search for.
///
/// The decision between year and title is made once, when the raw input is
/// parsed, so the search itself never has to guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Titles containing "(year)"
    ByYear(u32),
    /// Case-insensitive substring of the title
    ByTitle(String),
}

impl SearchQuery {
    /// Interpret raw user input
    ///
    /// All-digit input is a year; anything else is a title fragment.
    /// Returns `None` for blank input.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if input.bytes().all(|b| b.is_ascii_digit())
            && let Ok(year) = input.parse()
        {
            return Some(SearchQuery::ByYear(year));
        }
        Some(SearchQuery::ByTitle(input.to_lowercase()))
    }

    /// Does this movie match the query?
    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            SearchQuery::ByYear(year) => movie.title.contains(&format!("({})", year)),
            SearchQuery::ByTitle(term) => {
                let term = term.trim().to_lowercase();
                movie.title.to_lowercase().contains(&term)
            }
        }
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchQuery::ByYear(year) => write!(f, "year {}", year),
            SearchQuery::ByTitle(term) => write!(f, "title '{}'", term),
        }
    }
}

/// All movies matching the query, in catalog order
pub fn search_movies<'a>(movies: &'a [Movie], query: &SearchQuery) -> Vec<&'a Movie> {
    movies.iter().filter(|movie| query.matches(movie)).collect()
}

/// Pick `count` distinct movies at random (fewer if the catalog is smaller)
pub fn sample_movies<'a, R>(movies: &'a [Movie], count: usize, rng: &mut R) -> Vec<&'a Movie>
where
    R: Rng + ?Sized,
{
    movies.choose_multiple(rng, count).collect()
}

//! Core domain types for the movie catalog.
//!
//! A catalog is an ordered list of [`Movie`] records. Order matters: it is
//! the order rows appeared in the source file, and downstream components use
//! it to break ties deterministically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (the `movieId` column)
pub type MovieId = u32;

// =============================================================================
// Movie
// =============================================================================

/// A single catalog entry.
///
/// Created once at load time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    /// Title as it appears in the catalog, usually with the year, e.g. "Toy Story (1995)"
    pub title: String,
    /// Year extracted from a trailing "(YYYY)" in the title
    pub year: Option<u16>,
    /// Normalized genre labels; never empty for a loaded movie
    ///
    /// `BTreeSet` keeps labels sorted and unique, so two movies with the
    /// same genres always compare equal here regardless of source order.
    pub genres: BTreeSet<String>,
}

impl Movie {
    /// Build a movie from an id, a title and any iterable of genre labels.
    ///
    /// The year is derived from the title the same way the parser does it.
    pub fn new<I, S>(id: MovieId, title: impl Into<String>, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let title = title.into();
        Self {
            id,
            year: crate::parser::extract_year_from_title(&title),
            title,
            genres: genres.into_iter().map(Into::into).collect(),
        }
    }

    /// Genres joined back into the pipe-delimited catalog form
    pub fn genres_label(&self) -> String {
        self.genres
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.id, self.title, self.genres_label())
    }
}

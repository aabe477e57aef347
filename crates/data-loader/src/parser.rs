//! Parser for MovieLens-style catalog files.
//!
//! - movies.csv: movieId,title,genres
//!
//! Titles are quoted when they contain commas ("American President, The (1995)"),
//! so the file is read with the `csv` crate rather than split by hand.
//! Genres are pipe-separated: "Adventure|Animation|Children".

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Placeholder MovieLens uses for movies without any genre
pub const NO_GENRES_SENTINEL: &str = "(no genres listed)";

const MOVIES_FILE: &str = "movies.csv";

/// Parse the movies.csv file
///
/// Rows without usable genres are skipped; see [`parse_movies_from_reader`].
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    parse_movies_from_reader(file)
}

/// Parse catalog rows from any reader
///
/// Format: movieId,title,genres (with a header row)
///
/// A row whose genre field is missing, empty, or only the
/// `(no genres listed)` placeholder is dropped, not rejected.
pub fn parse_movies_from_reader<R: Read>(reader: R) -> Result<Vec<Movie>> {
    let (movies, skipped) = parse_rows(reader)?;
    info!(
        "Parsed {} movies, dropped {} rows without genres",
        movies.len(),
        skipped
    );
    Ok(movies)
}

/// Parse catalog rows, returning the movies and the number of dropped rows
fn parse_rows<R: Read>(reader: R) -> Result<(Vec<Movie>, usize)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut movies = Vec::new();
    let mut skipped = 0usize;

    for record in csv_reader.records() {
        let record = record?;
        let line_no = record.position().map(|p| p.line()).unwrap_or(0);

        // Skip blank lines
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let movie_id = record.get(0).ok_or_else(|| DataLoadError::ParseError {
            file: MOVIES_FILE.to_string(),
            line: line_no,
            reason: "Missing movieId".to_string(),
        })?;

        if record.len() < 2 {
            return Err(DataLoadError::ParseError {
                file: MOVIES_FILE.to_string(),
                line: line_no,
                reason: "Missing title".to_string(),
            });
        }

        // An unquoted title containing commas spills into extra fields;
        // genres are always the last field
        let (title, genres_field) = if record.len() > 3 {
            let last = record.len() - 1;
            let title = (1..last)
                .filter_map(|i| record.get(i))
                .collect::<Vec<_>>()
                .join(",");
            (title, record.get(last).unwrap_or(""))
        } else {
            (record.get(1).unwrap_or("").to_string(), record.get(2).unwrap_or(""))
        };

        let genres = parse_genres(genres_field);
        if genres.is_empty() {
            debug!(line = line_no, movie_id, "skipping movie without genres");
            skipped += 1;
            continue;
        }

        let title = title.trim();
        if title.is_empty() {
            return Err(DataLoadError::ParseError {
                file: MOVIES_FILE.to_string(),
                line: line_no,
                reason: "Missing title".to_string(),
            });
        }
        let movie = Movie {
            id: movie_id.trim().parse().map_err(|e| DataLoadError::ParseError {
                file: MOVIES_FILE.to_string(),
                line: line_no,
                reason: format!("Invalid movieId '{}': {}", movie_id, e),
            })?,
            title: title.to_string(),
            year: extract_year_from_title(title),
            genres,
        };

        movies.push(movie);
    }

    Ok((movies, skipped))
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
pub(crate) fn extract_year_from_title(title: &str) -> Option<u16> {
    let title = title.trim_end();
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end && end == title.len() - 1 {
        let year_str = title[start + 1..end].trim();
        if year_str.len() == 4 {
            return year_str.parse::<u16>().ok();
        }
    }
    None
}

/// Parse pipe-separated genres into a normalized label set
///
/// Labels are trimmed, empty labels are dropped, and the
/// `(no genres listed)` placeholder counts as no genre at all.
///
/// Example: "Action|Adventure|Sci-Fi" -> {"Action", "Adventure", "Sci-Fi"}
pub fn parse_genres(s: &str) -> BTreeSet<String> {
    s.split('|')
        .map(str::trim)
        .filter(|label| !label.is_empty() && *label != NO_GENRES_SENTINEL)
        .map(str::to_string)
        .collect()
}

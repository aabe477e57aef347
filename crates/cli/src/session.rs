//! Interactive menu as an explicit state machine.
//!
//! The terminal loop in `main.rs` only reads lines and prints; every decision
//! about what an input means lives here so it can be tested without a TTY.
//!
//! ```text
//!            "1"                         id / blank
//! Browsing ──────► Confirming ──────────────────────► Browsing
//!    │ "2"              ▲
//!    ▼                  │ results
//! Searching ────────────┘
//!    │ "3" (from Browsing)
//!    ▼
//!   Done
//! ```
//!
//! Any rejected input reports a [`SessionError`] and lands back in `Browsing`.

use data_loader::{Movie, MovieId, SearchQuery, search_movies};
use recommender::{RecommendError, Recommendation, Recommender};
use thiserror::Error;

/// Search results shown per query
pub const MAX_SEARCH_RESULTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Main menu: select, search, or exit
    Browsing,
    /// Waiting for a title fragment or year
    Searching,
    /// Waiting for a movieId to add to the selection
    Confirming,
    Done,
}

/// What the terminal should show after a successful step
#[derive(Debug, PartialEq)]
pub enum Outcome<'a> {
    PromptMovieId,
    PromptSearch,
    SearchResults(Vec<&'a Movie>),
    Selected(&'a Movie),
    /// Blank input at the movieId prompt
    BackToMenu,
    Exit,
}

/// Rejected input; the session is back in `Browsing` when one of these is returned
#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("Invalid input '{0}'. Please enter 1, 2, or 3.")]
    InvalidChoice(String),

    #[error("Invalid movieId '{0}'. Please try again.")]
    InvalidMovieId(String),

    #[error("Please enter a movie title or year.")]
    EmptyQuery,

    #[error("No results found for {0}.")]
    NoResults(SearchQuery),

    #[error(transparent)]
    Recommend(#[from] RecommendError),
}

/// One user's menu session: current state plus the movies picked so far.
#[derive(Debug)]
pub struct Session {
    state: MenuState,
    selection: Vec<MovieId>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: MenuState::Browsing,
            selection: Vec::new(),
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Movie ids chosen so far, in the order they were picked
    pub fn selection(&self) -> &[MovieId] {
        &self.selection
    }

    /// Recommendations for the current selection, `None` before anything is selected
    pub fn recommendations(
        &self,
        recommender: &Recommender,
    ) -> Option<Result<Vec<Recommendation>, RecommendError>> {
        if self.selection.is_empty() {
            return None;
        }
        Some(recommender.recommend_default(&self.selection))
    }

    /// Feed one line of user input to the state machine
    pub fn step<'a>(
        &mut self,
        input: &str,
        recommender: &'a Recommender,
    ) -> Result<Outcome<'a>, SessionError> {
        let input = input.trim();

        match self.state {
            MenuState::Browsing => match input {
                "1" => {
                    self.state = MenuState::Confirming;
                    Ok(Outcome::PromptMovieId)
                }
                "2" => {
                    self.state = MenuState::Searching;
                    Ok(Outcome::PromptSearch)
                }
                "3" => {
                    self.state = MenuState::Done;
                    Ok(Outcome::Exit)
                }
                other => Err(SessionError::InvalidChoice(other.to_string())),
            },

            MenuState::Searching => {
                self.state = MenuState::Browsing;
                let query = SearchQuery::parse(input).ok_or(SessionError::EmptyQuery)?;
                let mut results = search_movies(recommender.index().items(), &query);
                if results.is_empty() {
                    return Err(SessionError::NoResults(query));
                }
                results.truncate(MAX_SEARCH_RESULTS);
                self.state = MenuState::Confirming;
                Ok(Outcome::SearchResults(results))
            }

            MenuState::Confirming => {
                self.state = MenuState::Browsing;
                if input.is_empty() {
                    return Ok(Outcome::BackToMenu);
                }
                let movie = input
                    .parse::<MovieId>()
                    .ok()
                    .and_then(|id| recommender.index().movie(id))
                    .ok_or_else(|| SessionError::InvalidMovieId(input.to_string()))?;
                self.selection.push(movie.id);
                Ok(Outcome::Selected(movie))
            }

            MenuState::Done => Ok(Outcome::Exit),
        }
    }
}

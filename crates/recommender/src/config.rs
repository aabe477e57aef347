//! Recommender configuration.

use crate::error::{RecommendError, Result};
use crate::search::Metric;
use serde::{Deserialize, Serialize};

/// Number of recommendations returned when the caller doesn't ask for a specific count
pub const DEFAULT_K: usize = 10;

/// Settings fixed when the recommender is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Default neighbour count for `recommend_default`
    pub k: usize,
    /// Distance used by the neighbour search
    pub metric: Metric,
    /// Drop already-selected movies from results (off: selected movies can come back)
    pub exclude_selected: bool,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            metric: Metric::Cosine,
            exclude_selected: false,
        }
    }
}

impl RecommenderConfig {
    /// Configure the default number of recommendations (default: 10)
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Configure the distance metric (default: cosine)
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Configure whether selected movies are filtered out of results (default: false)
    pub fn with_exclude_selected(mut self, exclude: bool) -> Self {
        self.exclude_selected = exclude;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(RecommendError::InvalidK { k: self.k });
        }
        Ok(())
    }
}

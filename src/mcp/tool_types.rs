//! Argument types for MCP tools.
//!
//! All argument types use `#[serde(deny_unknown_fields)]`; a misspelled
//! option is an error rather than a silently ignored default.

use crate::services::{
    CollectionStatsRequest, DeckStatsRequest, ReviewHistoryRequest,
};
use crate::stats::{Boundaries, DAYS_SUFFIX};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Number, Value};

/// Arguments for the `deck_stats` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DeckStatsArgs {
    /// Full deck name.
    pub deck: String,
    /// Ease bucket boundaries, ascending.
    pub ease_buckets: Option<Vec<Number>>,
    /// Interval bucket boundaries in days, ascending.
    pub interval_buckets: Option<Vec<Number>>,
}

impl DeckStatsArgs {
    /// Builds the service request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty deck name or bad boundaries.
    pub fn into_request(self) -> Result<DeckStatsRequest> {
        if self.deck.trim().is_empty() {
            return Err(Error::InvalidInput("deck must not be empty".to_string()));
        }
        let ease = ease_boundaries(self.ease_buckets.as_deref())?;
        let intervals = interval_boundaries(self.interval_buckets.as_deref())?;
        Ok(DeckStatsRequest::new(self.deck)
            .with_ease_boundaries(ease)
            .with_interval_boundaries(intervals))
    }
}

/// Arguments for the `collection_stats` tool.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CollectionStatsArgs {
    /// Ease bucket boundaries, ascending.
    pub ease_buckets: Option<Vec<Number>>,
    /// Interval bucket boundaries in days, ascending.
    pub interval_buckets: Option<Vec<Number>>,
}

impl CollectionStatsArgs {
    /// Builds the service request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for bad boundaries.
    pub fn into_request(self) -> Result<CollectionStatsRequest> {
        Ok(CollectionStatsRequest {
            ease_boundaries: ease_boundaries(self.ease_buckets.as_deref())?,
            interval_boundaries: interval_boundaries(self.interval_buckets.as_deref())?,
        })
    }
}

/// Arguments for the `review_history` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ReviewHistoryArgs {
    /// Full deck name.
    pub deck: String,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`; today when absent.
    pub end_date: Option<String>,
}

impl ReviewHistoryArgs {
    /// Builds the service request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for bad or out-of-order dates.
    pub fn into_request(self) -> Result<ReviewHistoryRequest> {
        if self.deck.trim().is_empty() {
            return Err(Error::InvalidInput("deck must not be empty".to_string()));
        }
        ReviewHistoryRequest::parse(self.deck, &self.start_date, self.end_date.as_deref())
    }
}

/// Arguments for tools that take none.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

/// Deserializes tool arguments; `null` counts as an empty object.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the arguments do not match `T`.
pub fn parse_args<T: for<'de> Deserialize<'de>>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))
}

fn ease_boundaries(numbers: Option<&[Number]>) -> Result<Boundaries> {
    numbers.map_or_else(|| Ok(Boundaries::default_ease()), Boundaries::from_numbers)
}

fn interval_boundaries(numbers: Option<&[Number]>) -> Result<Boundaries> {
    numbers.map_or_else(
        || Ok(Boundaries::default_interval()),
        |n| Boundaries::from_numbers(n).map(|b| b.with_unit(DAYS_SUFFIX)),
    )
}

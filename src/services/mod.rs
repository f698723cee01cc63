//! Statistics services.
//!
//! [`StatsService`] orchestrates the read-only AnkiConnect queries for each
//! use case, filters the raw values, and hands them to the engines in
//! [`crate::stats`]. Queries run strictly in sequence; each result decides
//! whether the next query is needed at all.
//!
//! | Use case | Queries |
//! |----------|---------|
//! | [`StatsService::deck_stats`] | `getDeckStats`, then `findCards`, `getEaseFactors`, `getIntervals` when the deck has cards |
//! | [`StatsService::collection_stats`] | `deckNames`, `getDeckStats`, then `findCards`, `getEaseFactors`, `getIntervals` when the collection has cards |
//! | [`StatsService::review_history`] | `cardReviews` |

mod collection_stats;
mod deck_stats;
mod review_history;
pub mod samples;

pub use collection_stats::{CollectionStats, CollectionStatsRequest, DeckBreakdown};
pub use deck_stats::{CardCounts, DeckStats, DeckStatsRequest};
pub use review_history::{
    Period, ReviewHistory, ReviewHistoryRequest, ReviewSummary, parse_date,
};

use crate::anki::{AnkiBackend, CardId, CardQuery};
use crate::stats::{Boundaries, DistributionResult, compute_distribution};
use crate::{Error, Result};
use samples::{ease_samples, review_interval_samples};

/// Read-side statistics over an Anki collection.
pub struct StatsService<B> {
    backend: B,
}

impl<B: AnkiBackend> StatsService<B> {
    /// Creates a service over a backend.
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Names of all decks, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if AnkiConnect is unavailable.
    pub fn list_decks(&self) -> Result<Vec<String>> {
        let mut names = self.backend.deck_names()?;
        names.sort();
        Ok(names)
    }

    /// AnkiConnect protocol version.
    ///
    /// # Errors
    ///
    /// Returns an error if AnkiConnect is unavailable.
    pub fn anki_version(&self) -> Result<u32> {
        self.backend.version()
    }

    /// Ease and interval distributions for the cards matching `query`.
    ///
    /// Falls back to empty distributions when the search finds no cards even
    /// though the counts said otherwise; the counts stay authoritative.
    fn card_distributions(
        &self,
        query: &CardQuery,
        ease_boundaries: &Boundaries,
        interval_boundaries: &Boundaries,
    ) -> Result<(DistributionResult, DistributionResult)> {
        let cards = self.backend.find_cards(query)?;
        if cards.is_empty() {
            tracing::warn!(
                query = %query.to_search(),
                "Card search returned no cards despite non-zero counts"
            );
            return Ok(empty_distributions(ease_boundaries, interval_boundaries));
        }

        let raw_ease = self.backend.ease_factors(&cards)?;
        ensure_parallel("getEaseFactors", &cards, &raw_ease)?;
        let raw_intervals = self.backend.intervals(&cards)?;
        ensure_parallel("getIntervals", &cards, &raw_intervals)?;

        let ease = ease_samples(&raw_ease);
        let intervals = review_interval_samples(&raw_intervals);
        tracing::debug!(
            cards = cards.len(),
            ease_samples = ease.len(),
            interval_samples = intervals.len(),
            "Computed card samples"
        );

        Ok((
            compute_distribution(&ease, ease_boundaries),
            compute_distribution(&intervals, interval_boundaries),
        ))
    }
}

fn empty_distributions(
    ease_boundaries: &Boundaries,
    interval_boundaries: &Boundaries,
) -> (DistributionResult, DistributionResult) {
    (
        DistributionResult::empty(ease_boundaries),
        DistributionResult::empty(interval_boundaries),
    )
}

fn ensure_parallel(operation: &str, cards: &[CardId], values: &[i64]) -> Result<()> {
    if cards.len() == values.len() {
        return Ok(());
    }
    Err(Error::MalformedResponse {
        operation: operation.to_string(),
        cause: format!(
            "expected {} values for {} cards, got {}",
            cards.len(),
            cards.len(),
            values.len()
        ),
    })
}

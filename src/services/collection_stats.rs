//! Collection-wide statistics.

use super::{CardCounts, StatsService, empty_distributions};
use crate::Result;
use crate::anki::{AnkiBackend, CardQuery};
use crate::stats::{Boundaries, DistributionResult};
use serde::Serialize;
use tracing::instrument;

/// Parameters for [`StatsService::collection_stats`].
#[derive(Debug, Clone)]
pub struct CollectionStatsRequest {
    /// Ease histogram boundaries.
    pub ease_boundaries: Boundaries,
    /// Interval histogram boundaries (days).
    pub interval_boundaries: Boundaries,
}

impl Default for CollectionStatsRequest {
    fn default() -> Self {
        Self {
            ease_boundaries: Boundaries::default_ease(),
            interval_boundaries: Boundaries::default_interval(),
        }
    }
}

/// Counts for one deck in the collection breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckBreakdown {
    /// Deck name.
    pub deck: String,
    /// All cards.
    pub total: u64,
    /// New cards.
    pub new: u64,
    /// Learning cards.
    pub learning: u64,
    /// Review cards.
    pub review: u64,
}

/// Statistics across every deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    /// Number of decks in the breakdown.
    pub total_decks: usize,
    /// Sum of every deck's counts.
    pub counts: CardCounts,
    /// Ease distribution over all cards.
    pub ease: DistributionResult,
    /// Review interval distribution over all cards.
    pub intervals: DistributionResult,
    /// Per-deck counts, sorted by deck name.
    pub decks: Vec<DeckBreakdown>,
}

impl<B: AnkiBackend> StatsService<B> {
    /// Aggregate counts and distributions for the whole collection.
    ///
    /// Issues one counts query for every deck and one card search over the
    /// whole collection rather than per-deck queries.
    ///
    /// # Errors
    ///
    /// Returns the AnkiConnect error if any query fails.
    #[instrument(skip(self, request), fields(operation = "collection_stats"))]
    pub fn collection_stats(&self, request: &CollectionStatsRequest) -> Result<CollectionStats> {
        let names = self.backend.deck_names()?;
        if names.is_empty() {
            tracing::debug!("Collection has no decks");
            let (ease, intervals) =
                empty_distributions(&request.ease_boundaries, &request.interval_boundaries);
            return Ok(CollectionStats {
                total_decks: 0,
                counts: CardCounts::default(),
                ease,
                intervals,
                decks: Vec::new(),
            });
        }

        let deck_counts = self.backend.deck_counts(&names)?;
        let mut counts = CardCounts::default();
        let mut decks: Vec<DeckBreakdown> = deck_counts
            .iter()
            .map(|entry| {
                counts += CardCounts::from(entry);
                DeckBreakdown {
                    deck: entry.name.clone(),
                    total: entry.total,
                    new: entry.new,
                    learning: entry.learning,
                    review: entry.review,
                }
            })
            .collect();
        decks.sort_by(|a, b| a.deck.cmp(&b.deck));

        let (ease, intervals) = if counts.total == 0 {
            tracing::debug!(decks = decks.len(), "Collection has no cards; skipping card queries");
            empty_distributions(&request.ease_boundaries, &request.interval_boundaries)
        } else {
            self.card_distributions(
                &CardQuery::Collection,
                &request.ease_boundaries,
                &request.interval_boundaries,
            )?
        };

        Ok(CollectionStats {
            total_decks: decks.len(),
            counts,
            ease,
            intervals,
            decks,
        })
    }
}

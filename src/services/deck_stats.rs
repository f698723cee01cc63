//! Single-deck statistics.

use super::{StatsService, empty_distributions};
use crate::anki::{AnkiBackend, CardQuery, DeckCounts, find_deck};
use crate::stats::{Boundaries, DistributionResult};
use crate::{Error, Result};
use serde::Serialize;
use std::ops::AddAssign;
use tracing::instrument;

/// Parameters for [`StatsService::deck_stats`].
#[derive(Debug, Clone)]
pub struct DeckStatsRequest {
    /// Full deck name.
    pub deck: String,
    /// Ease histogram boundaries.
    pub ease_boundaries: Boundaries,
    /// Interval histogram boundaries (days).
    pub interval_boundaries: Boundaries,
}

impl DeckStatsRequest {
    /// Request with default boundaries.
    #[must_use]
    pub fn new(deck: impl Into<String>) -> Self {
        Self {
            deck: deck.into(),
            ease_boundaries: Boundaries::default_ease(),
            interval_boundaries: Boundaries::default_interval(),
        }
    }

    /// Overrides the ease boundaries.
    #[must_use]
    pub fn with_ease_boundaries(mut self, boundaries: Boundaries) -> Self {
        self.ease_boundaries = boundaries;
        self
    }

    /// Overrides the interval boundaries.
    #[must_use]
    pub fn with_interval_boundaries(mut self, boundaries: Boundaries) -> Self {
        self.interval_boundaries = boundaries;
        self
    }
}

/// Card counts by queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CardCounts {
    /// All cards.
    pub total: u64,
    /// New cards.
    pub new: u64,
    /// Learning cards.
    pub learning: u64,
    /// Review cards.
    pub review: u64,
}

impl From<&DeckCounts> for CardCounts {
    fn from(counts: &DeckCounts) -> Self {
        Self {
            total: counts.total,
            new: counts.new,
            learning: counts.learning,
            review: counts.review,
        }
    }
}

impl AddAssign for CardCounts {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.new += other.new;
        self.learning += other.learning;
        self.review += other.review;
    }
}

/// Statistics for one deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckStats {
    /// Deck name.
    pub deck: String,
    /// Card counts.
    pub counts: CardCounts,
    /// Ease multiplier distribution.
    pub ease: DistributionResult,
    /// Review interval distribution (days).
    pub intervals: DistributionResult,
}

impl<B: AnkiBackend> StatsService<B> {
    /// Counts plus ease and interval distributions for one deck.
    ///
    /// An empty deck is answered from the counts query alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the deck does not exist, or the
    /// AnkiConnect error if any query fails.
    #[instrument(skip(self, request), fields(operation = "deck_stats", deck = %request.deck))]
    pub fn deck_stats(&self, request: &DeckStatsRequest) -> Result<DeckStats> {
        let all_counts = self.backend.deck_counts(std::slice::from_ref(&request.deck))?;
        let counts = find_deck(&all_counts, &request.deck)
            .map(CardCounts::from)
            .ok_or_else(|| Error::NotFound {
                kind: "deck",
                identifier: request.deck.clone(),
            })?;

        let (ease, intervals) = if counts.total == 0 {
            tracing::debug!("Deck is empty; skipping card queries");
            empty_distributions(&request.ease_boundaries, &request.interval_boundaries)
        } else {
            self.card_distributions(
                &CardQuery::Deck(request.deck.clone()),
                &request.ease_boundaries,
                &request.interval_boundaries,
            )?
        };

        Ok(DeckStats {
            deck: request.deck.clone(),
            counts,
            ease,
            intervals,
        })
    }
}

//! AnkiConnect access.
//!
//! The statistics pipeline only reads from Anki, through the small set of
//! queries on [`AnkiBackend`]. [`AnkiConnectClient`] implements them over
//! HTTP; tests substitute an in-memory backend.

mod client;
pub mod types;

pub use client::{AnkiConnectClient, build_http_client, decode_envelope, decode_result};
pub use types::{CardId, CardQuery, DeckCounts, ReviewEvent, find_deck};

use crate::Result;

/// Read-only queries against an Anki collection.
pub trait AnkiBackend: Send + Sync {
    /// AnkiConnect protocol version (health probe).
    ///
    /// # Errors
    ///
    /// Returns an error if AnkiConnect is unreachable.
    fn version(&self) -> Result<u32>;

    /// Names of every deck in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the result is malformed.
    fn deck_names(&self) -> Result<Vec<String>>;

    /// Coarse counts for the named decks.
    ///
    /// Decks that do not exist are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the result is malformed.
    fn deck_counts(&self, decks: &[String]) -> Result<Vec<DeckCounts>>;

    /// Card ids matching a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the result is malformed.
    fn find_cards(&self, query: &CardQuery) -> Result<Vec<CardId>>;

    /// Raw ease factors (per mille, 0 = unset), parallel to `cards`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the result is malformed.
    fn ease_factors(&self, cards: &[CardId]) -> Result<Vec<i64>>;

    /// Raw intervals, parallel to `cards`.
    ///
    /// Negative values are learning-phase intervals in seconds, positive
    /// values are review intervals in days.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the result is malformed.
    fn intervals(&self, cards: &[CardId]) -> Result<Vec<i64>>;

    /// Review log entries for a deck with `timestamp >= start_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the result is malformed.
    fn card_reviews(&self, deck: &str, start_ms: i64) -> Result<Vec<ReviewEvent>>;
}

impl<T: AnkiBackend + ?Sized> AnkiBackend for &T {
    fn version(&self) -> Result<u32> {
        (**self).version()
    }

    fn deck_names(&self) -> Result<Vec<String>> {
        (**self).deck_names()
    }

    fn deck_counts(&self, decks: &[String]) -> Result<Vec<DeckCounts>> {
        (**self).deck_counts(decks)
    }

    fn find_cards(&self, query: &CardQuery) -> Result<Vec<CardId>> {
        (**self).find_cards(query)
    }

    fn ease_factors(&self, cards: &[CardId]) -> Result<Vec<i64>> {
        (**self).ease_factors(cards)
    }

    fn intervals(&self, cards: &[CardId]) -> Result<Vec<i64>> {
        (**self).intervals(cards)
    }

    fn card_reviews(&self, deck: &str, start_ms: i64) -> Result<Vec<ReviewEvent>> {
        (**self).card_reviews(deck, start_ms)
    }
}

//! In-memory Anki backend shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use ankistat::anki::{AnkiBackend, CardId, CardQuery, DeckCounts, ReviewEvent};
use ankistat::{Error, Result};
use chrono::NaiveDate;
use std::sync::Mutex;

/// Scripted backend that records every action it serves.
#[derive(Default)]
pub struct FakeAnki {
    decks: Vec<DeckCounts>,
    cards: Vec<CardId>,
    ease: Option<Vec<i64>>,
    intervals: Option<Vec<i64>>,
    reviews: Vec<ReviewEvent>,
    offline: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeAnki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a deck with `(new, learning, review)` counts; total is their sum.
    pub fn with_deck(mut self, name: &str, new: u64, learning: u64, review: u64) -> Self {
        self.decks.push(DeckCounts {
            name: name.to_string(),
            new,
            learning,
            review,
            total: new + learning + review,
        });
        self
    }

    /// Cards returned by every search, with their raw ease and interval.
    pub fn with_cards(mut self, ease: &[i64], intervals: &[i64]) -> Self {
        let count = ease.len().max(intervals.len());
        self.cards = (1..=count as i64).map(|i| 1_000 + i).collect();
        self.ease = Some(ease.to_vec());
        self.intervals = Some(intervals.to_vec());
        self
    }

    /// Overrides the card ids without touching ease or intervals.
    pub fn with_card_ids(mut self, cards: &[CardId]) -> Self {
        self.cards = cards.to_vec();
        self
    }

    pub fn with_review(mut self, timestamp_ms: i64, button: i64) -> Self {
        self.reviews.push(ReviewEvent {
            timestamp_ms,
            card_id: 1,
            button,
        });
        self
    }

    /// Every call fails as if Anki were closed.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Actions served so far, e.g. `["getDeckStats", "findCards deck:\"A\""]`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn action_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    fn record(&self, call: impl Into<String>) -> Result<()> {
        let call = call.into();
        let action = call.split(' ').next().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(call);
        if self.offline {
            return Err(Error::UpstreamUnavailable {
                operation: action,
                cause: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

impl AnkiBackend for FakeAnki {
    fn version(&self) -> Result<u32> {
        self.record("version")?;
        Ok(6)
    }

    fn deck_names(&self) -> Result<Vec<String>> {
        self.record("deckNames")?;
        Ok(self.decks.iter().map(|d| d.name.clone()).collect())
    }

    fn deck_counts(&self, decks: &[String]) -> Result<Vec<DeckCounts>> {
        self.record("getDeckStats")?;
        Ok(self
            .decks
            .iter()
            .filter(|d| decks.contains(&d.name))
            .cloned()
            .collect())
    }

    fn find_cards(&self, query: &CardQuery) -> Result<Vec<CardId>> {
        self.record(format!("findCards {}", query.to_search()))?;
        Ok(self.cards.clone())
    }

    fn ease_factors(&self, cards: &[CardId]) -> Result<Vec<i64>> {
        self.record("getEaseFactors")?;
        Ok(self.ease.clone().unwrap_or_else(|| vec![0; cards.len()]))
    }

    fn intervals(&self, cards: &[CardId]) -> Result<Vec<i64>> {
        self.record("getIntervals")?;
        Ok(self.intervals.clone().unwrap_or_else(|| vec![0; cards.len()]))
    }

    fn card_reviews(&self, deck: &str, start_ms: i64) -> Result<Vec<ReviewEvent>> {
        self.record(format!("cardReviews {deck} {start_ms}"))?;
        Ok(self
            .reviews
            .iter()
            .filter(|r| r.timestamp_ms >= start_ms)
            .copied()
            .collect())
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Epoch milliseconds at `hour:00` UTC on the given day.
pub fn at(y: i32, m: u32, d: u32, hour: u32) -> i64 {
    day(y, m, d)
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

//! Typed AnkiConnect request and response shapes.
//!
//! AnkiConnect answers loosely typed JSON (deck stats keyed by synthetic deck
//! ids, review logs as bare integer tuples). Everything is decoded into the
//! structs below at the client boundary so nothing downstream sees raw maps.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// AnkiConnect protocol version spoken by the client.
pub const API_VERSION: u32 = 6;

/// Card identifier as assigned by Anki.
pub type CardId = i64;

/// Request envelope sent to AnkiConnect.
#[derive(Debug, Serialize)]
pub struct ApiRequest<'a, P: Serialize> {
    /// Action name, e.g. `getDeckStats`.
    pub action: &'a str,
    /// Protocol version.
    pub version: u32,
    /// Action parameters.
    pub params: P,
    /// Optional API key when AnkiConnect is configured to require one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'a str>,
}

/// Response envelope returned by AnkiConnect.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    /// Action result; `null` on failure.
    #[serde(default)]
    pub result: Value,
    /// Error message; `null` on success.
    #[serde(default)]
    pub error: Option<String>,
}

/// Coarse card counts for one deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckCounts {
    /// Full deck name (`Parent::Child`).
    pub name: String,
    /// Cards never studied.
    pub new: u64,
    /// Cards in (re)learning.
    pub learning: u64,
    /// Cards due for review.
    pub review: u64,
    /// All cards in the deck.
    pub total: u64,
}

/// Raw `getDeckStats` entry as AnkiConnect spells it.
#[derive(Debug, Deserialize)]
struct RawDeckStats {
    name: String,
    new_count: u64,
    learn_count: u64,
    review_count: u64,
    total_in_deck: u64,
}

impl From<RawDeckStats> for DeckCounts {
    fn from(raw: RawDeckStats) -> Self {
        Self {
            name: raw.name,
            new: raw.new_count,
            learning: raw.learn_count,
            review: raw.review_count,
            total: raw.total_in_deck,
        }
    }
}

/// Decodes a `getDeckStats` result (map of deck id to stats).
///
/// Entries are returned sorted by deck name so results are deterministic
/// regardless of the map's key order.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the result is not an object of
/// deck stats entries.
pub fn decode_deck_stats(result: Value) -> Result<Vec<DeckCounts>> {
    let raw: HashMap<String, RawDeckStats> =
        serde_json::from_value(result).map_err(|e| Error::MalformedResponse {
            operation: "getDeckStats".to_string(),
            cause: e.to_string(),
        })?;
    let mut counts: Vec<DeckCounts> = raw.into_values().map(DeckCounts::from).collect();
    counts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(counts)
}

/// Finds the counts entry for a deck by name.
#[must_use]
pub fn find_deck<'a>(counts: &'a [DeckCounts], name: &str) -> Option<&'a DeckCounts> {
    counts.iter().find(|c| c.name == name)
}

/// Search expression for `findCards`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardQuery {
    /// Every card in one deck (and its subdecks).
    Deck(String),
    /// Every card in the collection.
    Collection,
}

impl CardQuery {
    /// Renders the Anki search syntax.
    #[must_use]
    pub fn to_search(&self) -> String {
        match self {
            Self::Deck(name) => format!("deck:\"{}\"", escape_search(name)),
            Self::Collection => "deck:*".to_string(),
        }
    }
}

/// Escapes the characters Anki's search treats specially so a deck name
/// matches literally. `_` and `*` are wildcards and `\` is the escape.
fn escape_search(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '\\' | '"' | '*' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One entry of the `cardReviews` log.
///
/// AnkiConnect returns each review as a positional tuple:
/// `[reviewTime, cardID, usn, buttonPressed, newInterval, previousInterval,
/// newFactor, reviewDuration, reviewType]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewEvent {
    /// Review time in epoch milliseconds (also the review id).
    pub timestamp_ms: i64,
    /// Reviewed card.
    pub card_id: CardId,
    /// Raw answer button code (1..=4 for valid reviews).
    pub button: i64,
}

impl ReviewEvent {
    const TIMESTAMP: usize = 0;
    const CARD_ID: usize = 1;
    const BUTTON: usize = 3;

    /// Decodes one positional tuple.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the tuple is too short.
    pub fn from_tuple(tuple: &[i64]) -> Result<Self> {
        if tuple.len() <= Self::BUTTON {
            return Err(Error::MalformedResponse {
                operation: "cardReviews".to_string(),
                cause: format!(
                    "review tuple has {} fields, expected at least {}",
                    tuple.len(),
                    Self::BUTTON + 1
                ),
            });
        }
        Ok(Self {
            timestamp_ms: tuple[Self::TIMESTAMP],
            card_id: tuple[Self::CARD_ID],
            button: tuple[Self::BUTTON],
        })
    }
}

/// Decodes a `cardReviews` result.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the result is not an array of
/// integer tuples.
pub fn decode_reviews(result: Value) -> Result<Vec<ReviewEvent>> {
    let tuples: Vec<Vec<i64>> =
        serde_json::from_value(result).map_err(|e| Error::MalformedResponse {
            operation: "cardReviews".to_string(),
            cause: e.to_string(),
        })?;
    tuples.iter().map(|t| ReviewEvent::from_tuple(t)).collect()
}

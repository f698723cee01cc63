//! Review history over a date window.
//!
//! Calendar days are UTC. The upstream log query only bounds the start, so
//! the end bound is applied here: anything after midnight following
//! `end` is dropped, which makes `end` inclusive.

use super::StatsService;
use crate::anki::{AnkiBackend, ReviewEvent};
use crate::stats::{
    DailyCount, Rating, RetentionResult, calculate_streak, retention_from_ratings,
};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming the field on bad input.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        Error::InvalidInput(format!("{field} must be a YYYY-MM-DD date, got '{value}': {e}"))
    })
}

/// Parameters for [`StatsService::review_history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewHistoryRequest {
    /// Deck name.
    pub deck: String,
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive); today when unset.
    pub end: Option<NaiveDate>,
}

impl ReviewHistoryRequest {
    /// Creates a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `end` is before `start`.
    pub fn new(deck: impl Into<String>, start: NaiveDate, end: Option<NaiveDate>) -> Result<Self> {
        if let Some(end) = end {
            check_order(start, end)?;
        }
        Ok(Self {
            deck: deck.into(),
            start,
            end,
        })
    }

    /// Creates a request from date strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unparsable or out-of-order dates.
    pub fn parse(deck: impl Into<String>, start: &str, end: Option<&str>) -> Result<Self> {
        let start = parse_date("start_date", start)?;
        let end = end.map(|e| parse_date("end_date", e)).transpose()?;
        Self::new(deck, start, end)
    }
}

fn check_order(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(Error::InvalidInput(format!(
            "end_date {end} is before start_date {start}"
        )));
    }
    Ok(())
}

/// Inclusive date window of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

/// Headline numbers for a review window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    /// Reviews in the window.
    pub total_reviews: usize,
    /// Reviews per day that had any reviews.
    pub average_per_day: f64,
    /// Days with at least one review.
    pub days_studied: usize,
    /// Busiest day; earliest wins ties.
    pub best_day: Option<DailyCount>,
    /// Quietest day with reviews; earliest wins ties.
    pub worst_day: Option<DailyCount>,
    /// Consecutive days ending at the last studied day.
    pub streak: usize,
}

/// Review history report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewHistory {
    /// Deck name.
    pub deck: String,
    /// Requested window.
    pub period: Period,
    /// Summary figures.
    pub summary: ReviewSummary,
    /// Retention over the window.
    pub retention: RetentionResult,
    /// Reviews per day, ascending; days without reviews are omitted.
    pub reviews_by_day: Vec<DailyCount>,
}

impl<B: AnkiBackend> StatsService<B> {
    /// Daily counts, retention and streak for a deck over a date window.
    ///
    /// A window without reviews is a normal, all-zero result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the window ends before it starts
    /// (checked before querying), [`Error::MalformedResponse`] if the log
    /// holds an invalid timestamp or rating, or the AnkiConnect error.
    #[instrument(skip(self, request), fields(operation = "review_history", deck = %request.deck))]
    pub fn review_history(&self, request: &ReviewHistoryRequest) -> Result<ReviewHistory> {
        let end = request.end.unwrap_or_else(|| Utc::now().date_naive());
        check_order(request.start, end)?;

        let start_ms = day_start_ms(request.start);
        let end_ms = end.succ_opt().map_or(i64::MAX, day_start_ms);

        let events = self.backend.card_reviews(&request.deck, start_ms)?;
        let fetched = events.len();
        let events: Vec<ReviewEvent> = events
            .into_iter()
            .filter(|e| e.timestamp_ms < end_ms)
            .collect();
        tracing::debug!(fetched, kept = events.len(), "Filtered review log to window");

        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut ratings = Vec::with_capacity(events.len());
        for event in &events {
            *per_day.entry(event_day(event)?).or_default() += 1;
            ratings.push(Rating::try_from(event.button).map_err(|e| {
                Error::MalformedResponse {
                    operation: "cardReviews".to_string(),
                    cause: e.to_string(),
                }
            })?);
        }

        let reviews_by_day: Vec<DailyCount> = per_day
            .into_iter()
            .map(|(date, count)| DailyCount::new(date, count))
            .collect();

        Ok(ReviewHistory {
            deck: request.deck.clone(),
            period: Period {
                start: request.start,
                end,
            },
            summary: summarize(&reviews_by_day, events.len()),
            retention: retention_from_ratings(&ratings),
            reviews_by_day,
        })
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(days: &[DailyCount], total_reviews: usize) -> ReviewSummary {
    let average_per_day = if days.is_empty() {
        0.0
    } else {
        total_reviews as f64 / days.len() as f64
    };

    // Strict comparisons keep the earliest day on ties.
    let best_day = days.iter().fold(None::<DailyCount>, |best, &day| match best {
        Some(b) if day.count <= b.count => Some(b),
        _ => Some(day),
    });
    let worst_day = days.iter().fold(None::<DailyCount>, |worst, &day| match worst {
        Some(w) if day.count >= w.count => Some(w),
        _ => Some(day),
    });

    ReviewSummary {
        total_reviews,
        average_per_day,
        days_studied: days.len(),
        best_day,
        worst_day,
        streak: calculate_streak(days),
    }
}

fn day_start_ms(day: NaiveDate) -> i64 {
    day.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis()
}

fn event_day(event: &ReviewEvent) -> Result<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(event.timestamp_ms)
        .map(|t| t.date_naive())
        .ok_or_else(|| Error::MalformedResponse {
            operation: "cardReviews".to_string(),
            cause: format!("review timestamp {} is out of range", event.timestamp_ms),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case("2024-03-01", true ; "iso date")]
    #[test_case(" 2024-03-01 ", true ; "surrounding whitespace")]
    #[test_case("2024-02-30", false ; "impossible day")]
    #[test_case("03/01/2024", false ; "us format")]
    #[test_case("", false ; "empty")]
    fn test_parse_date(input: &str, ok: bool) {
        assert_eq!(parse_date("start_date", input).is_ok(), ok);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = ReviewHistoryRequest::parse("Deck", "2024-03-05", Some("2024-03-01")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_same_day_window_allowed() {
        assert!(ReviewHistoryRequest::parse("Deck", "2024-03-05", Some("2024-03-05")).is_ok());
    }

    #[test]
    fn test_day_start_ms() {
        assert_eq!(day_start_ms(day(1970, 1, 2)), 86_400_000);
    }

    #[test]
    fn test_summary_ties_prefer_earliest() {
        let days = [
            DailyCount::new(day(2024, 3, 1), 2),
            DailyCount::new(day(2024, 3, 2), 5),
            DailyCount::new(day(2024, 3, 3), 2),
            DailyCount::new(day(2024, 3, 4), 5),
        ];
        let summary = summarize(&days, 14);

        assert_eq!(summary.best_day, Some(DailyCount::new(day(2024, 3, 2), 5)));
        assert_eq!(summary.worst_day, Some(DailyCount::new(day(2024, 3, 1), 2)));
        assert_eq!(summary.days_studied, 4);
        assert!((summary.average_per_day - 3.5).abs() < f64::EPSILON);
        assert_eq!(summary.streak, 4);
    }

    #[test]
    fn test_summary_empty() {
        let summary = summarize(&[], 0);
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.best_day, None);
        assert_eq!(summary.worst_day, None);
        assert_eq!(summary.streak, 0);
        assert!(summary.average_per_day.abs() < f64::EPSILON);
    }
}

//! Retention over review outcomes.

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Answer button pressed for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Failed recall.
    Again,
    /// Recalled with difficulty.
    Hard,
    /// Recalled.
    Good,
    /// Recalled effortlessly.
    Easy,
}

impl Rating {
    /// All ratings in button order.
    pub const ALL: [Self; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Upstream button code (1..=4).
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }

    /// Whether the review counts as retained.
    #[must_use]
    pub const fn is_pass(self) -> bool {
        !matches!(self, Self::Again)
    }
}

impl TryFrom<i64> for Rating {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| {
                Error::InvalidInput(format!("review rating must be between 1 and 4, got {code}"))
            })
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Review tallies per answer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RatingCounts {
    /// Again presses.
    pub again: usize,
    /// Hard presses.
    pub hard: usize,
    /// Good presses.
    pub good: usize,
    /// Easy presses.
    pub easy: usize,
}

impl RatingCounts {
    /// Total reviews tallied.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.again + self.hard + self.good + self.easy
    }

    const fn record(&mut self, rating: Rating) {
        match rating {
            Rating::Again => self.again += 1,
            Rating::Hard => self.hard += 1,
            Rating::Good => self.good += 1,
            Rating::Easy => self.easy += 1,
        }
    }
}

/// Share of reviews that were not failures, plus per-button counts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RetentionResult {
    /// `(hard + good + easy) / total`, 0 when there are no reviews.
    pub overall: f64,
    /// Counts per button.
    pub by_rating: RatingCounts,
}

/// Computes retention from already-decoded ratings.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn retention_from_ratings(ratings: &[Rating]) -> RetentionResult {
    let mut by_rating = RatingCounts::default();
    let mut passed = 0usize;
    for &rating in ratings {
        by_rating.record(rating);
        passed += usize::from(rating.is_pass());
    }

    let total = by_rating.total();
    let overall = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    };

    RetentionResult { overall, by_rating }
}

/// Computes retention from raw button codes.
///
/// Fails on the first code outside `1..=4`; dropping it would skew `overall`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming the offending code.
pub fn compute_retention(outcomes: &[i64]) -> Result<RetentionResult> {
    let ratings = outcomes
        .iter()
        .map(|&code| Rating::try_from(code))
        .collect::<Result<Vec<_>>>()?;
    Ok(retention_from_ratings(&ratings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_of_each() {
        let result = compute_retention(&[1, 2, 3, 4]).unwrap();

        assert_eq!(
            result.by_rating,
            RatingCounts {
                again: 1,
                hard: 1,
                good: 1,
                easy: 1
            }
        );
        assert!((result.overall - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_is_zero() {
        let result = compute_retention(&[]).unwrap();
        assert!(result.overall.abs() < f64::EPSILON);
        assert_eq!(result.by_rating, RatingCounts::default());
    }

    #[test]
    fn test_all_failures() {
        let result = compute_retention(&[1, 1, 1]).unwrap();
        assert!(result.overall.abs() < f64::EPSILON);
        assert_eq!(result.by_rating.again, 3);
    }

    #[test]
    fn test_out_of_range_code_fails_fast() {
        let err = compute_retention(&[3, 0, 3]).unwrap_err();
        assert!(err.to_string().contains("got 0"));

        assert!(compute_retention(&[5]).is_err());
    }

    #[test]
    fn test_rating_code_roundtrip() {
        for rating in Rating::ALL {
            assert_eq!(Rating::try_from(rating.code()).unwrap(), rating);
        }
    }

    #[test]
    fn test_only_again_fails() {
        let passing: Vec<Rating> = Rating::ALL.into_iter().filter(|r| r.is_pass()).collect();
        assert_eq!(passing, [Rating::Hard, Rating::Good, Rating::Easy]);

        let result = retention_from_ratings(&[Rating::Hard, Rating::Again, Rating::Hard, Rating::Hard]);
        assert!((result.overall - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_by_rating_names() {
        let result = compute_retention(&[3, 3]).unwrap();
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["by_rating"]["good"], 2);
        assert_eq!(json["overall"], 1.0);
    }
}

//! Conversion of raw Anki scheduling values into distribution samples.
//!
//! Anki stores ease as an integer per mille and packs two units into the
//! interval field by sign. Both quirks are decoded here and nowhere else.

/// Divisor turning a stored ease (`2500`) into a multiplier (`2.5`).
pub const EASE_SCALE: f64 = 1000.0;

/// Scheduling phase encoded in a raw interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalPhase {
    /// Sub-day learning step, stored as negative seconds.
    Learning {
        /// Step length in seconds.
        seconds: u64,
    },
    /// Review interval in whole days, stored as a positive value.
    Review {
        /// Interval length in days.
        days: u64,
    },
    /// Zero: the card has no interval yet.
    Unscheduled,
}

impl IntervalPhase {
    /// Decodes a raw interval.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        if raw > 0 {
            Self::Review {
                days: raw.unsigned_abs(),
            }
        } else if raw < 0 {
            Self::Learning {
                seconds: raw.unsigned_abs(),
            }
        } else {
            Self::Unscheduled
        }
    }

    /// Review interval in days, if this is the review phase.
    #[must_use]
    pub const fn review_days(self) -> Option<u64> {
        match self {
            Self::Review { days } => Some(days),
            _ => None,
        }
    }
}

/// Ease multipliers for every card whose ease is set.
///
/// A raw ease of 0 marks a card that has never been scheduled.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn ease_samples(raw: &[i64]) -> Vec<f64> {
    raw.iter()
        .filter(|&&ease| ease != 0)
        .map(|&ease| ease as f64 / EASE_SCALE)
        .collect()
}

/// Review-phase intervals in days; learning and unscheduled cards are dropped.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn review_interval_samples(raw: &[i64]) -> Vec<f64> {
    raw.iter()
        .filter_map(|&interval| IntervalPhase::from_raw(interval).review_days())
        .map(|days| days as f64)
        .collect()
}

//! Daily review counts and study streaks.

use chrono::NaiveDate;
use serde::Serialize;

/// Number of reviews on one calendar day.
///
/// Days without reviews are never materialized; absence means zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    /// Calendar day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Reviews on that day (always > 0).
    pub count: usize,
}

impl DailyCount {
    /// Creates an entry.
    #[must_use]
    pub const fn new(date: NaiveDate, count: usize) -> Self {
        Self { date, count }
    }
}

/// Length of the run of consecutive days ending at the last entry.
///
/// Entries must be sorted ascending by date. The anchor is the most recent
/// entry supplied, not today's date: a window that ends three days ago
/// still reports the streak that ended then.
#[must_use]
pub fn calculate_streak(entries: &[DailyCount]) -> usize {
    let Some(anchor) = entries.last() else {
        return 0;
    };

    let mut streak = 1;
    let mut current = anchor.date;
    for entry in entries.iter().rev().skip(1) {
        if current.pred_opt() != Some(entry.date) {
            break;
        }
        streak += 1;
        current = entry.date;
    }
    streak
}

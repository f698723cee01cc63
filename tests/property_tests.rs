//! Property-based tests for the statistics engines.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Histogram buckets partition the samples
//! - Summary statistics are ordered (min <= median, mean <= max)
//! - Retention stays within [0, 1] and counts every review
//! - Streak length is bounded and exact for unbroken runs

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use ankistat::stats::{
    Boundaries, DailyCount, calculate_streak, compute_distribution, compute_retention,
};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

/// Strictly ascending positive boundaries.
fn ascending_boundaries() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01f64..50.0, 1..8).prop_map(|steps| {
        steps
            .iter()
            .scan(0.0, |acc, step| {
                *acc += step;
                Some(*acc)
            })
            .collect()
    })
}

proptest! {
    /// Property: every sample lands in exactly one bucket.
    #[test]
    fn prop_buckets_partition_samples(
        values in prop::collection::vec(0.0f64..500.0, 0..200),
        points in ascending_boundaries(),
    ) {
        let boundaries = Boundaries::new(&points).unwrap();
        let result = compute_distribution(&values, &boundaries);

        prop_assert_eq!(result.count, values.len());
        prop_assert_eq!(result.buckets.total(), values.len());
        prop_assert_eq!(result.buckets.len(), points.len() + 1);
    }

    /// Property: min <= median <= max and min <= mean <= max.
    #[test]
    fn prop_summary_ordered(values in prop::collection::vec(0.0f64..10.0, 1..200)) {
        let result = compute_distribution(&values, &Boundaries::default_ease());

        prop_assert!(result.min <= result.median + EPS);
        prop_assert!(result.median <= result.max + EPS);
        prop_assert!(result.min <= result.mean + EPS);
        prop_assert!(result.mean <= result.max + EPS);
    }

    /// Property: sample order does not change the result.
    #[test]
    fn prop_distribution_order_independent(values in prop::collection::vec(0.0f64..10.0, 0..100)) {
        let mut reversed = values.clone();
        reversed.reverse();
        let boundaries = Boundaries::default_ease();

        let a = compute_distribution(&values, &boundaries);
        let b = compute_distribution(&reversed, &boundaries);

        prop_assert_eq!(a.buckets, b.buckets);
        prop_assert!((a.median - b.median).abs() < EPS);
        prop_assert!((a.mean - b.mean).abs() < EPS);
    }

    /// Property: retention is a fraction and counts every review.
    #[test]
    fn prop_retention_bounded(outcomes in prop::collection::vec(1i64..=4, 0..300)) {
        let result = compute_retention(&outcomes).unwrap();

        prop_assert!((0.0..=1.0).contains(&result.overall));
        prop_assert_eq!(result.by_rating.total(), outcomes.len());
        if !outcomes.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let expected = (outcomes.len() - result.by_rating.again) as f64 / outcomes.len() as f64;
            prop_assert!((result.overall - expected).abs() < EPS);
        }
    }

    /// Property: any code outside 1..=4 is rejected.
    #[test]
    fn prop_retention_rejects_invalid(
        mut outcomes in prop::collection::vec(1i64..=4, 0..50),
        bad in prop_oneof![i64::MIN..1, 5..i64::MAX],
        at in any::<prop::sample::Index>(),
    ) {
        let position = at.index(outcomes.len() + 1);
        outcomes.insert(position, bad);
        prop_assert!(compute_retention(&outcomes).is_err());
    }

    /// Property: an unbroken run of n days has streak n.
    #[test]
    fn prop_unbroken_run(offset in 0u64..20_000, len in 1usize..60) {
        let start = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Days::new(offset);
        let entries: Vec<DailyCount> = (0..len)
            .map(|i| DailyCount::new(start + Days::new(i as u64), 1))
            .collect();

        prop_assert_eq!(calculate_streak(&entries), len);
    }

    /// Property: streak never exceeds the number of entries and is at least 1
    /// when there are any.
    #[test]
    fn prop_streak_bounded(offsets in prop::collection::btree_set(0u64..400, 0..50)) {
        let origin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let entries: Vec<DailyCount> = offsets
            .into_iter()
            .map(|o| DailyCount::new(origin + Days::new(o), 2))
            .collect();

        let streak = calculate_streak(&entries);
        prop_assert!(streak <= entries.len());
        prop_assert_eq!(streak == 0, entries.is_empty());
    }
}

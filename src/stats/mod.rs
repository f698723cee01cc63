//! Statistics engines.
//!
//! Pure, synchronous computations over in-memory samples:
//!
//! - [`distribution`]: summary statistics and labelled histograms
//! - [`retention`]: pass ratio and per-button counts over review outcomes
//! - [`streak`]: consecutive-day runs over sparse daily counts
//!
//! Nothing here performs I/O; the aggregation layer in
//! [`crate::services`] fetches and filters data before calling in.

pub mod distribution;
pub mod retention;
pub mod streak;

pub use distribution::{
    Boundaries, BucketCount, DAYS_SUFFIX, DistributionResult, Histogram,
    compute_distribution,
};
pub use retention::{Rating, RatingCounts, RetentionResult, compute_retention, retention_from_ratings};
pub use streak::{DailyCount, calculate_streak};

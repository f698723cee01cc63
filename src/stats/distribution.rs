//! Summary statistics and labelled histograms over numeric samples.
//!
//! Buckets are half-open intervals cut by an ascending list of boundaries:
//! `(-inf, b0)`, `[b0, b1)`, ..., `[bN-1, +inf)`. Each bucket is keyed by a
//! human-readable label built from the boundary's own textual form, so a
//! boundary written as `2.0` produces `"<2.0"` while `7` produces `"<7"`.

use crate::{Error, Result};
use serde::Serialize;
use serde::ser::SerializeMap;

/// Default ease-factor boundaries.
const DEFAULT_EASE_BOUNDARIES: [(f64, &str); 3] = [(2.0, "2.0"), (2.5, "2.5"), (3.0, "3.0")];

/// Default interval boundaries, in days.
const DEFAULT_INTERVAL_BOUNDARIES: [(f64, &str); 3] = [(7.0, "7"), (21.0, "21"), (90.0, "90")];

/// Unit suffix appended to interval bucket labels.
pub const DAYS_SUFFIX: &str = "d";

/// A single bucket boundary with the text used in labels.
#[derive(Debug, Clone, PartialEq)]
struct Boundary {
    value: f64,
    text: String,
}

/// A validated, strictly ascending list of positive bucket boundaries.
///
/// Construction fails with [`Error::InvalidInput`] rather than silently
/// sorting or deduplicating, since a malformed list is a caller mistake.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundaries {
    points: Vec<Boundary>,
    unit: String,
}

impl Boundaries {
    /// Builds boundaries from floating point values.
    ///
    /// Labels use the shortest round-trip decimal form, which always keeps a
    /// fractional part (`2.0`, `2.5`).
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, contains non-finite or
    /// non-positive values, or is not strictly ascending.
    pub fn new(values: &[f64]) -> Result<Self> {
        let points = values
            .iter()
            .map(|&value| Boundary {
                value,
                text: format!("{value:?}"),
            })
            .collect();
        Self::validated(points)
    }

    /// Builds boundaries from JSON numbers, keeping each number's own text.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Boundaries::new`], plus numbers that cannot be
    /// represented as `f64`.
    pub fn from_numbers(numbers: &[serde_json::Number]) -> Result<Self> {
        let points = numbers
            .iter()
            .map(|number| {
                number
                    .as_f64()
                    .map(|value| Boundary {
                        value,
                        text: number.to_string(),
                    })
                    .ok_or_else(|| {
                        Error::InvalidInput(format!("bucket boundary {number} is not a number"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::validated(points)
    }

    /// Parses a comma-separated list such as `"2.0,2.5,3.0"`.
    ///
    /// Each entry keeps the text the user typed.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is not a number or the list is invalid.
    pub fn parse_list(input: &str) -> Result<Self> {
        let points = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|text| {
                text.parse::<f64>()
                    .map(|value| Boundary {
                        value,
                        text: text.to_string(),
                    })
                    .map_err(|_| {
                        Error::InvalidInput(format!("bucket boundary '{text}' is not a number"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::validated(points)
    }

    /// Default ease-factor boundaries: `[2.0, 2.5, 3.0]`.
    #[must_use]
    pub fn default_ease() -> Self {
        Self::from_table(&DEFAULT_EASE_BOUNDARIES)
    }

    /// Default interval boundaries: `[7, 21, 90]` with a `d` suffix.
    #[must_use]
    pub fn default_interval() -> Self {
        Self::from_table(&DEFAULT_INTERVAL_BOUNDARIES).with_unit(DAYS_SUFFIX)
    }

    /// Sets the unit suffix appended to every label.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Generates the `N + 1` bucket labels in ascending order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let unit = &self.unit;
        let mut labels = Vec::with_capacity(self.points.len() + 1);
        if let Some(first) = self.points.first() {
            labels.push(format!("<{}{unit}", first.text));
        }
        for pair in self.points.windows(2) {
            labels.push(format!("{}-{}{unit}", pair[0].text, pair[1].text));
        }
        if let Some(last) = self.points.last() {
            labels.push(format!(">{}{unit}", last.text));
        }
        labels
    }

    /// Index of the bucket a value falls into.
    ///
    /// The first boundary the value is strictly less than decides; values at
    /// or above the last boundary land in the open-ended final bucket.
    #[must_use]
    pub fn bucket_index(&self, value: f64) -> usize {
        self.points
            .iter()
            .position(|b| value < b.value)
            .unwrap_or(self.points.len())
    }

    fn from_table(table: &[(f64, &str)]) -> Self {
        Self {
            points: table
                .iter()
                .map(|&(value, text)| Boundary {
                    value,
                    text: text.to_string(),
                })
                .collect(),
            unit: String::new(),
        }
    }

    fn validated(points: Vec<Boundary>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidInput(
                "bucket boundaries must not be empty".to_string(),
            ));
        }
        if let Some(bad) = points
            .iter()
            .find(|b| !b.value.is_finite() || b.value <= 0.0)
        {
            return Err(Error::InvalidInput(format!(
                "bucket boundary {} must be a positive finite number",
                bad.text
            )));
        }
        if let Some(pair) = points.windows(2).find(|pair| pair[0].value >= pair[1].value) {
            return Err(Error::InvalidInput(format!(
                "bucket boundaries must be strictly ascending ({} is followed by {})",
                pair[0].text, pair[1].text
            )));
        }
        Ok(Self {
            points,
            unit: String::new(),
        })
    }
}

/// Count for one labelled bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketCount {
    /// Range label, e.g. `"2.0-2.5"`.
    pub label: String,
    /// Number of samples in the range.
    pub count: usize,
}

/// Ordered histogram; serializes as a JSON object in boundary order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Histogram {
    buckets: Vec<BucketCount>,
}

impl Histogram {
    fn zeroed(boundaries: &Boundaries) -> Self {
        Self {
            buckets: boundaries
                .labels()
                .into_iter()
                .map(|label| BucketCount { label, count: 0 })
                .collect(),
        }
    }

    /// Count for a label, if the label exists.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<usize> {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.count)
    }

    /// Iterates buckets in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &BucketCount> {
        self.buckets.iter()
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether there are no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

impl Serialize for Histogram {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.label, &bucket.count)?;
        }
        map.end()
    }
}

/// Summary statistics plus histogram for one sample set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionResult {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean (0 when empty).
    pub mean: f64,
    /// Median (0 when empty).
    pub median: f64,
    /// Smallest sample (0 when empty).
    pub min: f64,
    /// Largest sample (0 when empty).
    pub max: f64,
    /// Histogram keyed by range label.
    pub buckets: Histogram,
}

impl DistributionResult {
    /// All-zero result with one zero bucket per label.
    #[must_use]
    pub fn empty(boundaries: &Boundaries) -> Self {
        Self {
            count: 0,
            mean: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            buckets: Histogram::zeroed(boundaries),
        }
    }
}

/// Computes count, mean, median, extrema and a bucketed histogram.
///
/// The input slice is not modified.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn compute_distribution(values: &[f64], boundaries: &Boundaries) -> DistributionResult {
    if values.is_empty() {
        return DistributionResult::empty(boundaries);
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = count / 2;
    let median = if count % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    };

    let mut buckets = Histogram::zeroed(boundaries);
    for &value in values {
        buckets.buckets[boundaries.bucket_index(value)].count += 1;
    }

    DistributionResult {
        count,
        mean,
        median,
        min: sorted[0],
        max: sorted[count - 1],
        buckets,
    }
}

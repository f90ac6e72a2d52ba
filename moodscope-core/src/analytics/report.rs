//! Bucket accumulation shared by every chart report.
//!
//! Chart reports come in two flavors:
//! - **gap** reports (weekly, hourly, daily, four-week) emit `None` for a
//!   bucket with no observations, which renders as a break in the line;
//! - **zero** reports (monthly-for-year, weeks-of-month) emit `0.0`, which
//!   older chart consumers depend on.
//!
//! Both flavors are produced here so no report re-derives the rule.

use crate::scale::round_to;

/// Running sums and counts for a fixed number of buckets.
#[derive(Debug, Clone)]
pub struct Buckets {
    sums: Vec<f64>,
    counts: Vec<usize>,
}

impl Buckets {
    /// Create `len` empty buckets.
    pub fn new(len: usize) -> Self {
        Self {
            sums: vec![0.0; len],
            counts: vec![0; len],
        }
    }

    /// Add a value to a bucket. Out-of-range indexes are ignored.
    pub fn add(&mut self, index: usize, value: f64) {
        if let (Some(sum), Some(count)) = (self.sums.get_mut(index), self.counts.get_mut(index)) {
            *sum += value;
            *count += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// Number of values added to each bucket.
    pub fn counts(&self) -> Vec<usize> {
        self.counts.clone()
    }

    /// Total number of values across all buckets.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Unrounded mean of one bucket, `None` if empty.
    pub fn mean(&self, index: usize) -> Option<f64> {
        match self.counts.get(index) {
            Some(&count) if count > 0 => Some(self.sums[index] / count as f64),
            _ => None,
        }
    }

    /// Bucket means rounded to `places`, empty buckets as gaps.
    pub fn gapped_means(&self, places: i32) -> Vec<Option<f64>> {
        (0..self.len())
            .map(|i| self.mean(i).map(|m| round_to(m, places)))
            .collect()
    }

    /// Bucket means rounded to `places`, empty buckets as zero.
    pub fn zeroed_means(&self, places: i32) -> Vec<f64> {
        self.gapped_means(places)
            .into_iter()
            .map(|m| m.unwrap_or(0.0))
            .collect()
    }
}

/// A series of `len` gaps.
pub fn gap_series(len: usize) -> Vec<Option<f64>> {
    vec![None; len]
}

/// Mean of a slice, `None` if empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

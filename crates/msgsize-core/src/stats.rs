//! Descriptive statistics over the byte sizes of one format.

use serde::{Deserialize, Serialize};

// ── FormatStatistics ──────────────────────────────────────────────────────────

/// Every byte size observed for one (message type, direction, format) key.
///
/// Only the raw sequence is stored; all derived values are recomputed on
/// each call. Empty sequences yield zero for every statistic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatStatistics {
    sizes: Vec<u64>,
}

impl FormatStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observed size.
    pub fn add(&mut self, byte_size: u64) {
        self.sizes.push(byte_size);
    }

    /// Append every size from `other`; order across partitions is irrelevant.
    pub fn merge(&mut self, other: &FormatStatistics) {
        self.sizes.extend_from_slice(&other.sizes);
    }

    /// The raw sizes in insertion order.
    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sum of all sizes, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.sizes
            .iter()
            .fold(0u64, |acc, &size| acc.saturating_add(size))
    }

    pub fn mean(&self) -> f64 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.sizes.iter().map(|&size| size as f64).sum();
        sum / self.sizes.len() as f64
    }

    /// Middle value, or the average of the two middle values for an even
    /// count.
    pub fn median(&self) -> f64 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        let mut sorted = self.sizes.clone();
        sorted.sort_unstable();
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            sorted[mid] as f64
        } else {
            (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
        }
    }

    pub fn min(&self) -> u64 {
        self.sizes.iter().copied().min().unwrap_or(0)
    }

    pub fn max(&self) -> u64 {
        self.sizes.iter().copied().max().unwrap_or(0)
    }

    /// Sample standard deviation (n − 1 denominator); 0 for fewer than two
    /// samples.
    pub fn stdev(&self) -> f64 {
        let n = self.sizes.len();
        if n <= 1 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self
            .sizes
            .iter()
            .map(|&s| {
                let d = s as f64 - mean;
                d * d
            })
            .sum();
        (sum_sq / (n as f64 - 1.0)).sqrt()
    }

    /// Snapshot of every derived statistic.
    pub fn summary(&self) -> FormatSummary {
        FormatSummary {
            count: self.count(),
            total: self.total(),
            mean: self.mean(),
            median: self.median(),
            min: self.min(),
            max: self.max(),
            stdev: self.stdev(),
        }
    }
}

impl FromIterator<u64> for FormatStatistics {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            sizes: iter.into_iter().collect(),
        }
    }
}

// ── FormatSummary ─────────────────────────────────────────────────────────────

/// Serializable statistics for one format, as written to the export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSummary {
    pub count: usize,
    pub total: u64,
    pub mean: f64,
    pub median: f64,
    pub min: u64,
    pub max: u64,
    pub stdev: f64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

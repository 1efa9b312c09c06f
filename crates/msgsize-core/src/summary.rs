//! Cross-message-type roll-ups used by the report's summary sections.

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateSet;
use crate::formatting::percentage;
use crate::models::AggregateKey;

// ── FormatTotals ──────────────────────────────────────────────────────────────

/// Bytes and message count for one format across every aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatTotals {
    pub format: String,
    pub total_bytes: u64,
    pub message_count: usize,
    /// Mean size across all messages; 0 when no message used the format.
    pub average: f64,
    /// `total_bytes` as a percentage of the baseline's total; 0 when the
    /// baseline has no bytes.
    pub ratio_vs_baseline: f64,
}

/// Sum every configured format over all aggregates.
///
/// Formats are returned in the order given. A format that never appears is
/// still listed, with zero totals.
pub fn format_totals(
    aggregates: &AggregateSet,
    formats: &[String],
    baseline: &str,
) -> Vec<FormatTotals> {
    let sum_for = |format: &str| -> (u64, usize) {
        aggregates
            .iter()
            .filter_map(|(_, a)| a.format(format))
            .fold((0u64, 0usize), |(bytes, count), s| {
                (bytes.saturating_add(s.total()), count + s.count())
            })
    };

    let (baseline_total, _) = sum_for(baseline);

    formats
        .iter()
        .map(|format| {
            let (total_bytes, message_count) = sum_for(format);
            let average = if message_count > 0 {
                total_bytes as f64 / message_count as f64
            } else {
                0.0
            };
            let ratio_vs_baseline = percentage(total_bytes as f64, baseline_total as f64);
            FormatTotals {
                format: format.clone(),
                total_bytes,
                message_count,
                average,
                ratio_vs_baseline,
            }
        })
        .collect()
}

// ── VariantDiff ───────────────────────────────────────────────────────────────

/// Mean size of a variant format next to the format it derives from.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDiff {
    pub key: AggregateKey,
    pub reference_mean: f64,
    pub variant_mean: f64,
}

impl VariantDiff {
    /// `variant_mean - reference_mean`; negative when the variant is smaller.
    pub fn diff(&self) -> f64 {
        self.variant_mean - self.reference_mean
    }
}

/// Per-key comparison of `variant` against `reference`, in key order.
///
/// Keys where either format is missing, or the reference has no samples,
/// are skipped.
pub fn variant_diffs(
    aggregates: &AggregateSet,
    reference: &str,
    variant: &str,
) -> Vec<VariantDiff> {
    aggregates
        .iter()
        .filter_map(|(key, aggregate)| {
            let reference_stats = aggregate.format(reference)?;
            let variant_stats = aggregate.format(variant)?;
            if reference_stats.is_empty() {
                return None;
            }
            Some(VariantDiff {
                key: key.clone(),
                reference_mean: reference_stats.mean(),
                variant_mean: variant_stats.mean(),
            })
        })
        .collect()
}

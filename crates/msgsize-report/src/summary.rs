//! Roll-up sections: the variant comparison and the aggregate summary.

use msgsize_core::formatting::{format_count, format_signed, format_size};
use msgsize_core::summary::{FormatTotals, VariantDiff};

use crate::layout::{banner, pad_left, pad_right, rule};

/// Mean of `reference` next to mean of `variant`, per key.
pub fn variant_comparison(diffs: &[VariantDiff], reference: &str, variant: &str) -> Vec<String> {
    let mut lines = banner(&format!(
        "{} vs {} COMPARISON",
        reference.to_uppercase(),
        variant.to_uppercase()
    ));

    lines.push(String::new());
    lines.push(format!(
        "{} {} {} {} {}",
        pad_right("Message Type", 45),
        pad_right("Direction", 10),
        pad_left(reference, 10),
        pad_left(variant, 10),
        pad_left("Diff", 10)
    ));
    lines.push(rule('-', 95));

    for diff in diffs {
        lines.push(format!(
            "{} {} {} {} {}",
            pad_right(&diff.key.message_type, 45),
            pad_right(diff.key.direction.as_str(), 10),
            pad_left(&format!("{:.1}", diff.reference_mean), 10),
            pad_left(&format!("{:.1}", diff.variant_mean), 10),
            pad_left(&format_signed(diff.diff(), 1), 10)
        ));
    }

    lines
}

/// Total bytes, message count, average and ratio to the baseline per format.
/// Formats with no messages are omitted.
pub fn aggregate_summary(totals: &[FormatTotals], baseline: &str) -> Vec<String> {
    let mut lines = banner("AGGREGATE SUMMARY");

    lines.push(String::new());
    lines.push(format!(
        "{} {} {} {} {}",
        pad_right("Format", 18),
        pad_left("Total Bytes", 15),
        pad_left("Msg Count", 12),
        pad_left("Avg Size", 12),
        pad_left(&format!("vs {}", baseline), 12)
    ));
    lines.push(rule('-', 80));

    for entry in totals.iter().filter(|t| t.message_count > 0) {
        lines.push(format!(
            "{} {} {} {} {}",
            pad_right(&entry.format, 18),
            pad_left(&format_count(entry.total_bytes), 15),
            pad_left(&format_count(entry.message_count as u64), 12),
            pad_left(&format_size(entry.average), 12),
            pad_left(&format!("{:.1}%", entry.ratio_vs_baseline), 12)
        ));
    }

    lines
}

//! Assembles every report section into one text document.

use msgsize_core::aggregate::AggregateSet;
use msgsize_core::formatting::format_count;
use msgsize_core::ranker::ComparativeRanker;
use msgsize_core::settings::AnalysisConfig;
use msgsize_core::summary::{format_totals, variant_diffs};
use tracing::debug;

use crate::layout::banner;
use crate::ranking::{head_to_head, structural_analysis};
use crate::summary::{aggregate_summary, variant_comparison};
use crate::table::{comparison_table, size_distribution};

fn header(aggregates: &AggregateSet, config: &AnalysisConfig) -> Vec<String> {
    let messages: usize = aggregates
        .iter()
        .map(|(_, a)| a.formats().values().map(|s| s.count()).max().unwrap_or(0))
        .sum();

    let mut lines = banner("MESSAGE SIZE ANALYSIS");
    lines.push(format!(
        "Message type/direction combinations: {}",
        format_count(aggregates.len() as u64)
    ));
    lines.push(format!("Messages: {}", format_count(messages as u64)));
    lines.push(format!("Formats: {}", config.formats.join(", ")));
    lines.push(format!(
        "Baseline: {}  Challenger: {}  Variant: {}",
        config.baseline, config.challenger, config.variant
    ));
    lines
}

/// Render the full text report.
///
/// Sections appear in a fixed order, separated by a blank line. The size
/// distribution is only included when `config.detailed` is set.
pub fn render_report(aggregates: &AggregateSet, config: &AnalysisConfig) -> String {
    let ranker = ComparativeRanker::new(config.baseline.as_str(), config.challenger.as_str())
        .with_top_n(config.top_n);
    let ranking = ranker.rank(ranker.compare_within(aggregates));
    debug!(
        "Ranking: {} challenger wins, {} baseline wins, {} ties",
        ranking.challenger_wins.len(),
        ranking.baseline_wins.len(),
        ranking.ties.len()
    );

    let mut sections = vec![
        header(aggregates, config),
        comparison_table(aggregates, &config.formats),
        head_to_head(&ranking, &config.baseline, &config.challenger),
        structural_analysis(
            &ranker.explain(&ranking.challenger_wins, aggregates),
            &config.challenger,
            &config.baseline,
        ),
        structural_analysis(
            &ranker.explain(&ranking.baseline_wins, aggregates),
            &config.baseline,
            &config.challenger,
        ),
        variant_comparison(
            &variant_diffs(aggregates, &config.challenger, &config.variant),
            &config.challenger,
            &config.variant,
        ),
        aggregate_summary(
            &format_totals(aggregates, &config.formats, &config.baseline),
            &config.baseline,
        ),
    ];
    if config.detailed {
        sections.push(size_distribution(aggregates, &config.formats));
    }

    let mut out = String::new();
    for section in sections {
        for line in section {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgsize_core::models::MessageRecord;
    use serde_json::json;

    fn sample_set() -> AggregateSet {
        let mut set = AggregateSet::new();
        let rows = [
            ("Search", "request", json!({"protobuf": 100, "symphony": 80, "symphony_hybrid": 70})),
            ("Search", "request", json!({"protobuf": 100, "symphony": 90, "symphony_hybrid": 75})),
            ("Profile", "response", json!({"protobuf": 200, "symphony": 260})),
        ];
        for (message_type, direction, sizes) in rows {
            set.ingest(
                MessageRecord::from_json(&json!({
                    "message_type": message_type,
                    "direction": direction,
                    "sizes": sizes,
                    "payload": {"q": "hotels"},
                }))
                .unwrap(),
            );
        }
        set
    }

    fn position(report: &str, needle: &str) -> usize {
        report
            .find(needle)
            .unwrap_or_else(|| panic!("missing section: {needle}"))
    }

    #[test]
    fn test_render_report_section_order() {
        let report = render_report(&sample_set(), &AnalysisConfig::default());

        let order = [
            "MESSAGE SIZE ANALYSIS",
            "MESSAGE SIZE COMPARISON BY TYPE",
            "SYMPHONY vs PROTOBUF DETAILED ANALYSIS",
            "WHY SYMPHONY OUTPERFORMS PROTOBUF - STRUCTURAL ANALYSIS",
            "WHY PROTOBUF OUTPERFORMS SYMPHONY - STRUCTURAL ANALYSIS",
            "SYMPHONY vs SYMPHONY_HYBRID COMPARISON",
            "AGGREGATE SUMMARY",
        ];
        let positions: Vec<usize> = order.iter().map(|s| position(&report, s)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!report.contains("SIZE DISTRIBUTION BY MESSAGE TYPE"));
    }

    #[test]
    fn test_render_report_header_counts() {
        let report = render_report(&sample_set(), &AnalysisConfig::default());
        assert!(report.contains("Message type/direction combinations: 2"));
        assert!(report.contains("Messages: 3"));
    }

    #[test]
    fn test_render_report_detailed_adds_distribution() {
        let config = AnalysisConfig {
            detailed: true,
            ..AnalysisConfig::default()
        };
        let report = render_report(&sample_set(), &config);
        let summary = position(&report, "AGGREGATE SUMMARY");
        let distribution = position(&report, "SIZE DISTRIBUTION BY MESSAGE TYPE");
        assert!(summary < distribution);
    }

    #[test]
    fn test_render_report_empty_set() {
        let report = render_report(&AggregateSet::new(), &AnalysisConfig::default());
        assert!(report.contains("SYMPHONY WINS (0 message types):"));
        assert!(report.contains("PROTOBUF WINS (0 message types):"));
        assert!(!report.contains("TIES"));
    }
}

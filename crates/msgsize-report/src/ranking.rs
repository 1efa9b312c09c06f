//! Baseline vs challenger sections: the ranked win/loss tables and the
//! structural commentary for the top entries.

use msgsize_core::ranker::{ComparisonResult, Outcome, Ranking, StructuralCommentary};
use msgsize_core::shape::PayloadShapeDescriptor;

use crate::layout::{banner, pad_left, pad_right, rule};

const LABEL_WIDTH: usize = 50;
const TABLE_WIDTH: usize = 100;

fn label(result: &ComparisonResult) -> String {
    format!("{} ({})", result.message_type, result.direction)
}

fn ranked_table(
    lines: &mut Vec<String>,
    entries: &[ComparisonResult],
    baseline: &str,
    challenger: &str,
    diff_header: &str,
) {
    lines.push(format!(
        "{} {} {} {} {}",
        pad_right("Message Type", LABEL_WIDTH),
        pad_left(&format!("{} Mean", baseline), 10),
        pad_left(&format!("{} Mean", challenger), 10),
        pad_left(diff_header, 10),
        pad_left("%", 8)
    ));
    lines.push(rule('-', TABLE_WIDTH));
    for entry in entries {
        let (diff, pct) = match entry.outcome {
            Outcome::BaselineWins => (-entry.delta_bytes, entry.overhead_percent()),
            _ => (entry.delta_bytes, entry.delta_percent),
        };
        lines.push(format!(
            "{} {} {} {} {}",
            pad_right(&label(entry), LABEL_WIDTH),
            pad_left(&format!("{:.1}", entry.baseline_mean), 10),
            pad_left(&format!("{:.1}", entry.challenger_mean), 10),
            pad_left(&format!("{:.1}", diff), 10),
            pad_left(&format!("{:.1}%", pct), 8)
        ));
    }
}

/// Ranked win/loss tables plus the tie count.
pub fn head_to_head(ranking: &Ranking, baseline: &str, challenger: &str) -> Vec<String> {
    let mut lines = banner(&format!(
        "{} vs {} DETAILED ANALYSIS",
        challenger.to_uppercase(),
        baseline.to_uppercase()
    ));

    lines.push(String::new());
    lines.push(format!(
        "{} WINS ({} message types):",
        challenger.to_uppercase(),
        ranking.challenger_wins.len()
    ));
    lines.push(rule('-', TABLE_WIDTH));
    if !ranking.challenger_wins.is_empty() {
        ranked_table(&mut lines, &ranking.challenger_wins, baseline, challenger, "Savings");
    }

    lines.push(String::new());
    lines.push(format!(
        "{} WINS ({} message types):",
        baseline.to_uppercase(),
        ranking.baseline_wins.len()
    ));
    lines.push(rule('-', TABLE_WIDTH));
    if !ranking.baseline_wins.is_empty() {
        ranked_table(&mut lines, &ranking.baseline_wins, baseline, challenger, "Overhead");
    }

    if !ranking.ties.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "TIES ({} message types - typically empty messages)",
            ranking.ties.len()
        ));
    }

    lines
}

fn shape_lines(lines: &mut Vec<String>, shape: &PayloadShapeDescriptor) {
    lines.push("   Payload structure:".to_string());
    lines.push(format!("     - Fields: {}", shape.field_count));
    lines.push(format!("     - String bytes: {}", shape.string_byte_total));
    lines.push(format!("     - Array lengths: {:?}", shape.array_lengths));
    lines.push(format!("     - Nested objects: {}", shape.nested_object_count));
}

/// Commentary block for each entry: the size difference, the payload shape
/// and the hypothesis when one matched.
pub fn structural_analysis(
    commentary: &[StructuralCommentary],
    winner: &str,
    loser: &str,
) -> Vec<String> {
    let mut lines = banner(&format!(
        "WHY {} OUTPERFORMS {} - STRUCTURAL ANALYSIS",
        winner.to_uppercase(),
        loser.to_uppercase()
    ));

    for entry in commentary {
        let result = &entry.result;
        lines.push(String::new());
        lines.push(label(result));
        match result.outcome {
            Outcome::ChallengerWins => lines.push(format!(
                "   {} saves {:.1} bytes ({:.1}%) per message",
                result.challenger_format, result.delta_bytes, result.delta_percent
            )),
            _ => lines.push(format!(
                "   {} adds {:.1} bytes ({:.1}%) overhead per message",
                result.challenger_format,
                -result.delta_bytes,
                result.overhead_percent()
            )),
        }

        if let Some(shape) = &entry.shape {
            shape_lines(&mut lines, shape);
        }
        if let Some(hypothesis) = entry.hypothesis {
            lines.push(format!("   → {}", hypothesis));
        }
    }

    lines
}

//! Per-type tables: mean size per format, and the full size distribution.

use msgsize_core::aggregate::{AggregateSet, MessageTypeAggregate};
use msgsize_core::formatting::format_number;

use crate::layout::{banner, pad_left, pad_right, rule, BANNER_WIDTH};

const TYPE_WIDTH: usize = 40;
const DIR_WIDTH: usize = 9;
const COUNT_WIDTH: usize = 8;
const FORMAT_WIDTH: usize = 12;

/// Largest sample count among the aggregate's formats.
fn message_count(aggregate: &MessageTypeAggregate) -> usize {
    aggregate
        .formats()
        .values()
        .map(|s| s.count())
        .max()
        .unwrap_or(0)
}

/// Mean size of every listed format for each key; `-` where a format has no
/// samples.
pub fn comparison_table(aggregates: &AggregateSet, formats: &[String]) -> Vec<String> {
    let mut lines = banner("MESSAGE SIZE COMPARISON BY TYPE");

    let widths: Vec<usize> = formats.iter().map(|f| f.len().max(FORMAT_WIDTH)).collect();

    let mut header = format!(
        "{} {} {}",
        pad_right("Message Type", TYPE_WIDTH),
        pad_right("Dir", DIR_WIDTH),
        pad_left("Count", COUNT_WIDTH)
    );
    for (format, &w) in formats.iter().zip(&widths) {
        header.push(' ');
        header.push_str(&pad_left(format, w));
    }
    lines.push(header);
    lines.push(rule('-', BANNER_WIDTH));

    for (key, aggregate) in aggregates.iter() {
        let mut row = format!(
            "{} {} {}",
            pad_right(&key.message_type, TYPE_WIDTH),
            pad_right(key.direction.as_str(), DIR_WIDTH),
            pad_left(&message_count(aggregate).to_string(), COUNT_WIDTH)
        );
        for (format, &w) in formats.iter().zip(&widths) {
            let cell = aggregate
                .format(format)
                .map(|s| format!("{:.1}", s.mean()))
                .unwrap_or_else(|| "-".to_string());
            row.push(' ');
            row.push_str(&pad_left(&cell, w));
        }
        lines.push(row);
    }

    lines.push(rule('-', BANNER_WIDTH));
    lines
}

/// Mean, median, min, max and standard deviation of each listed format, one
/// block per key.
pub fn size_distribution(aggregates: &AggregateSet, formats: &[String]) -> Vec<String> {
    let mut lines = banner("SIZE DISTRIBUTION BY MESSAGE TYPE");

    for (key, aggregate) in aggregates.iter() {
        lines.push(String::new());
        lines.push(format!(
            "{} ({}) - {} messages",
            key.message_type,
            key.direction,
            format_number(message_count(aggregate) as f64, 0)
        ));
        if !aggregate.sources().is_empty() {
            let sources: Vec<&str> = aggregate.sources().iter().map(String::as_str).collect();
            lines.push(format!("Sources: {}", sources.join(", ")));
        }
        lines.push(rule('-', 80));
        lines.push(format!(
            "{} {} {} {} {} {}",
            pad_right("Format", 18),
            pad_left("Mean", 10),
            pad_left("Median", 10),
            pad_left("Min", 10),
            pad_left("Max", 10),
            pad_left("StdDev", 10)
        ));
        lines.push(rule('-', 80));

        for format in formats {
            let Some(stats) = aggregate.format(format) else {
                continue;
            };
            lines.push(format!(
                "{} {} {} {} {} {}",
                pad_right(format, 18),
                pad_left(&format!("{:.1}", stats.mean()), 10),
                pad_left(&format!("{:.1}", stats.median()), 10),
                pad_left(&stats.min().to_string(), 10),
                pad_left(&stats.max().to_string(), 10),
                pad_left(&format!("{:.1}", stats.stdev()), 10)
            ));
        }
    }

    lines
}

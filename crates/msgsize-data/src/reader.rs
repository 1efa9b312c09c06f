//! JSONL file discovery and loading.
//!
//! Each line written by the message logger is one JSON object carrying a
//! `message_type`, a `direction`, a `sizes` map and the logged `payload`.
//! Lines that fail to parse or lack the required fields are skipped and
//! counted; they never abort a load.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use msgsize_core::aggregate::AggregateSet;
use msgsize_core::error::{AnalyzerError, Result};
use msgsize_core::models::MessageRecord;
use tracing::{debug, warn};

// ── LoadStats ─────────────────────────────────────────────────────────────────

/// Line-level counters for one or more loaded files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Non-blank lines seen.
    pub lines_read: u64,
    /// Lines that became records.
    pub records_loaded: u64,
    /// Lines that were invalid JSON or not applicable.
    pub records_skipped: u64,
    /// Individual size entries dropped from otherwise valid records.
    pub sizes_rejected: u64,
}

impl LoadStats {
    pub fn absorb(&mut self, other: &LoadStats) {
        self.lines_read += other.lines_read;
        self.records_loaded += other.records_loaded;
        self.records_skipped += other.records_skipped;
        self.sizes_rejected += other.sizes_rejected;
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.jsonl` files recursively under `log_dir`, sorted by path.
pub fn find_jsonl_files(log_dir: &Path) -> Vec<PathBuf> {
    if !log_dir.exists() {
        warn!("Log directory does not exist: {}", log_dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(log_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "jsonl")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Parse one log line into a validated record.
pub fn parse_record(line: &str) -> Result<MessageRecord> {
    let data: serde_json::Value = serde_json::from_str(line)?;
    MessageRecord::from_json(&data)
}

/// Read every record of one file into its own aggregate partition.
///
/// Fails only when the file cannot be opened; bad lines are skipped.
pub fn load_partition(file_path: &Path) -> Result<(AggregateSet, LoadStats)> {
    let file = std::fs::File::open(file_path).map_err(|source| AnalyzerError::FileRead {
        path: file_path.to_path_buf(),
        source,
    })?;

    let source_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut partition = AggregateSet::new();
    let mut stats = LoadStats::default();
    let reader = std::io::BufReader::new(file);

    for (index, line_result) in reader.lines().enumerate() {
        let line_num = index + 1;
        let line = match line_result {
            Ok(l) => l,
            Err(e) => {
                warn!("Failed to read line {} of {}: {}", line_num, source_name, e);
                stats.records_skipped += 1;
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.lines_read += 1;

        match parse_record(trimmed) {
            Ok(record) => {
                if record.rejected_sizes > 0 {
                    debug!(
                        "{}:{}: dropped {} unusable size entries",
                        source_name, line_num, record.rejected_sizes
                    );
                }
                stats.sizes_rejected += record.rejected_sizes as u64;
                stats.records_loaded += 1;
                partition.ingest(record.with_source(source_name.as_str()));
            }
            Err(AnalyzerError::JsonParse(e)) => {
                warn!("Invalid JSON at line {} of {}: {}", line_num, source_name, e);
                stats.records_skipped += 1;
            }
            Err(e) => {
                debug!("Skipping line {} of {}: {}", line_num, source_name, e);
                stats.records_skipped += 1;
            }
        }
    }

    debug!(
        "File {}: {} lines, {} records, {} skipped, {} aggregates",
        file_path.display(),
        stats.lines_read,
        stats.records_loaded,
        stats.records_skipped,
        partition.len(),
    );

    Ok((partition, stats))
}

/// Load every file in order and merge the partitions.
///
/// Unreadable files are logged and skipped. Returns the merged set, the
/// combined counters and how many files were actually read.
pub fn load_all(files: &[PathBuf]) -> (AggregateSet, LoadStats, usize) {
    let mut merged = AggregateSet::new();
    let mut totals = LoadStats::default();
    let mut files_read = 0usize;

    for file_path in files {
        match load_partition(file_path) {
            Ok((partition, stats)) => {
                merged.merge(partition);
                totals.absorb(&stats);
                files_read += 1;
            }
            Err(e) => warn!("{}", e),
        }
    }

    (merged, totals, files_read)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Top-level ingestion pipeline.
//!
//! Discovers the log files, folds them into aggregates and returns an
//! [`AnalysisResult`] ready for the ranker and the report layer.

use std::path::Path;

use chrono::Utc;
use msgsize_core::aggregate::AggregateSet;
use msgsize_core::error::{AnalyzerError, Result};
use tracing::info;

use crate::reader::{find_jsonl_files, load_all};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the aggregates.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// The directory that was scanned.
    pub log_dir: String,
    /// Number of JSONL files that were read.
    pub files_scanned: usize,
    /// Lines that became records.
    pub records_loaded: u64,
    /// Lines skipped as invalid or not applicable.
    pub records_skipped: u64,
    /// Individual size entries dropped at ingestion.
    pub sizes_rejected: u64,
    /// Distinct (message type, direction) keys.
    pub aggregate_count: usize,
    /// Every format name seen, sorted.
    pub formats_seen: Vec<String>,
    /// Wall-clock seconds spent loading and aggregating.
    pub load_time_seconds: f64,
}

/// The complete output of [`analyze_logs`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub aggregates: AggregateSet,
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the ingestion pipeline over `log_dir`.
///
/// 1. Check that the directory exists.
/// 2. Find every `*.jsonl` file under it.
/// 3. Fold each file into a partition and merge them in path order.
/// 4. Return the aggregates with run metadata.
///
/// Fails when the directory is missing or holds no JSONL files. A directory
/// whose files contain no usable records yields an empty aggregate set.
pub fn analyze_logs(log_dir: &Path) -> Result<AnalysisResult> {
    if !log_dir.exists() {
        return Err(AnalyzerError::LogDirNotFound(log_dir.to_path_buf()));
    }

    let files = find_jsonl_files(log_dir);
    if files.is_empty() {
        return Err(AnalyzerError::NoLogFiles(log_dir.to_path_buf()));
    }
    info!("Found {} log files in {}", files.len(), log_dir.display());

    let load_start = std::time::Instant::now();
    let (aggregates, stats, files_read) = load_all(&files);
    let load_time = load_start.elapsed().as_secs_f64();

    info!(
        "Loaded {} messages ({} skipped) into {} message type/direction combinations",
        stats.records_loaded,
        stats.records_skipped,
        aggregates.len()
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        log_dir: log_dir.display().to_string(),
        files_scanned: files_read,
        records_loaded: stats.records_loaded,
        records_skipped: stats.records_skipped,
        sizes_rejected: stats.sizes_rejected,
        aggregate_count: aggregates.len(),
        formats_seen: aggregates.formats_seen(),
        load_time_seconds: load_time,
    };

    Ok(AnalysisResult {
        aggregates,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use msgsize_core::models::{AggregateKey, Direction};
    use msgsize_core::ranker::{ComparativeRanker, Outcome};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_jsonl(dir: &Path, name: &str, lines: &[String]) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    #[test]
    fn test_analyze_logs_missing_dir() {
        let err = analyze_logs(Path::new("/tmp/msgsize-no-such-dir-xyz")).unwrap_err();
        assert!(matches!(err, AnalyzerError::LogDirNotFound(_)));
    }

    #[test]
    fn test_analyze_logs_no_files() {
        let dir = TempDir::new().unwrap();
        let err = analyze_logs(dir.path()).unwrap_err();
        assert!(matches!(err, AnalyzerError::NoLogFiles(_)));
    }

    #[test]
    fn test_analyze_logs_only_malformed_lines() {
        let dir = TempDir::new().unwrap();
        write_jsonl(dir.path(), "bad.jsonl", &["{oops".to_string()]);

        let result = analyze_logs(dir.path()).unwrap();
        assert!(result.aggregates.is_empty());
        assert_eq!(result.metadata.records_skipped, 1);
        assert_eq!(result.metadata.files_scanned, 1);
    }

    #[test]
    fn test_analyze_logs_end_to_end_search() {
        let dir = TempDir::new().unwrap();
        let lines = vec![
            serde_json::json!({"message_type": "Search", "direction": "out", "sizes": {"pb": 100, "sym": 80}, "payload": {}}).to_string(),
            serde_json::json!({"message_type": "Search", "direction": "out", "sizes": {"pb": 100, "sym": 90}, "payload": {}}).to_string(),
        ];
        write_jsonl(dir.path(), "client.jsonl", &lines);

        let result = analyze_logs(dir.path()).unwrap();
        assert_eq!(result.metadata.records_loaded, 2);
        assert_eq!(result.metadata.aggregate_count, 1);
        assert_eq!(result.metadata.formats_seen, vec!["pb", "sym"]);

        let agg = result
            .aggregates
            .get(&AggregateKey::new("Search", Direction::Outbound))
            .unwrap();
        assert_eq!(agg.format("pb").unwrap().mean(), 100.0);
        assert_eq!(agg.format("sym").unwrap().mean(), 85.0);
        assert!(agg.sources().contains("client.jsonl"));

        let results = ComparativeRanker::new("pb", "sym").compare_within(&result.aggregates);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, Outcome::ChallengerWins);
        assert!((results[0].delta_bytes - 15.0).abs() < 1e-9);
        assert!((results[0].delta_percent - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_analysis_metadata_serializes() {
        let dir = TempDir::new().unwrap();
        write_jsonl(
            dir.path(),
            "x.jsonl",
            &[r#"{"message_type": "A", "sizes": {"protobuf": 3}}"#.to_string()],
        );
        let result = analyze_logs(dir.path()).unwrap();
        let json = serde_json::to_value(&result.metadata).unwrap();
        assert_eq!(json["records_loaded"], 1);
        assert!(json["generated_at"].as_str().unwrap().contains('T'));
    }
}

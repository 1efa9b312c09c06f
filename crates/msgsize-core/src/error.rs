use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the message-size analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A log file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A record lacks a field the core needs to classify it.
    #[error("Record is missing required field `{0}`")]
    MissingField(&'static str),

    /// A record field is present but has an unusable value.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The log directory does not exist.
    #[error("Log directory not found: {0}")]
    LogDirNotFound(PathBuf),

    /// No JSONL log files were found under the given directory.
    #[error("No JSONL files found in {0}")]
    NoLogFiles(PathBuf),

    /// The export document could not be written.
    #[error("Failed to write export {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the analyzer crates.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

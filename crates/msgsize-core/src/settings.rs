use clap::builder::TypedValueParser;
use clap::Parser;
use std::path::PathBuf;

use crate::error::{AnalyzerError, Result};
use crate::ranker::DEFAULT_TOP_N;

/// Formats reported when `--formats` is not given, in display order.
pub const DEFAULT_FORMATS: [&str; 5] = [
    "protobuf",
    "symphony",
    "symphony_hybrid",
    "flatbuffers",
    "capnproto",
];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Analyze serialization message sizes across different formats
#[derive(Parser, Debug, Clone)]
#[command(
    name = "msgsize",
    about = "Analyze serialization message sizes across different formats",
    version
)]
pub struct Settings {
    /// Directory containing JSONL message logs
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Show the size distribution for each message type
    #[arg(long)]
    pub detailed: bool,

    /// Export per-type statistics to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Baseline format for the head-to-head comparison
    #[arg(long, default_value = "protobuf")]
    pub baseline: String,

    /// Challenger format for the head-to-head comparison
    #[arg(long, default_value = "symphony")]
    pub challenger: String,

    /// Variant format compared against the challenger
    #[arg(long, default_value = "symphony_hybrid")]
    pub variant: String,

    /// Recognised formats, in report order (comma separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_FORMATS.map(String::from)
    )]
    pub formats: Vec<String>,

    /// Ranked entries that receive structural commentary
    #[arg(
        long,
        default_value_t = DEFAULT_TOP_N,
        value_parser = clap::value_parser!(u64).range(1..=1000).map(|v| v as usize)
    )]
    pub top: usize,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Build the value passed to the analysis and report layers.
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let config = AnalysisConfig {
            formats: self.formats.clone(),
            baseline: self.baseline.clone(),
            challenger: self.challenger.clone(),
            variant: self.variant.clone(),
            top_n: self.top,
            detailed: self.detailed,
        };
        config.validate()?;
        Ok(config)
    }
}

// ── AnalysisConfig ─────────────────────────────────────────────────────────────

/// Explicit analysis parameters, handed to every component that needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Recognised format names in display order.
    pub formats: Vec<String>,
    pub baseline: String,
    pub challenger: String,
    pub variant: String,
    pub top_n: usize,
    pub detailed: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            formats: DEFAULT_FORMATS.map(String::from).to_vec(),
            baseline: "protobuf".to_string(),
            challenger: "symphony".to_string(),
            variant: "symphony_hybrid".to_string(),
            top_n: DEFAULT_TOP_N,
            detailed: false,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.formats.iter().all(|f| f.trim().is_empty()) {
            return Err(AnalyzerError::Config(
                "at least one format must be listed".to_string(),
            ));
        }
        if self.baseline == self.challenger {
            return Err(AnalyzerError::Config(format!(
                "baseline and challenger are both `{}`",
                self.baseline
            )));
        }
        if self.top_n == 0 {
            return Err(AnalyzerError::Config("top must be at least 1".to_string()));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! Serializable export of every aggregate's per-format statistics.
//!
//! The document is a JSON object keyed by `"{message_type}_{direction}"`:
//!
//! ```json
//! {
//!   "SearchRequest_outbound": {
//!     "message_type": "SearchRequest",
//!     "direction": "outbound",
//!     "formats": {
//!       "protobuf": {"count": 2, "total": 200, "mean": 100.0, "median": 100.0,
//!                    "min": 100, "max": 100, "stdev": 0.0}
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateSet;
use crate::error::Result;
use crate::models::Direction;
use crate::stats::FormatSummary;

/// One exported (message type, direction) entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub message_type: String,
    pub direction: Direction,
    pub formats: BTreeMap<String, FormatSummary>,
}

/// The full export document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportDocument {
    pub entries: BTreeMap<String, ExportEntry>,
}

impl ExportDocument {
    /// Snapshot the statistics of every aggregate.
    pub fn from_aggregates(aggregates: &AggregateSet) -> Self {
        let entries = aggregates
            .iter()
            .map(|(key, aggregate)| {
                let formats = aggregate
                    .formats()
                    .iter()
                    .map(|(format, stats)| (format.clone(), stats.summary()))
                    .collect();
                (
                    key.to_string(),
                    ExportEntry {
                        message_type: key.message_type.clone(),
                        direction: key.direction,
                        formats,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

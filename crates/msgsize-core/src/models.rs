use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AnalyzerError, Result};

/// Which way a logged message travelled relative to the logging client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Received by the logging side (responses).
    Inbound,
    /// Sent by the logging side (requests).
    Outbound,
    /// Missing or unrecognised direction tag.
    Unknown,
}

impl Direction {
    /// Map a raw log tag to a direction.
    ///
    /// The message logger writes `"request"` / `"response"`; shorter forms
    /// such as `"out"` and `"in"` are accepted too. Anything else is
    /// [`Direction::Unknown`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "request" | "out" | "outbound" | "send" | "sent" => Direction::Outbound,
            "response" | "in" | "inbound" | "recv" | "received" => Direction::Inbound,
            _ => Direction::Unknown,
        }
    }

    /// Lowercase label used in keys, reports and the export document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
            Direction::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed byte size for one format instance of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeSample {
    pub message_type: String,
    pub direction: Direction,
    pub format: String,
    pub byte_size: u64,
}

/// Composite grouping key: one message type travelling in one direction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AggregateKey {
    pub message_type: String,
    pub direction: Direction,
}

impl AggregateKey {
    pub fn new(message_type: impl Into<String>, direction: Direction) -> Self {
        Self {
            message_type: message_type.into(),
            direction,
        }
    }
}

/// Renders as `"{message_type}_{direction}"`, the export document key.
impl fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.message_type, self.direction)
    }
}

/// Largest byte size accepted from a log line (4 GiB). Larger entries are
/// rejected at ingestion with the other unusable sizes.
pub const MAX_BYTE_SIZE: u64 = u32::MAX as u64;

/// A single validated log line: the sizes of one message under every format
/// that serialized it successfully, plus the message payload itself.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub message_type: String,
    pub direction: Direction,
    /// Format name → serialized byte size.
    pub sizes: BTreeMap<String, u64>,
    /// The logged payload; an empty object when the line carried none.
    pub payload: serde_json::Value,
    /// Name of the file the record was read from, when known.
    pub source: Option<String>,
    /// How many `sizes` entries were dropped because they were not
    /// non-negative integers up to [`MAX_BYTE_SIZE`] (failed serializations,
    /// error maps).
    pub rejected_sizes: usize,
}

impl MessageRecord {
    /// Validate a raw JSON log line.
    ///
    /// Fails when `message_type` or `sizes` is absent or has the wrong
    /// type; such records are not applicable to the analysis. Individual
    /// size entries that are negative, non-numeric or above
    /// [`MAX_BYTE_SIZE`] are dropped and counted
    /// in [`MessageRecord::rejected_sizes`] rather than failing the record.
    pub fn from_json(data: &serde_json::Value) -> Result<Self> {
        let message_type = match data.get("message_type") {
            None | Some(serde_json::Value::Null) => {
                return Err(AnalyzerError::MissingField("message_type"))
            }
            Some(v) => v
                .as_str()
                .ok_or_else(|| AnalyzerError::InvalidField {
                    field: "message_type",
                    reason: "expected a string".to_string(),
                })?
                .to_string(),
        };

        let raw_sizes = match data.get("sizes") {
            None | Some(serde_json::Value::Null) => {
                return Err(AnalyzerError::MissingField("sizes"))
            }
            Some(v) => v.as_object().ok_or_else(|| AnalyzerError::InvalidField {
                field: "sizes",
                reason: "expected an object".to_string(),
            })?,
        };

        let mut sizes = BTreeMap::new();
        let mut rejected_sizes = 0usize;
        for (format, value) in raw_sizes {
            match value.as_u64().filter(|&size| size <= MAX_BYTE_SIZE) {
                Some(size) => {
                    sizes.insert(format.clone(), size);
                }
                None => rejected_sizes += 1,
            }
        }

        let direction = data
            .get("direction")
            .and_then(|v| v.as_str())
            .map(Direction::parse)
            .unwrap_or(Direction::Unknown);

        let payload = match data.get("payload") {
            None | Some(serde_json::Value::Null) => serde_json::Value::Object(Default::default()),
            Some(v) => v.clone(),
        };

        Ok(Self {
            message_type,
            direction,
            sizes,
            payload,
            source: None,
            rejected_sizes,
        })
    }

    /// Attach the originating file name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The grouping key this record belongs to.
    pub fn key(&self) -> AggregateKey {
        AggregateKey::new(self.message_type.clone(), self.direction)
    }

    /// One [`SizeSample`] per format in this record, ordered by format name.
    pub fn samples(&self) -> impl Iterator<Item = SizeSample> + '_ {
        self.sizes.iter().map(move |(format, &byte_size)| SizeSample {
            message_type: self.message_type.clone(),
            direction: self.direction,
            format: format.clone(),
            byte_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Direction ─────────────────────────────────────────────────────────────

    #[test]
    fn test_direction_parse_logger_tags() {
        assert_eq!(Direction::parse("request"), Direction::Outbound);
        assert_eq!(Direction::parse("response"), Direction::Inbound);
    }

    #[test]
    fn test_direction_parse_short_forms() {
        assert_eq!(Direction::parse("out"), Direction::Outbound);
        assert_eq!(Direction::parse("IN"), Direction::Inbound);
        assert_eq!(Direction::parse(" sent "), Direction::Outbound);
    }

    #[test]
    fn test_direction_parse_unknown() {
        assert_eq!(Direction::parse("sideways"), Direction::Unknown);
        assert_eq!(Direction::parse(""), Direction::Unknown);
    }

    #[test]
    fn test_direction_serde_lowercase() {
        let s = serde_json::to_string(&Direction::Outbound).unwrap();
        assert_eq!(s, "\"outbound\"");
        let d: Direction = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(d, Direction::Unknown);
    }

    // ── AggregateKey ──────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_key_display() {
        let key = AggregateKey::new("SearchRequest", Direction::Outbound);
        assert_eq!(key.to_string(), "SearchRequest_outbound");
    }

    #[test]
    fn test_aggregate_key_ordering_by_type_then_direction() {
        let mut keys = vec![
            AggregateKey::new("B", Direction::Inbound),
            AggregateKey::new("A", Direction::Outbound),
            AggregateKey::new("A", Direction::Inbound),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["A_inbound", "A_outbound", "B_inbound"]);
    }

    // ── MessageRecord::from_json ──────────────────────────────────────────────

    #[test]
    fn test_record_from_json_basic() {
        let data = json!({
            "timestamp": "2025-01-10T12:00:00Z",
            "direction": "request",
            "method": "/search.Search/Nearby",
            "message_type": "NearbyRequest",
            "sizes": {"protobuf": 42, "symphony": 38},
            "payload": {"lat": 37.7, "lon": -122.4},
        });
        let record = MessageRecord::from_json(&data).unwrap();

        assert_eq!(record.message_type, "NearbyRequest");
        assert_eq!(record.direction, Direction::Outbound);
        assert_eq!(record.sizes.get("protobuf"), Some(&42));
        assert_eq!(record.sizes.get("symphony"), Some(&38));
        assert_eq!(record.payload["lat"], json!(37.7));
        assert_eq!(record.rejected_sizes, 0);
        assert!(record.source.is_none());
    }

    #[test]
    fn test_record_from_json_missing_message_type() {
        let data = json!({"sizes": {"protobuf": 1}});
        let err = MessageRecord::from_json(&data).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingField("message_type")));
    }

    #[test]
    fn test_record_from_json_missing_sizes() {
        let data = json!({"message_type": "Foo"});
        let err = MessageRecord::from_json(&data).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingField("sizes")));
    }

    #[test]
    fn test_record_from_json_sizes_not_object() {
        let data = json!({"message_type": "Foo", "sizes": [1, 2]});
        let err = MessageRecord::from_json(&data).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidField { field: "sizes", .. }));
    }

    #[test]
    fn test_record_from_json_rejects_failed_and_error_entries() {
        let data = json!({
            "message_type": "Foo",
            "sizes": {
                "protobuf": 10,
                "flatbuffers": -1,
                "errors": {"flatbuffers": "unsupported type"},
            },
        });
        let record = MessageRecord::from_json(&data).unwrap();
        assert_eq!(record.sizes.len(), 1);
        assert_eq!(record.sizes.get("protobuf"), Some(&10));
        assert_eq!(record.rejected_sizes, 2);
    }

    #[test]
    fn test_record_from_json_rejects_oversized_entries() {
        let data = json!({
            "message_type": "Foo",
            "sizes": {
                "protobuf": 9_223_372_036_854_775_808u64,
                "symphony": MAX_BYTE_SIZE,
                "capnproto": MAX_BYTE_SIZE + 1,
            },
        });
        let record = MessageRecord::from_json(&data).unwrap();
        assert_eq!(record.sizes.len(), 1);
        assert_eq!(record.sizes.get("symphony"), Some(&MAX_BYTE_SIZE));
        assert_eq!(record.rejected_sizes, 2);
    }

    #[test]
    fn test_record_from_json_non_string_message_type() {
        let data = json!({"message_type": 42, "sizes": {"protobuf": 1}});
        let err = MessageRecord::from_json(&data).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::InvalidField {
                field: "message_type",
                ..
            }
        ));
    }

    #[test]
    fn test_record_from_json_non_string_direction_is_unknown() {
        for direction in [json!(1), json!(true), json!({"dir": "out"})] {
            let data = json!({
                "message_type": "Foo",
                "direction": direction,
                "sizes": {"protobuf": 1},
            });
            let record = MessageRecord::from_json(&data).unwrap();
            assert_eq!(record.direction, Direction::Unknown);
        }
    }

    #[test]
    fn test_record_from_json_defaults() {
        let data = json!({"message_type": "Foo", "sizes": {}});
        let record = MessageRecord::from_json(&data).unwrap();
        assert_eq!(record.direction, Direction::Unknown);
        assert_eq!(record.payload, json!({}));
    }

    #[test]
    fn test_record_samples_carry_key() {
        let data = json!({
            "message_type": "Search",
            "direction": "out",
            "sizes": {"pb": 100, "sym": 80},
        });
        let record = MessageRecord::from_json(&data).unwrap().with_source("a.jsonl");
        let samples: Vec<SizeSample> = record.samples().collect();

        assert_eq!(record.source.as_deref(), Some("a.jsonl"));
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].format, "pb");
        assert_eq!(samples[0].byte_size, 100);
        assert_eq!(samples[1].format, "sym");
        assert!(samples
            .iter()
            .all(|s| s.message_type == "Search" && s.direction == Direction::Outbound));
    }
}

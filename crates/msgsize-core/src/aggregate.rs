//! Grouping of size samples by message type and direction.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{AggregateKey, MessageRecord, SizeSample};
use crate::stats::FormatStatistics;

/// Maximum number of payloads kept per aggregate for structural analysis.
///
/// A sampling bound for structural analysis only. The first payloads seen
/// are kept and later ones dropped, with no replacement. Size statistics
/// always include every record.
pub const PAYLOAD_SAMPLE_CAP: usize = 100;

// ── MessageTypeAggregate ──────────────────────────────────────────────────────

/// All formats' statistics for one (message type, direction) pair, plus a
/// bounded sample of representative payloads and the files that fed it.
#[derive(Debug, Clone)]
pub struct MessageTypeAggregate {
    key: AggregateKey,
    formats: BTreeMap<String, FormatStatistics>,
    payloads: Vec<serde_json::Value>,
    sources: BTreeSet<String>,
}

impl MessageTypeAggregate {
    pub fn new(key: AggregateKey) -> Self {
        Self {
            key,
            formats: BTreeMap::new(),
            payloads: Vec::new(),
            sources: BTreeSet::new(),
        }
    }

    pub fn key(&self) -> &AggregateKey {
        &self.key
    }

    pub fn message_type(&self) -> &str {
        &self.key.message_type
    }

    /// Route every (format, size) pair into its format's statistics, creating
    /// them on first use, and keep `payload` if the sample is not yet full.
    pub fn record<'a, I>(&mut self, format_to_size: I, payload: serde_json::Value)
    where
        I: IntoIterator<Item = (&'a String, &'a u64)>,
    {
        for (format, &size) in format_to_size {
            self.stats_mut(format).add(size);
        }
        self.retain_payload(payload);
    }

    /// Keep `payload` when fewer than [`PAYLOAD_SAMPLE_CAP`] are stored.
    /// Returns whether it was kept.
    pub fn retain_payload(&mut self, payload: serde_json::Value) -> bool {
        if self.payloads.len() < PAYLOAD_SAMPLE_CAP {
            self.payloads.push(payload);
            true
        } else {
            false
        }
    }

    /// Statistics for `format`, or `None` if no sample for it was recorded.
    pub fn format(&self, format: &str) -> Option<&FormatStatistics> {
        self.formats.get(format)
    }

    /// All formats in name order.
    pub fn formats(&self) -> &BTreeMap<String, FormatStatistics> {
        &self.formats
    }

    /// Stored payload samples, oldest first.
    pub fn payloads(&self) -> &[serde_json::Value] {
        &self.payloads
    }

    /// Names of the log files whose records were folded in, sorted.
    pub fn sources(&self) -> &BTreeSet<String> {
        &self.sources
    }

    /// The first stored payload, used as the representative for commentary.
    pub fn representative_payload(&self) -> Option<&serde_json::Value> {
        self.payloads.first()
    }

    /// Fold `other` into `self`: sizes are concatenated per format, sources
    /// are unioned and the payload sample is re-capped, keeping `self`'s
    /// payloads first.
    pub fn merge(&mut self, other: MessageTypeAggregate) {
        for (format, stats) in &other.formats {
            self.stats_mut(format).merge(stats);
        }
        self.sources.extend(other.sources);
        for payload in other.payloads {
            if !self.retain_payload(payload) {
                break;
            }
        }
    }

    fn stats_mut(&mut self, format: &str) -> &mut FormatStatistics {
        self.formats.entry(format.to_string()).or_default()
    }
}

// ── AggregateSet ──────────────────────────────────────────────────────────────

/// Owned mapping from composite key to its aggregate, sorted by key.
#[derive(Debug, Clone, Default)]
pub struct AggregateSet {
    aggregates: BTreeMap<AggregateKey, MessageTypeAggregate>,
}

impl AggregateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the aggregate for `key`, creating an empty one if absent.
    pub fn get_or_create(&mut self, key: AggregateKey) -> &mut MessageTypeAggregate {
        self.aggregates
            .entry(key.clone())
            .or_insert_with(|| MessageTypeAggregate::new(key))
    }

    /// Fold one validated record into its aggregate, noting its source file
    /// when the record carries one.
    pub fn ingest(&mut self, record: MessageRecord) {
        let aggregate = self.get_or_create(record.key());
        aggregate.record(&record.sizes, record.payload);
        if let Some(source) = record.source {
            aggregate.sources.insert(source);
        }
    }

    /// Fold one bare size sample into the aggregate for the sample's own key.
    pub fn add_sample(&mut self, sample: &SizeSample) {
        let key = AggregateKey::new(sample.message_type.clone(), sample.direction);
        self.get_or_create(key)
            .stats_mut(&sample.format)
            .add(sample.byte_size);
    }

    /// Merge a partition into this set. Payload samples from `self` are
    /// kept ahead of `other`'s, so merging partitions in input order gives
    /// the same payload sample as a single sequential pass.
    pub fn merge(&mut self, other: AggregateSet) {
        for (key, aggregate) in other.aggregates {
            match self.aggregates.get_mut(&key) {
                Some(existing) => existing.merge(aggregate),
                None => {
                    self.aggregates.insert(key, aggregate);
                }
            }
        }
    }

    pub fn get(&self, key: &AggregateKey) -> Option<&MessageTypeAggregate> {
        self.aggregates.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AggregateKey, &MessageTypeAggregate)> {
        self.aggregates.iter()
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    /// Sorted union of every format name seen in any aggregate.
    pub fn formats_seen(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self
            .aggregates
            .values()
            .flat_map(|a| a.formats.keys())
            .collect();
        set.into_iter().cloned().collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use serde_json::json;

    fn make_record(
        message_type: &str,
        direction: &str,
        sizes: serde_json::Value,
        payload: serde_json::Value,
    ) -> MessageRecord {
        MessageRecord::from_json(&json!({
            "message_type": message_type,
            "direction": direction,
            "sizes": sizes,
            "payload": payload,
        }))
        .unwrap()
    }

    fn sizes(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(f, s)| (f.to_string(), *s)).collect()
    }

    // ── MessageTypeAggregate ──────────────────────────────────────────────────

    #[test]
    fn test_record_creates_formats_lazily() {
        let mut agg = MessageTypeAggregate::new(AggregateKey::new("Search", Direction::Outbound));
        assert!(agg.format("pb").is_none());

        agg.record(&sizes(&[("pb", 100), ("sym", 80)]), json!({}));
        agg.record(&sizes(&[("pb", 100)]), json!({}));

        assert_eq!(agg.format("pb").unwrap().count(), 2);
        assert_eq!(agg.format("sym").unwrap().count(), 1);
        assert_eq!(agg.formats().len(), 2);
    }

    #[test]
    fn test_payload_sample_keeps_first_hundred() {
        let mut agg = MessageTypeAggregate::new(AggregateKey::new("Search", Direction::Outbound));
        for i in 0..150u64 {
            agg.record(&sizes(&[("pb", i)]), json!({"seq": i}));
        }

        assert_eq!(agg.payloads().len(), PAYLOAD_SAMPLE_CAP);
        assert_eq!(agg.payloads()[0], json!({"seq": 0}));
        assert_eq!(agg.payloads()[99], json!({"seq": 99}));
        assert!(!agg.payloads().contains(&json!({"seq": 100})));
        assert!(!agg.payloads().contains(&json!({"seq": 149})));

        let pb = agg.format("pb").unwrap();
        assert_eq!(pb.count(), 150);
        assert_eq!(pb.total(), (0..150u64).sum::<u64>());
    }

    #[test]
    fn test_representative_payload_is_first() {
        let mut agg = MessageTypeAggregate::new(AggregateKey::new("Search", Direction::Outbound));
        assert!(agg.representative_payload().is_none());
        agg.record(&sizes(&[("pb", 1)]), json!({"first": true}));
        agg.record(&sizes(&[("pb", 1)]), json!({"first": false}));
        assert_eq!(agg.representative_payload(), Some(&json!({"first": true})));
    }

    #[test]
    fn test_add_sample_files_under_sample_key() {
        let mut set = AggregateSet::new();
        set.ingest(make_record("Geo", "response", json!({"pb": 10}), json!({})));
        set.add_sample(&SizeSample {
            message_type: "Geo".to_string(),
            direction: Direction::Outbound,
            format: "capnproto".to_string(),
            byte_size: 64,
        });

        let inbound = set.get(&AggregateKey::new("Geo", Direction::Inbound)).unwrap();
        assert!(inbound.format("capnproto").is_none());

        let outbound = set.get(&AggregateKey::new("Geo", Direction::Outbound)).unwrap();
        assert_eq!(outbound.format("capnproto").unwrap().total(), 64);
        assert!(outbound.payloads().is_empty());
    }

    // ── AggregateSet ──────────────────────────────────────────────────────────

    #[test]
    fn test_ingest_groups_by_type_and_direction() {
        let mut set = AggregateSet::new();
        set.ingest(make_record("Search", "request", json!({"pb": 10}), json!({})));
        set.ingest(make_record("Search", "request", json!({"pb": 20}), json!({})));
        set.ingest(make_record("Search", "response", json!({"pb": 30}), json!({})));
        set.ingest(make_record("Geo", "request", json!({"pb": 40}), json!({})));

        assert_eq!(set.len(), 3);
        let key = AggregateKey::new("Search", Direction::Outbound);
        let agg = set.get(&key).unwrap();
        assert_eq!(agg.format("pb").unwrap().count(), 2);
        assert!(set.iter().all(|(k, a)| k == a.key()));
    }

    #[test]
    fn test_ingest_150_records_bounded_sample() {
        let mut set = AggregateSet::new();
        for i in 0..150u64 {
            set.ingest(make_record("Search", "out", json!({"pb": 100, "sym": i}), json!({"i": i})));
        }
        let agg = set.get(&AggregateKey::new("Search", Direction::Outbound)).unwrap();
        assert_eq!(agg.payloads().len(), 100);
        assert!(agg.payloads().iter().all(|p| p["i"].as_u64().unwrap() < 100));
        assert_eq!(agg.format("pb").unwrap().count(), 150);
        assert_eq!(agg.format("pb").unwrap().total(), 15_000);
        assert_eq!(agg.format("sym").unwrap().total(), (0..150u64).sum::<u64>());
    }

    #[test]
    fn test_formats_seen_sorted_union() {
        let mut set = AggregateSet::new();
        set.ingest(make_record("A", "out", json!({"symphony": 1, "protobuf": 2}), json!({})));
        set.ingest(make_record("B", "out", json!({"capnproto": 3, "protobuf": 4}), json!({})));
        assert_eq!(set.formats_seen(), vec!["capnproto", "protobuf", "symphony"]);
    }

    #[test]
    fn test_merge_sums_counts_and_recaps_payloads() {
        let mut left = AggregateSet::new();
        let mut right = AggregateSet::new();
        for i in 0..80u64 {
            left.ingest(make_record("Search", "out", json!({"pb": 10}), json!({"side": "left", "i": i})));
            right.ingest(make_record("Search", "out", json!({"pb": 30}), json!({"side": "right", "i": i})));
        }
        right.ingest(make_record("Geo", "out", json!({"pb": 5}), json!({})));

        left.merge(right);

        assert_eq!(left.len(), 2);
        let agg = left.get(&AggregateKey::new("Search", Direction::Outbound)).unwrap();
        let pb = agg.format("pb").unwrap();
        assert_eq!(pb.count(), 160);
        assert_eq!(pb.total(), 80 * 10 + 80 * 30);
        assert_eq!(agg.payloads().len(), PAYLOAD_SAMPLE_CAP);
        assert!(agg.payloads()[..80].iter().all(|p| p["side"] == "left"));
        assert!(agg.payloads()[80..].iter().all(|p| p["side"] == "right"));
        assert_eq!(agg.payloads()[99], json!({"side": "right", "i": 19}));
    }

    #[test]
    fn test_ingest_tracks_sources_and_merge_unions_them() {
        let mut left = AggregateSet::new();
        let mut right = AggregateSet::new();
        left.ingest(make_record("Search", "out", json!({"pb": 1}), json!({})).with_source("b.jsonl"));
        left.ingest(make_record("Search", "out", json!({"pb": 1}), json!({})));
        right.ingest(make_record("Search", "out", json!({"pb": 1}), json!({})).with_source("a.jsonl"));
        right.ingest(make_record("Search", "out", json!({"pb": 1}), json!({})).with_source("b.jsonl"));

        left.merge(right);

        let agg = left.get(&AggregateKey::new("Search", Direction::Outbound)).unwrap();
        let sources: Vec<&str> = agg.sources().iter().map(String::as_str).collect();
        assert_eq!(sources, vec!["a.jsonl", "b.jsonl"]);
        assert_eq!(agg.format("pb").unwrap().count(), 4);
    }

    #[test]
    fn test_add_sample_creates_aggregate() {
        let mut set = AggregateSet::new();
        set.add_sample(&SizeSample {
            message_type: "Rate".to_string(),
            direction: Direction::Unknown,
            format: "protobuf".to_string(),
            byte_size: 12,
        });
        let agg = set.get(&AggregateKey::new("Rate", Direction::Unknown)).unwrap();
        assert_eq!(agg.format("protobuf").unwrap().count(), 1);
    }
}

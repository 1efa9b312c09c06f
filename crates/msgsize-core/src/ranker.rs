//! Head-to-head comparison of two formats across every message type.
//!
//! The ranker classifies each (message type, direction) key as a win for the
//! challenger, a win for the baseline, or a tie, ranks the wins by relative
//! size difference, and attaches a structural hypothesis to the top entries
//! based on the shape of a representative payload.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateSet;
use crate::models::{AggregateKey, Direction};
use crate::shape::{PayloadShapeAnalyzer, PayloadShapeDescriptor};

/// Number of ranked entries that receive structural commentary by default.
pub const DEFAULT_TOP_N: usize = 10;

// Decision-table thresholds. Fixed design constants, not runtime settings.
const FLAT_FIELD_LIMIT: usize = 3;
const SMALL_ARRAY_LIMIT: usize = 2;
const LARGE_STRING_BYTES: usize = 100;
const DEEP_NESTING_OBJECTS: usize = 3;
const LARGE_ARRAY_LENGTH: usize = 3;

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Which format produced the smaller mean size for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    ChallengerWins,
    BaselineWins,
    Tie,
}

impl Outcome {
    fn classify(baseline_mean: f64, challenger_mean: f64) -> Self {
        if challenger_mean < baseline_mean {
            Outcome::ChallengerWins
        } else if baseline_mean < challenger_mean {
            Outcome::BaselineWins
        } else {
            Outcome::Tie
        }
    }
}

// ── ComparisonResult ──────────────────────────────────────────────────────────

/// Baseline vs challenger means for one (message type, direction) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub message_type: String,
    pub direction: Direction,
    pub baseline_format: String,
    pub challenger_format: String,
    pub baseline_mean: f64,
    pub challenger_mean: f64,
    pub outcome: Outcome,
    /// `baseline_mean - challenger_mean`; positive when the challenger is
    /// smaller.
    pub delta_bytes: f64,
    /// `delta_bytes` as a percentage of `baseline_mean`; 0 when the baseline
    /// mean is 0.
    pub delta_percent: f64,
}

impl ComparisonResult {
    fn new(
        key: &AggregateKey,
        baseline_format: &str,
        challenger_format: &str,
        baseline_mean: f64,
        challenger_mean: f64,
    ) -> Self {
        let delta_bytes = baseline_mean - challenger_mean;
        let delta_percent = if baseline_mean > 0.0 {
            delta_bytes / baseline_mean * 100.0
        } else {
            0.0
        };
        Self {
            message_type: key.message_type.clone(),
            direction: key.direction,
            baseline_format: baseline_format.to_string(),
            challenger_format: challenger_format.to_string(),
            baseline_mean,
            challenger_mean,
            outcome: Outcome::classify(baseline_mean, challenger_mean),
            delta_bytes,
            delta_percent,
        }
    }

    pub fn key(&self) -> AggregateKey {
        AggregateKey::new(self.message_type.clone(), self.direction)
    }

    /// Extra bytes the challenger costs, relative to the baseline, in percent.
    pub fn overhead_percent(&self) -> f64 {
        -self.delta_percent
    }
}

// ── StructuralHypothesis ──────────────────────────────────────────────────────

/// Rule-based explanation linking payload shape to a size difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralHypothesis {
    MinimalFraming,
    NumericEncoding,
    CompactSmallArrays,
    LengthPrefixedStrings,
    SchemaDrivenNesting,
    RepeatedFieldArrays,
}

impl StructuralHypothesis {
    /// Evaluate the decision table for `outcome`; first matching row wins.
    ///
    /// Challenger wins are checked against the framing, numeric and
    /// small-array rows; baseline wins against the string, nesting and
    /// large-array rows. Ties never produce a hypothesis.
    pub fn infer(outcome: Outcome, shape: &PayloadShapeDescriptor) -> Option<Self> {
        match outcome {
            Outcome::ChallengerWins => {
                if shape.field_count <= FLAT_FIELD_LIMIT && !shape.has_arrays() {
                    Some(Self::MinimalFraming)
                } else if shape.string_byte_total == 0 && shape.field_count > 0 {
                    Some(Self::NumericEncoding)
                } else if shape
                    .max_array_length()
                    .is_some_and(|len| len <= SMALL_ARRAY_LIMIT)
                {
                    Some(Self::CompactSmallArrays)
                } else {
                    None
                }
            }
            Outcome::BaselineWins => {
                if shape.string_byte_total > LARGE_STRING_BYTES {
                    Some(Self::LengthPrefixedStrings)
                } else if shape.nested_object_count > DEEP_NESTING_OBJECTS {
                    Some(Self::SchemaDrivenNesting)
                } else if shape
                    .max_array_length()
                    .is_some_and(|len| len > LARGE_ARRAY_LENGTH)
                {
                    Some(Self::RepeatedFieldArrays)
                } else {
                    None
                }
            }
            Outcome::Tie => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::MinimalFraming => "minimal framing overhead dominates",
            Self::NumericEncoding => "numeric-only encoding efficiency dominates",
            Self::CompactSmallArrays => "compact small-array encoding dominates",
            Self::LengthPrefixedStrings => "length-prefixed string encoding favors the baseline",
            Self::SchemaDrivenNesting => "schema-driven encoding favors deep nesting",
            Self::RepeatedFieldArrays => "repeated-field encoding favors large arrays",
        }
    }
}

impl fmt::Display for StructuralHypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

// ── Ranking ───────────────────────────────────────────────────────────────────

/// Comparison results split by outcome and ordered for reporting.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Descending by `delta_percent` (largest savings first).
    pub challenger_wins: Vec<ComparisonResult>,
    /// Descending by overhead percent (largest challenger overhead first).
    pub baseline_wins: Vec<ComparisonResult>,
    /// Equal means, in key order.
    pub ties: Vec<ComparisonResult>,
}

/// A ranked entry paired with the shape of its representative payload.
#[derive(Debug, Clone)]
pub struct StructuralCommentary {
    pub result: ComparisonResult,
    /// `None` when the aggregate stored no payload.
    pub shape: Option<PayloadShapeDescriptor>,
    pub hypothesis: Option<StructuralHypothesis>,
}

// ── ComparativeRanker ─────────────────────────────────────────────────────────

/// Compares a baseline format against a challenger format.
#[derive(Debug, Clone)]
pub struct ComparativeRanker {
    baseline: String,
    challenger: String,
    top_n: usize,
}

impl ComparativeRanker {
    pub fn new(baseline: impl Into<String>, challenger: impl Into<String>) -> Self {
        Self {
            baseline: baseline.into(),
            challenger: challenger.into(),
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Override how many ranked entries receive commentary.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn challenger(&self) -> &str {
        &self.challenger
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Compare the baseline format from `baseline_set` with the challenger
    /// format from `challenger_set`.
    ///
    /// One result is produced per key present in both sets where the baseline
    /// has at least one sample and the challenger format exists. Keys lacking
    /// either format are not applicable and are skipped. Results are in key
    /// order.
    pub fn compare(
        &self,
        baseline_set: &AggregateSet,
        challenger_set: &AggregateSet,
    ) -> Vec<ComparisonResult> {
        baseline_set
            .iter()
            .filter_map(|(key, aggregate)| {
                let baseline = aggregate.format(&self.baseline)?;
                if baseline.is_empty() {
                    return None;
                }
                let challenger = challenger_set.get(key)?.format(&self.challenger)?;
                Some(ComparisonResult::new(
                    key,
                    &self.baseline,
                    &self.challenger,
                    baseline.mean(),
                    challenger.mean(),
                ))
            })
            .collect()
    }

    /// Compare both formats within a single set of aggregates.
    pub fn compare_within(&self, aggregates: &AggregateSet) -> Vec<ComparisonResult> {
        self.compare(aggregates, aggregates)
    }

    /// Split `results` by outcome and sort each group for reporting.
    pub fn rank(&self, results: Vec<ComparisonResult>) -> Ranking {
        let mut ranking = Ranking::default();
        for result in results {
            match result.outcome {
                Outcome::ChallengerWins => ranking.challenger_wins.push(result),
                Outcome::BaselineWins => ranking.baseline_wins.push(result),
                Outcome::Tie => ranking.ties.push(result),
            }
        }
        ranking
            .challenger_wins
            .sort_by(|a, b| descending(a.delta_percent, b.delta_percent));
        ranking
            .baseline_wins
            .sort_by(|a, b| descending(a.overhead_percent(), b.overhead_percent()));
        ranking
    }

    /// Pair the first `top_n` of `ranked` with the shape of their first
    /// stored payload from `aggregates` and the matching hypothesis.
    pub fn explain(
        &self,
        ranked: &[ComparisonResult],
        aggregates: &AggregateSet,
    ) -> Vec<StructuralCommentary> {
        ranked
            .iter()
            .take(self.top_n)
            .map(|result| {
                let shape = aggregates
                    .get(&result.key())
                    .and_then(|a| a.representative_payload())
                    .map(PayloadShapeAnalyzer::analyze);
                let hypothesis = shape
                    .as_ref()
                    .and_then(|s| StructuralHypothesis::infer(result.outcome, s));
                StructuralCommentary {
                    result: result.clone(),
                    shape,
                    hypothesis,
                }
            })
            .collect()
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

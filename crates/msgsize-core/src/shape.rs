//! Format-independent structural description of a message payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type tag of a payload's top-level value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl PayloadKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => PayloadKind::Object,
            Value::Array(_) => PayloadKind::Array,
            Value::String(_) => PayloadKind::String,
            Value::Number(_) => PayloadKind::Number,
            Value::Bool(_) => PayloadKind::Boolean,
            Value::Null => PayloadKind::Null,
        }
    }
}

/// Structural counts for one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadShapeDescriptor {
    pub kind: PayloadKind,
    /// Direct fields of the top-level object only.
    pub field_count: usize,
    /// UTF-8 bytes of every string value at any depth.
    pub string_byte_total: usize,
    /// Length of every array at any depth, in discovery order.
    pub array_lengths: Vec<usize>,
    /// Objects nested under the top level, counted recursively.
    pub nested_object_count: usize,
}

impl PayloadShapeDescriptor {
    fn empty(kind: PayloadKind) -> Self {
        Self {
            kind,
            field_count: 0,
            string_byte_total: 0,
            array_lengths: Vec::new(),
            nested_object_count: 0,
        }
    }

    pub fn has_arrays(&self) -> bool {
        !self.array_lengths.is_empty()
    }

    /// Longest array seen, or `None` when the payload holds no arrays.
    pub fn max_array_length(&self) -> Option<usize> {
        self.array_lengths.iter().copied().max()
    }
}

/// Stateless recursive walker producing [`PayloadShapeDescriptor`]s.
///
/// Payloads come from parsed JSON and are therefore trees; there is no
/// depth limit.
pub struct PayloadShapeAnalyzer;

impl PayloadShapeAnalyzer {
    /// Describe `payload`.
    ///
    /// Non-object payloads are valid and yield a descriptor tagged with their
    /// kind and all counts at zero.
    pub fn analyze(payload: &Value) -> PayloadShapeDescriptor {
        let Value::Object(fields) = payload else {
            return PayloadShapeDescriptor::empty(PayloadKind::of(payload));
        };

        let mut shape = PayloadShapeDescriptor::empty(PayloadKind::Object);
        shape.field_count = fields.len();
        for value in fields.values() {
            Self::walk(value, &mut shape);
        }
        shape
    }

    fn walk(value: &Value, shape: &mut PayloadShapeDescriptor) {
        match value {
            Value::String(s) => shape.string_byte_total += s.len(),
            Value::Array(items) => {
                shape.array_lengths.push(items.len());
                for item in items {
                    Self::walk(item, shape);
                }
            }
            Value::Object(fields) => {
                shape.nested_object_count += 1;
                for child in fields.values() {
                    Self::walk(child, shape);
                }
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }
}

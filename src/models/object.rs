//! Object record model for the collection API passthrough schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single museum object as returned by the collection API.
///
/// The API schema is treated as opaque: the record keeps every field the
/// upstream sent and serializes back to the exact same JSON. Typed
/// accessors exist only for the handful of fields the query pipeline
/// consumes (`objectID`, the image fields, `classification`,
/// `objectBeginDate`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRecord(Map<String, Value>);

impl ObjectRecord {
    /// Deserialize a record from an arbitrary JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Raw access to any field of the record.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The upstream `objectID`, if present.
    pub fn object_id(&self) -> Option<u64> {
        self.0.get("objectID").and_then(Value::as_u64)
    }

    /// The `classification` field, or `None` when absent or empty.
    pub fn classification(&self) -> Option<&str> {
        self.0
            .get("classification")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Whether the record carries at least one image signal:
    /// a non-empty `primaryImage` or `primaryImageSmall` URL, or a
    /// non-empty `additionalImages` array.
    pub fn has_image(&self) -> bool {
        let non_empty_str = |field: &str| {
            self.0
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty())
        };

        non_empty_str("primaryImage")
            || non_empty_str("primaryImageSmall")
            || self
                .0
                .get("additionalImages")
                .and_then(Value::as_array)
                .is_some_and(|images| !images.is_empty())
    }

    /// The `objectBeginDate` sort key. Missing or non-integer values
    /// yield `None`; the sort layer maps that to its lowest sentinel.
    pub fn object_begin_date(&self) -> Option<i64> {
        self.0.get("objectBeginDate").and_then(Value::as_i64)
    }
}

impl From<Map<String, Value>> for ObjectRecord {
    fn from(fields: Map<String, Value>) -> Self {
        ObjectRecord(fields)
    }
}

//! # Canonical JSON
//!
//! Structured bodies and drafts are re-serialized with recursively sorted
//! object keys and no whitespace, so formatting never changes an encoding.

use serde_json::{Map, Value};

/// Parse `text` and return it with sorted keys.
pub fn canonicalize(text: &str) -> Result<Value, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    Ok(sort_keys(value))
}

/// Rebuild `value` with every object's keys in ascending order.
///
/// Explicit so the result does not depend on serde_json's map features.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, sort_keys(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Compact string form of `value` with sorted keys.
pub fn to_canonical_string(value: &Value) -> String {
    sort_keys(value.clone()).to_string()
}

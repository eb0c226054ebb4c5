//! Structural JSON flattening
//!
//! Collapses nested structures into single-level mappings with
//! underscore-joined path keys: `{"a": {"b": 1}}` becomes `{"a_b": 1}` and
//! arrays contribute their element index, so `{"a": [true]}` becomes
//! `{"a_0": true}`.

use serde_json::{Map, Value};

/// Flatten a JSON value into a single-level mapping.
///
/// Deterministic: the same input always produces the same output mapping.
/// No ordering guarantee is made across keys.
pub fn flatten_value(value: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    walk(value, String::new(), &mut out);
    out
}

/// Flatten a JSON value and wrap the result back into a `Value`
pub fn flatten_to_value(value: &Value) -> Value {
    Value::Object(flatten_value(value))
}

fn walk(value: &Value, prefix: String, out: &mut Map<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, format!("{prefix}{key}_"), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, format!("{prefix}{index}_"), out);
            }
        }
        scalar => {
            // Path-so-far minus the trailing separator
            let key = prefix.strip_suffix('_').unwrap_or(&prefix).to_string();
            out.insert(key, scalar.clone());
        }
    }
}
